//! Market data aggregate: assets, snapshots, price series and the sources
//! they come from.

pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
