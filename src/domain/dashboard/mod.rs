//! Table view model: controls, derived pages and the derivation pipeline.

pub mod services;
pub mod value_objects;

pub use services::{clamp_page, derive, derive_with_page_size, page_count};
pub use value_objects::*;
