pub mod coordinator;
pub mod debouncer;
pub mod request_sequencer;
pub mod scheduler;
pub mod selection;
pub mod state;
pub mod use_cases;

pub use coordinator::*;
pub use debouncer::Debouncer;
pub use request_sequencer::{RequestSequencer, RequestTicket};
pub use scheduler::{RefreshScheduler, TimerDriver, TimerHandle};
pub use selection::SelectionCoordinator;
pub use state::{ChartState, DashboardState, LoadStatus};
pub use use_cases::*;
