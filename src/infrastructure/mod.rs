pub mod http;
pub mod services;
pub mod storage;
pub mod timers;

pub use http::CoinGeckoClient;
pub use services::{BrowserTimeProvider, ConsoleLogger};
pub use storage::{InMemoryStorage, LocalStorageBackend};
pub use timers::{GlooTimerDriver, ManualClock, ManualTimerDriver};
