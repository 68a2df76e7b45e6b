pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::LedgerSettings;
pub use error::{ApiError, AppError, Result};
pub use services::{AppServices, UsageLedger};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use util::clock::{Clock, ManualClock, SystemClock};
pub use util::ids::{IdGenerator, SequentialIds, UuidIds};
