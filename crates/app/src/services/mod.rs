mod ledger;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::Result;
use crate::util::clock::Clock;
use crate::util::ids::IdGenerator;
use ledger_db::Db;

pub use ledger::UsageLedger;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub ledger: UsageLedger,
}

impl AppServices {
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            ledger: UsageLedger::new(shared, clock, ids),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}
