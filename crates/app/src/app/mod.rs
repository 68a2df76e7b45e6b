use std::path::PathBuf;
use std::sync::Arc;

use crate::config::LedgerSettings;
use crate::error::{AppError, Result};
use crate::services::AppServices;
use crate::util::clock::{Clock, SystemClock};
use crate::util::ids::{IdGenerator, UuidIds};
use ledger_db::Db;

/// Where the ledger lives and how wide its default windows are.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub settings: LedgerSettings,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            settings: LedgerSettings::default(),
        }
    }
}

/// Application state shared by the HTTP server and CLI maintenance commands.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_capabilities(config, Arc::new(SystemClock), Arc::new(UuidIds))
    }

    pub fn with_capabilities(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let services = AppServices::new(&config, clock, ids);
        Self { config, services }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))
    }

    pub fn rollback_db(&self) -> Result<Option<&'static str>> {
        let mut db = self.open_db()?;
        Ok(db.rollback()?)
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    let applied = db.migrate()?;
    if applied > 0 {
        tracing::info!(applied, path = %path.display(), "ledger schema migrated");
    }
    Ok(())
}
