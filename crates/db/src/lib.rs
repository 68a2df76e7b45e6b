mod analytics;
mod error;
mod helpers;
mod migrations;
mod usage;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

pub use error::{DbError, Result};
pub use migrations::{MIGRATIONS, Migration};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A single connection to the ledger store.
///
/// Each `Db` owns one SQLite connection. Callers open one per unit of work and
/// drop it when done; the file itself is shared across connections in WAL mode.
pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "cache_size", -20_000)?;
        Ok(Self { conn })
    }

    /// Raw connection access for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
