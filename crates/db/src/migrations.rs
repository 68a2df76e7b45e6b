use std::collections::HashSet;

use rusqlite::{Connection, TransactionBehavior, params};

use crate::Db;
use crate::error::{DbError, Result};

/// One step in the schema revision chain.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub revision: &'static str,
    /// Revision that must already be applied; `None` for the root of the chain.
    pub down_revision: Option<&'static str>,
    pub up: &'static str,
    pub down: &'static str,
}

const MIGRATION_0001_UP: &str = include_str!("../migrations/0001_token_usage.sql");
const MIGRATION_0001_DOWN: &str = include_str!("../migrations/0001_token_usage.down.sql");

pub const MIGRATIONS: &[Migration] = &[Migration {
    revision: "0001_token_usage",
    down_revision: None,
    up: MIGRATION_0001_UP,
    down: MIGRATION_0001_DOWN,
}];

const REVISION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_revision (
  revision TEXT PRIMARY KEY,
  down_revision TEXT,
  applied_at INTEGER NOT NULL
)
"#;

impl Db {
    /// Applies every pending revision in chain order. Returns how many were applied.
    pub fn migrate(&mut self) -> Result<usize> {
        migrate_chain(&mut self.conn, MIGRATIONS)
    }

    /// Reverts the head revision, returning its name, or `None` if nothing is applied.
    pub fn rollback(&mut self) -> Result<Option<&'static str>> {
        rollback_chain(&mut self.conn, MIGRATIONS)
    }

    pub fn current_revision(&self) -> Result<Option<&'static str>> {
        if !table_exists(&self.conn, "schema_revision")? {
            return Ok(None);
        }
        let applied = applied_revisions(&self.conn)?;
        Ok(chain_head(MIGRATIONS, &applied)?.map(|migration| migration.revision))
    }
}

pub(crate) fn migrate_chain(conn: &mut Connection, chain: &[Migration]) -> Result<usize> {
    validate_chain(chain)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute_batch(REVISION_TABLE)?;
    let applied = applied_revisions(&tx)?;
    let mut head = chain_head(chain, &applied)?.map(|migration| migration.revision);
    let mut count = 0usize;
    for migration in chain {
        if applied.contains(migration.revision) {
            continue;
        }
        if migration.down_revision != head {
            return Err(broken_chain(migration, head));
        }
        tx.execute_batch(migration.up)?;
        tx.execute(
            r#"
            INSERT INTO schema_revision (revision, down_revision, applied_at)
            VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER))
            "#,
            params![migration.revision, migration.down_revision],
        )?;
        tracing::info!(revision = migration.revision, "applied schema revision");
        head = Some(migration.revision);
        count += 1;
    }
    tx.commit()?;
    Ok(count)
}

pub(crate) fn rollback_chain(
    conn: &mut Connection,
    chain: &[Migration],
) -> Result<Option<&'static str>> {
    validate_chain(chain)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute_batch(REVISION_TABLE)?;
    let applied = applied_revisions(&tx)?;
    let Some(head) = chain_head(chain, &applied)? else {
        return Ok(None);
    };
    tx.execute_batch(head.down)?;
    tx.execute(
        "DELETE FROM schema_revision WHERE revision = ?1",
        params![head.revision],
    )?;
    tx.commit()?;
    tracing::info!(revision = head.revision, "reverted schema revision");
    Ok(Some(head.revision))
}

fn validate_chain(chain: &[Migration]) -> Result<()> {
    let mut previous: Option<&'static str> = None;
    for migration in chain {
        if migration.down_revision != previous {
            return Err(broken_chain(migration, previous));
        }
        previous = Some(migration.revision);
    }
    Ok(())
}

/// Latest applied revision, requiring the applied set to be a prefix of `chain`.
fn chain_head<'a>(
    chain: &'a [Migration],
    applied: &HashSet<String>,
) -> Result<Option<&'a Migration>> {
    if let Some(unknown) = applied
        .iter()
        .find(|revision| !chain.iter().any(|m| m.revision == revision.as_str()))
    {
        return Err(DbError::UnknownRevision(unknown.clone()));
    }
    let mut head: Option<&Migration> = None;
    let mut gap: Option<&Migration> = None;
    for migration in chain {
        if applied.contains(migration.revision) {
            if let Some(missing) = gap {
                return Err(DbError::BrokenChain {
                    revision: migration.revision.to_string(),
                    expected: Some(missing.revision.to_string()),
                    found: head.map(|m| m.revision.to_string()),
                });
            }
            head = Some(migration);
        } else if gap.is_none() {
            gap = Some(migration);
        }
    }
    Ok(head)
}

fn broken_chain(migration: &Migration, found: Option<&str>) -> DbError {
    DbError::BrokenChain {
        revision: migration.revision.to_string(),
        expected: migration.down_revision.map(str::to_string),
        found: found.map(str::to_string),
    }
}

fn applied_revisions(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT revision FROM schema_revision")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<std::result::Result<HashSet<_>, _>>()?)
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    Ok(stmt.exists(params![table])?)
}
