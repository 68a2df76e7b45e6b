use ledger_core::UsageEvent;
use rusqlite::{OptionalExtension, TransactionBehavior, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{EVENT_COLUMNS, row_to_usage_event};

impl Db {
    /// Writes one row and returns it as stored.
    pub fn insert_usage_event(&mut self, event: &UsageEvent) -> Result<UsageEvent> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            r#"
            INSERT INTO token_usage (
              id, user_id, input_tokens, output_tokens, total_tokens, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                event.id,
                event.user_id,
                event.input_tokens,
                event.output_tokens,
                event.total_tokens,
                event.created_at,
            ],
        )?;
        let stored = tx.query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM token_usage WHERE id = ?1"),
            params![event.id],
            row_to_usage_event,
        )?;
        tx.commit()?;
        Ok(stored)
    }

    pub fn get_usage_event(&self, id: &str) -> Result<Option<UsageEvent>> {
        self.conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM token_usage WHERE id = ?1"),
                params![id],
                row_to_usage_event,
            )
            .optional()
            .map_err(DbError::from)
    }

    /// Deletes every row created strictly before `cutoff`. Returns the number removed.
    pub fn delete_usage_before(&mut self, cutoff: i64) -> Result<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let deleted = tx.execute(
            "DELETE FROM token_usage WHERE created_at < ?1",
            params![cutoff],
        )?;
        tx.commit()?;
        Ok(deleted)
    }
}
