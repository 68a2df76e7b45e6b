use std::collections::BTreeMap;

use ledger_core::{UsageEvent, UsageSummary};
use rusqlite::params;

use crate::Db;
use crate::error::Result;
use crate::helpers::{EVENT_COLUMNS, row_to_summary, row_to_usage_event};

impl Db {
    /// Token sums for `user_id` over rows with `created_at >= cutoff`.
    ///
    /// Always yields a summary; a user without matching rows gets zeros.
    pub fn user_summary(
        &self,
        user_id: &str,
        cutoff: i64,
        period_days: i64,
    ) -> Result<UsageSummary> {
        let summary = self.conn.query_row(
            r#"
            SELECT SUM(input_tokens), SUM(output_tokens), SUM(total_tokens)
            FROM token_usage
            WHERE user_id = ?1 AND created_at >= ?2
            "#,
            params![user_id, cutoff],
            |row| row_to_summary(row, 0, user_id.to_string(), period_days),
        )?;
        Ok(summary)
    }

    /// Token sums per user over rows with `created_at >= cutoff`.
    ///
    /// Users with no rows in the window are absent from the map.
    pub fn all_user_summaries(
        &self,
        cutoff: i64,
        period_days: i64,
    ) -> Result<BTreeMap<String, UsageSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT user_id, SUM(input_tokens), SUM(output_tokens), SUM(total_tokens)
            FROM token_usage
            WHERE created_at >= ?1
            GROUP BY user_id
            "#,
        )?;
        let rows = stmt.query_map(params![cutoff], |row| {
            let user_id: String = row.get(0)?;
            row_to_summary(row, 1, user_id, period_days)
        })?;
        let mut summaries = BTreeMap::new();
        for summary in rows {
            let summary = summary?;
            summaries.insert(summary.user_id.clone(), summary);
        }
        Ok(summaries)
    }

    /// Rows with `created_at >= cutoff`, newest first, optionally for one user.
    pub fn list_usage_events(
        &self,
        user_id: Option<&str>,
        cutoff: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<UsageEvent>> {
        let mut sql = format!("SELECT {EVENT_COLUMNS} FROM token_usage WHERE created_at >= ?1");
        if user_id.is_some() {
            sql.push_str(" AND user_id = ?2 ORDER BY created_at DESC, id ASC LIMIT ?3 OFFSET ?4");
        } else {
            sql.push_str(" ORDER BY created_at DESC, id ASC LIMIT ?2 OFFSET ?3");
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = if let Some(user_id) = user_id {
            stmt.query_map(params![cutoff, user_id, limit, offset], row_to_usage_event)?
        } else {
            stmt.query_map(params![cutoff, limit, offset], row_to_usage_event)?
        };
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
