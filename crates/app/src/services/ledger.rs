use std::collections::BTreeMap;
use std::sync::Arc;

use ledger_core::{UsageEvent, UsageSummary, window_cutoff};
use ledger_db::Db;
use tracing::{debug, error, info};

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};
use crate::util::clock::Clock;
use crate::util::ids::IdGenerator;

/// Records token usage and answers windowed usage questions.
///
/// Metering must never break the request that triggered it, so the public
/// methods do not return errors: storage failures are logged and turned into
/// `None`, zero-valued summaries, an empty map, or a zero delete count. Every
/// call opens its own connection and drops it before returning.
#[derive(Clone)]
pub struct UsageLedger {
    config: SharedConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl UsageLedger {
    pub(super) fn new(
        config: SharedConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { config, clock, ids }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Current ledger time in epoch seconds.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Stores one usage event. `None` means the usage was not recorded.
    ///
    /// Token counts are stored as given, including negative values. A pair whose
    /// total does not fit in an `i64` is not recorded.
    pub fn record(
        &self,
        user_id: &str,
        input_tokens: i64,
        output_tokens: i64,
    ) -> Option<UsageEvent> {
        match self.try_record(user_id, input_tokens, output_tokens) {
            Ok(event) => {
                debug!(
                    user_id,
                    id = %event.id,
                    total_tokens = event.total_tokens,
                    "recorded token usage"
                );
                Some(event)
            }
            Err(err) => {
                error!(user_id, error = %err, "failed to record token usage");
                None
            }
        }
    }

    /// Usage for one user over the trailing `days`. A failed query reads as zero usage.
    pub fn user_summary(&self, user_id: &str, days: i64) -> UsageSummary {
        self.try_user_summary(user_id, days).unwrap_or_else(|err| {
            error!(user_id, days, error = %err, "failed to summarize token usage");
            UsageSummary::empty(user_id, days)
        })
    }

    /// Usage per user over the trailing `days`; users without usage are absent.
    pub fn all_user_summaries(&self, days: i64) -> BTreeMap<String, UsageSummary> {
        self.try_all_user_summaries(days).unwrap_or_else(|err| {
            error!(days, error = %err, "failed to summarize token usage for all users");
            BTreeMap::new()
        })
    }

    /// Deletes rows older than `days`. Returns how many were removed, or 0 on failure.
    pub fn cleanup(&self, days: i64) -> usize {
        match self.try_cleanup(days) {
            Ok(deleted) => {
                info!(days, deleted, "cleaned up token usage");
                deleted
            }
            Err(err) => {
                error!(days, error = %err, "failed to clean up token usage");
                0
            }
        }
    }

    /// Raw rows inside the trailing window, newest first.
    pub fn list_events(
        &self,
        user_id: Option<&str>,
        days: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<UsageEvent>> {
        let cutoff = window_cutoff(self.now(), days);
        Ok(self.db()?.list_usage_events(user_id, cutoff, limit, offset)?)
    }

    fn try_record(
        &self,
        user_id: &str,
        input_tokens: i64,
        output_tokens: i64,
    ) -> Result<UsageEvent> {
        let event = UsageEvent::new(
            self.ids.next_id(),
            user_id,
            input_tokens,
            output_tokens,
            self.now(),
        )
        .ok_or_else(|| AppError::InvalidInput("token total overflows".to_string()))?;
        let mut db = self.db()?;
        Ok(db.insert_usage_event(&event)?)
    }

    fn try_user_summary(&self, user_id: &str, days: i64) -> Result<UsageSummary> {
        let cutoff = window_cutoff(self.now(), days);
        Ok(self.db()?.user_summary(user_id, cutoff, days)?)
    }

    fn try_all_user_summaries(&self, days: i64) -> Result<BTreeMap<String, UsageSummary>> {
        let cutoff = window_cutoff(self.now(), days);
        Ok(self.db()?.all_user_summaries(cutoff, days)?)
    }

    fn try_cleanup(&self, days: i64) -> Result<usize> {
        let cutoff = window_cutoff(self.now(), days);
        Ok(self.db()?.delete_usage_before(cutoff)?)
    }
}
