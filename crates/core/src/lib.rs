use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// One recorded unit of token consumption, as stored in `token_usage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: String,
    pub user_id: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
    /// Epoch seconds.
    pub created_at: i64,
}

impl UsageEvent {
    /// Builds a row ready for insert. `total_tokens` is derived here and never recomputed.
    ///
    /// Returns `None` when the total does not fit in an `i64`.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        input_tokens: i64,
        output_tokens: i64,
        created_at: i64,
    ) -> Option<Self> {
        let total_tokens = input_tokens.checked_add(output_tokens)?;
        Some(Self {
            id: id.into(),
            user_id: user_id.into(),
            input_tokens,
            output_tokens,
            total_tokens,
            created_at,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub user_id: String,
    pub total_input_tokens: i64,
    pub total_output_tokens: i64,
    pub total_tokens: i64,
    pub period_days: i64,
}

impl UsageSummary {
    pub fn empty(user_id: impl Into<String>, period_days: i64) -> Self {
        Self {
            user_id: user_id.into(),
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_tokens: 0,
            period_days,
        }
    }
}

/// Start of a trailing window of `days` ending at `now` (both in epoch seconds).
pub fn window_cutoff(now: i64, days: i64) -> i64 {
    now.saturating_sub(days.saturating_mul(SECONDS_PER_DAY))
}
