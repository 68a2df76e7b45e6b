use ledger_core::{UsageEvent, UsageSummary};
use rusqlite::Row;

pub(crate) const EVENT_COLUMNS: &str =
    "id, user_id, input_tokens, output_tokens, total_tokens, created_at";

pub(crate) fn row_to_usage_event(
    row: &Row<'_>,
) -> std::result::Result<UsageEvent, rusqlite::Error> {
    Ok(UsageEvent {
        id: row.get(0)?,
        user_id: row.get(1)?,
        input_tokens: row.get(2)?,
        output_tokens: row.get(3)?,
        total_tokens: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Maps `(input_sum, output_sum, total_sum)` starting at `offset`, coalescing NULL sums to zero.
pub(crate) fn row_to_summary(
    row: &Row<'_>,
    offset: usize,
    user_id: String,
    period_days: i64,
) -> std::result::Result<UsageSummary, rusqlite::Error> {
    Ok(UsageSummary {
        user_id,
        total_input_tokens: row.get::<_, Option<i64>>(offset)?.unwrap_or(0),
        total_output_tokens: row.get::<_, Option<i64>>(offset + 1)?.unwrap_or(0),
        total_tokens: row.get::<_, Option<i64>>(offset + 2)?.unwrap_or(0),
        period_days,
    })
}
