use std::collections::BTreeMap;

use ledger_core::{UsageEvent, UsageSummary};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RecordUsageResponse {
    pub recorded: bool,
    pub event: Option<UsageEvent>,
}

#[derive(Debug, Serialize)]
pub struct AllSummariesResponse {
    pub period_days: i64,
    pub users: BTreeMap<String, UsageSummary>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: usize,
}
