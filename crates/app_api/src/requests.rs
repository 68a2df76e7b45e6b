use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecordUsageRequest {
    pub user_id: String,
    #[serde(default)]
    pub input_tokens: i64,
    #[serde(default)]
    pub output_tokens: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserSummaryRequest {
    pub user_id: String,
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AllSummariesRequest {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CleanupRequest {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EventsRequest {
    pub user_id: Option<String>,
    pub days: Option<i64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
