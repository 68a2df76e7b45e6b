use ledger_app::Result;
use ledger_core::{UsageEvent, UsageSummary};

use crate::{
    AllSummariesRequest, AllSummariesResponse, AppContext, CleanupRequest, DeletedResponse,
    EventsRequest, RecordUsageRequest, RecordUsageResponse, UserSummaryRequest,
};

pub const DEFAULT_EVENTS_LIMIT: u32 = 100;
pub const MAX_EVENTS_LIMIT: u32 = 1_000;

pub fn record_usage(ctx: &AppContext, req: RecordUsageRequest) -> RecordUsageResponse {
    let event = ctx.app_state.services.ledger.record(
        &req.user_id,
        req.input_tokens,
        req.output_tokens,
    );
    RecordUsageResponse {
        recorded: event.is_some(),
        event,
    }
}

pub fn user_summary(ctx: &AppContext, req: UserSummaryRequest) -> UsageSummary {
    let days = ctx.app_state.config.settings.period_or_default(req.days);
    ctx.app_state.services.ledger.user_summary(&req.user_id, days)
}

pub fn all_summaries(ctx: &AppContext, req: AllSummariesRequest) -> AllSummariesResponse {
    let days = ctx.app_state.config.settings.period_or_default(req.days);
    AllSummariesResponse {
        period_days: days,
        users: ctx.app_state.services.ledger.all_user_summaries(days),
    }
}

pub fn cleanup(ctx: &AppContext, req: CleanupRequest) -> DeletedResponse {
    let days = ctx.app_state.config.settings.retention_or_default(req.days);
    DeletedResponse {
        deleted: ctx.app_state.services.ledger.cleanup(days),
    }
}

pub fn events(ctx: &AppContext, req: EventsRequest) -> Result<Vec<UsageEvent>> {
    let days = ctx.app_state.config.settings.period_or_default(req.days);
    let limit = req
        .limit
        .unwrap_or(DEFAULT_EVENTS_LIMIT)
        .min(MAX_EVENTS_LIMIT);
    ctx.app_state.services.ledger.list_events(
        req.user_id.as_deref(),
        days,
        limit,
        req.offset.unwrap_or(0),
    )
}
