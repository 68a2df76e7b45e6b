use ledger_core::DEFAULT_PERIOD_DAYS;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Window lengths used when a caller does not name one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerSettings {
    pub default_period_days: i64,
    pub retention_days: i64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            default_period_days: DEFAULT_PERIOD_DAYS,
            retention_days: DEFAULT_PERIOD_DAYS,
        }
    }
}

impl LedgerSettings {
    pub fn validate(&self) -> Result<()> {
        if self.default_period_days < 0 {
            return Err(AppError::InvalidInput(
                "default_period_days must be >= 0".to_string(),
            ));
        }
        if self.retention_days < 0 {
            return Err(AppError::InvalidInput(
                "retention_days must be >= 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn period_or_default(&self, days: Option<i64>) -> i64 {
        days.unwrap_or(self.default_period_days)
    }

    pub fn retention_or_default(&self, days: Option<i64>) -> i64 {
        days.unwrap_or(self.retention_days)
    }
}
