#![allow(dead_code)]

use std::sync::Arc;

use ledger_app::{AppConfig, AppState, ManualClock, SequentialIds, UsageLedger};
use tempfile::TempDir;

pub const NOW: i64 = 1_760_000_000;
pub const DAY: i64 = 86_400;

pub struct TestLedger {
    pub _dir: TempDir,
    pub app_state: AppState,
    pub clock: ManualClock,
}

impl TestLedger {
    pub fn ledger(&self) -> &UsageLedger {
        &self.app_state.services.ledger
    }
}

/// A ledger over a migrated temp database with a frozen clock at `NOW`.
pub fn setup_ledger() -> TestLedger {
    let test = unmigrated_ledger();
    test.app_state.setup_db().expect("setup db");
    test
}

/// A ledger whose database file exists but has no schema, so every query fails.
pub fn unmigrated_ledger() -> TestLedger {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = AppConfig::new(dir.path().join("ledger.sqlite"));
    let clock = ManualClock::new(NOW);
    let app_state = AppState::with_capabilities(
        config,
        Arc::new(clock.clone()),
        Arc::new(SequentialIds::new("evt")),
    );
    TestLedger {
        _dir: dir,
        app_state,
        clock,
    }
}
