#![allow(dead_code)]

use std::path::PathBuf;

use ledger_core::UsageEvent;
use ledger_db::Db;
use tempfile::TempDir;

pub const NOW: i64 = 1_760_000_000;
pub const DAY: i64 = 86_400;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn make_event(id: &str, user_id: &str, input: i64, output: i64, created_at: i64) -> UsageEvent {
    UsageEvent::new(id, user_id, input, output, created_at).expect("event total fits")
}

pub fn count_rows(db: &Db) -> i64 {
    db.connection()
        .query_row("SELECT COUNT(*) FROM token_usage", [], |row| row.get(0))
        .expect("count rows")
}

pub fn insert_events(db: &mut Db, events: Vec<UsageEvent>) {
    for event in events {
        db.insert_usage_event(&event).expect("insert event");
    }
}
