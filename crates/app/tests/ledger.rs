mod support;

use std::collections::BTreeMap;

use ledger_core::UsageSummary;
use support::{DAY, NOW, setup_ledger, unmigrated_ledger};

fn summary(user_id: &str, input: i64, output: i64, total: i64, days: i64) -> UsageSummary {
    UsageSummary {
        user_id: user_id.to_string(),
        total_input_tokens: input,
        total_output_tokens: output,
        total_tokens: total,
        period_days: days,
    }
}

#[test]
fn record_stamps_id_clock_and_total() {
    let test = setup_ledger();
    let event = test.ledger().record("u1", 100, 50).expect("recorded");

    assert_eq!(event.id, "evt-1");
    assert_eq!(event.user_id, "u1");
    assert_eq!(event.total_tokens, 150);
    assert_eq!(event.created_at, NOW);

    let stored = test
        .app_state
        .open_db()
        .expect("open db")
        .get_usage_event("evt-1")
        .expect("load")
        .expect("stored row");
    assert_eq!(stored, event);
}

#[test]
fn single_event_summary() {
    let test = setup_ledger();
    test.ledger().record("u1", 100, 50).expect("recorded");

    assert_eq!(
        test.ledger().user_summary("u1", 30),
        summary("u1", 100, 50, 150, 30)
    );
}

#[test]
fn two_event_summary() {
    let test = setup_ledger();
    test.ledger().record("u1", 100, 50).expect("recorded");
    test.clock.advance(3_600);
    test.ledger().record("u1", 200, 25).expect("recorded");

    assert_eq!(
        test.ledger().user_summary("u1", 30),
        summary("u1", 300, 75, 375, 30)
    );
}

#[test]
fn event_older_than_window_is_excluded() {
    let test = setup_ledger();
    test.clock.set(NOW - 40 * DAY);
    test.ledger().record("u1", 100, 50).expect("recorded");
    test.clock.set(NOW);

    assert_eq!(test.ledger().user_summary("u1", 30), summary("u1", 0, 0, 0, 30));
    assert_eq!(
        test.ledger().user_summary("u1", 41),
        summary("u1", 100, 50, 150, 41)
    );
}

#[test]
fn unknown_user_gets_zero_summary() {
    let test = setup_ledger();
    test.ledger().record("u1", 1, 1).expect("recorded");
    assert_eq!(
        test.ledger().user_summary("nobody", 7),
        summary("nobody", 0, 0, 0, 7)
    );
}

#[test]
fn all_user_summaries_only_lists_active_users() {
    let test = setup_ledger();
    test.ledger().record("u1", 100, 50).expect("recorded");
    test.ledger().record("u1", 200, 25).expect("recorded");
    test.ledger().record("u2", 10, 5).expect("recorded");

    let all = test.ledger().all_user_summaries(30);
    let mut expected = BTreeMap::new();
    expected.insert("u1".to_string(), summary("u1", 300, 75, 375, 30));
    expected.insert("u2".to_string(), summary("u2", 10, 5, 15, 30));
    assert_eq!(all, expected);
    assert!(!all.contains_key("u3"));
    assert_eq!(test.ledger().user_summary("u3", 30), summary("u3", 0, 0, 0, 30));
}

#[test]
fn cleanup_removes_old_rows_once() {
    let test = setup_ledger();
    test.clock.set(NOW - 45 * DAY);
    test.ledger().record("u1", 1, 1).expect("recorded");
    test.clock.set(NOW - 31 * DAY);
    test.ledger().record("u2", 1, 1).expect("recorded");
    test.clock.set(NOW - DAY);
    test.ledger().record("u1", 5, 5).expect("recorded");
    test.clock.set(NOW);

    assert_eq!(test.ledger().cleanup(30), 2);
    assert_eq!(test.ledger().cleanup(30), 0);

    let remaining = test
        .ledger()
        .list_events(None, 365, 100, 0)
        .expect("list events");
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|event| event.created_at >= NOW - 30 * DAY));
}

#[test]
fn record_reports_not_recorded_when_storage_fails() {
    let test = unmigrated_ledger();
    assert!(test.ledger().record("u1", 100, 50).is_none());
}

#[test]
fn record_refuses_totals_that_overflow() {
    let test = setup_ledger();
    assert!(test.ledger().record("u1", i64::MAX, 1).is_none());
    assert!(test.ledger().record("u1", i64::MIN, -1).is_none());

    let stored = test
        .ledger()
        .list_events(None, 365, 100, 0)
        .expect("list events");
    assert!(stored.is_empty());
    assert_eq!(test.ledger().user_summary("u1", 30), summary("u1", 0, 0, 0, 30));

    let event = test
        .ledger()
        .record("u1", i64::MAX - 1, 1)
        .expect("largest total is recorded");
    assert_eq!(event.total_tokens, i64::MAX);
}

#[test]
fn summaries_fall_back_to_empty_values_when_storage_fails() {
    let test = unmigrated_ledger();
    assert_eq!(
        test.ledger().user_summary("u1", 30),
        summary("u1", 0, 0, 0, 30)
    );
    assert!(test.ledger().all_user_summaries(30).is_empty());
}

#[test]
fn cleanup_reports_zero_when_storage_fails() {
    let test = unmigrated_ledger();
    assert_eq!(test.ledger().cleanup(30), 0);
}

#[test]
fn list_events_surfaces_storage_errors() {
    let test = unmigrated_ledger();
    assert!(test.ledger().list_events(Some("u1"), 30, 10, 0).is_err());
}

#[test]
fn ledger_clones_record_concurrently() {
    let test = setup_ledger();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let ledger = test.ledger().clone();
            std::thread::spawn(move || {
                let user_id = format!("user-{worker}");
                for _ in 0..20 {
                    ledger.record(&user_id, 3, 2).expect("recorded");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }

    let all = test.ledger().all_user_summaries(1);
    assert_eq!(all.len(), 4);
    assert!(all.values().all(|summary| summary.total_tokens == 100));
}

#[test]
fn rollback_then_setup_restores_the_ledger() {
    let test = setup_ledger();
    test.ledger().record("u1", 1, 1).expect("recorded");
    assert_eq!(
        test.app_state.rollback_db().expect("rollback"),
        Some("0001_token_usage")
    );
    assert!(test.ledger().record("u1", 1, 1).is_none());

    test.app_state.setup_db().expect("setup again");
    assert!(test.ledger().record("u1", 1, 1).is_some());
    assert_eq!(test.ledger().user_summary("u1", 30).total_tokens, 2);
}
