#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::mpsc;

use crate::models::{CategoryName, Transaction};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

// ── next_report_time ──────────────────────────────────────────

#[test]
fn test_next_report_time_same_month() {
    assert_eq!(
        next_report_time(at("2024-01-10 09:00:00")),
        Some(at("2024-01-31 18:00:00"))
    );
}

#[test]
fn test_next_report_time_leap_february() {
    assert_eq!(
        next_report_time(at("2024-02-01 00:00:00")),
        Some(at("2024-02-29 18:00:00"))
    );
}

#[test]
fn test_next_report_time_after_cutoff_rolls_to_next_month_end() {
    // January 31 after 18:00 must land on February's last day, not "February 31".
    assert_eq!(
        next_report_time(at("2024-01-31 18:00:00")),
        Some(at("2024-02-29 18:00:00"))
    );
    assert_eq!(
        next_report_time(at("2023-12-31 23:59:59")),
        Some(at("2024-01-31 18:00:00"))
    );
}

// ── OutboxSink ────────────────────────────────────────────────

#[test]
fn test_outbox_sink_writes_html() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = OutboxSink::new(dir.path().join("outbox")).unwrap();
    let txns = vec![Transaction {
        id: 1,
        date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        category: CategoryName::parse("Groceries").unwrap(),
        amount: dec!(25),
        description: String::new(),
    }];
    let month = YearMonth::parse("2024-03").unwrap();
    sink.deliver(&MonthlyReport::build(month, &txns)).unwrap();

    let written = std::fs::read_to_string(sink.path_for(month)).unwrap();
    assert!(written.contains("Expense Report for 2024-03"));
    assert!(written.contains("$25.00"));
}

// ── spawn / cancel ────────────────────────────────────────────

#[test]
fn test_scheduler_fires_with_report_month() {
    let just_before = NaiveDate::from_ymd_opt(2024, 1, 31)
        .unwrap()
        .and_hms_milli_opt(17, 59, 59, 950)
        .unwrap();
    let (tx, rx) = mpsc::channel();
    let handle = spawn(
        move || just_before,
        move |month| {
            let _ = tx.send(month);
            Ok(())
        },
    )
    .unwrap();

    let fired = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(fired, YearMonth::parse("2024-01").unwrap());
    handle.cancel();
}

#[test]
fn test_scheduler_survives_job_errors() {
    let just_before = NaiveDate::from_ymd_opt(2024, 1, 31)
        .unwrap()
        .and_hms_milli_opt(17, 59, 59, 980)
        .unwrap();
    let (tx, rx) = mpsc::channel();
    let handle = spawn(
        move || just_before,
        move |_| {
            let _ = tx.send(());
            anyhow::bail!("mailer down")
        },
    )
    .unwrap();

    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    handle.cancel();
}

#[test]
fn test_scheduler_cancel_before_first_tick() {
    let (tx, rx) = mpsc::channel::<YearMonth>();
    let handle = spawn(
        || at("2024-01-01 00:00:00"),
        move |month| {
            let _ = tx.send(month);
            Ok(())
        },
    )
    .unwrap();
    handle.cancel();
    assert!(rx.try_recv().is_err());
}
