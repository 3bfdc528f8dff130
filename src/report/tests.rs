#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::models::CategoryName;

fn txn(date: &str, category: &str, amount: Decimal) -> Transaction {
    Transaction {
        id: 0,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category: CategoryName::parse(category).unwrap(),
        amount,
        description: String::new(),
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        txn("2024-03-01", "Utilities", dec!(90)),
        txn("2024-03-04", "Groceries", dec!(45.50)),
        txn("2024-03-09", "Groceries", dec!(44.50)),
        txn("2024-03-12", "Fish & Chips", dec!(12)),
        txn("2024-04-01", "Groceries", dec!(999)),
    ]
}

fn march() -> YearMonth {
    YearMonth::parse("2024-03").unwrap()
}

// ── MonthlyReport ─────────────────────────────────────────────

#[test]
fn test_build_totals_only_that_month() {
    let report = MonthlyReport::build(march(), &sample());
    assert_eq!(report.total, dec!(192.00));
    assert_eq!(report.transaction_count, 4);
}

#[test]
fn test_breakdown_sorted_largest_first_ties_by_name() {
    let report = MonthlyReport::build(march(), &sample());
    let names: Vec<&str> = report
        .breakdown
        .iter()
        .map(|b| b.category.as_str())
        .collect();
    // Groceries and Utilities both total 90.
    assert_eq!(names, vec!["Groceries", "Utilities", "Fish & Chips"]);
}

#[test]
fn test_empty_month() {
    let report = MonthlyReport::build(YearMonth::parse("2023-01").unwrap(), &sample());
    assert!(report.is_empty());
    assert_eq!(report.total, Decimal::ZERO);
    assert!(!report.to_text().contains("Category Breakdown"));
}

#[test]
fn test_to_text() {
    let text = MonthlyReport::build(march(), &sample()).to_text();
    assert!(text.starts_with("Expense Report for 2024-03\n"));
    assert!(text.contains("Total spent: $192.00"));
    assert!(text.contains("Groceries"));
    assert!(text.contains("$90.00"));
}

#[test]
fn test_to_text_layout() {
    let txns = vec![txn("2024-03-01", "Utilities", dec!(90))];
    let text = MonthlyReport::build(march(), &txns).to_text();
    let expected = format!(
        "Expense Report for 2024-03\n{}\nTotal spent: $90.00\n\nCategory Breakdown:\n  {:<24} $90.00\n",
        "─".repeat(40),
        "Utilities"
    );
    assert_eq!(text, expected);
}

#[test]
fn test_to_html_empty_month_has_empty_list() {
    let html = MonthlyReport::build(YearMonth::parse("2023-01").unwrap(), &sample()).to_html();
    assert!(html.contains("<b>$0.00</b>"));
    assert!(html.contains("<ul>\n</ul>"));
}

#[test]
fn test_to_html_escapes_categories() {
    let html = MonthlyReport::build(march(), &sample()).to_html();
    assert!(html.contains("<h1>Expense Report for 2024-03</h1>"));
    assert!(html.contains("<b>$192.00</b>"));
    assert!(html.contains("<li>Fish &amp; Chips: $12.00</li>"));
    assert!(html.trim_end().ends_with("</html>"));
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(5)), "$5.00");
    assert_eq!(format_amount(dec!(1234.5)), "$1,234.50");
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
    assert_eq!(format_amount(dec!(-42.10)), "-$42.10");
}

#[test]
fn test_format_amount_rounds_long_fractions() {
    assert_eq!(format_amount(dec!(166.666666)), "$166.67");
    assert_eq!(format_amount(dec!(-0.001)), "$0.00");
}
