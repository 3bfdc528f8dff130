#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_basic() {
    assert_eq!(parse_amount("100.50").unwrap(), dec!(100.50));
    assert_eq!(parse_amount("42").unwrap(), dec!(42));
    assert_eq!(parse_amount("0").unwrap(), dec!(0));
}

#[test]
fn test_parse_amount_with_currency_and_commas() {
    assert_eq!(parse_amount("$1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_amount("  $9.99  ").unwrap(), dec!(9.99));
}

#[test]
fn test_parse_amount_negative_rejected() {
    assert_eq!(
        parse_amount("-5").unwrap_err(),
        ValidationError::NegativeAmount(dec!(-5))
    );
    assert!(matches!(
        parse_amount("-$0.01"),
        Err(ValidationError::NegativeAmount(_))
    ));
}

#[test]
fn test_parse_amount_negative_zero_allowed() {
    assert!(parse_amount("-0").unwrap().is_zero());
}

#[test]
fn test_parse_amount_non_numeric_rejected() {
    assert!(matches!(
        parse_amount("twelve"),
        Err(ValidationError::InvalidAmount(_))
    ));
    assert!(matches!(
        parse_amount(""),
        Err(ValidationError::InvalidAmount(_))
    ));
    assert!(matches!(
        parse_amount("$"),
        Err(ValidationError::InvalidAmount(_))
    ));
}

#[test]
fn test_parse_limit_negative_rejected() {
    assert_eq!(parse_limit("250").unwrap(), dec!(250));
    assert_eq!(
        parse_limit("-10").unwrap_err(),
        ValidationError::NegativeLimit(dec!(-10))
    );
}

#[test]
fn test_parse_amount_ceiling() {
    assert_eq!(parse_amount("1,000,000,000,000").unwrap(), MAX_AMOUNT);
    assert!(matches!(
        parse_amount("1000000000000.01"),
        Err(ValidationError::AmountTooLarge(_))
    ));
    assert!(matches!(
        parse_amount("79228162514264337593543950335"),
        Err(ValidationError::AmountTooLarge(_))
    ));
}

#[test]
fn test_parse_limit_ceiling() {
    assert_eq!(parse_limit("1000000000000").unwrap(), MAX_AMOUNT);
    assert!(matches!(
        parse_limit("79228162514264337593543950335"),
        Err(ValidationError::LimitTooLarge(_))
    ));
}

#[test]
fn test_parse_limit_rounds_to_cents() {
    assert_eq!(parse_limit("123.456789012345678901").unwrap(), dec!(123.46));
    assert_eq!(parse_limit("$99.5").unwrap(), dec!(99.5));
}

#[test]
fn test_check_amount_rejects_negative() {
    assert_eq!(check_amount(dec!(0)).unwrap(), dec!(0));
    assert_eq!(
        check_amount(dec!(-5)).unwrap_err(),
        ValidationError::NegativeAmount(dec!(-5))
    );
}

// ── parse_date ────────────────────────────────────────────────

#[test]
fn test_parse_date_iso() {
    assert_eq!(
        parse_date(Some("2024-01-15"), today()).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    );
}

#[test]
fn test_parse_date_blank_is_today() {
    assert_eq!(parse_date(None, today()).unwrap(), today());
    assert_eq!(parse_date(Some("  "), today()).unwrap(), today());
}

#[test]
fn test_parse_date_invalid() {
    assert!(matches!(
        parse_date(Some("01/15/2024"), today()),
        Err(ValidationError::InvalidDate(_))
    ));
    assert!(parse_date(Some("2024-02-30"), today()).is_err());
}

#[test]
fn test_parse_month() {
    assert_eq!(parse_month("2024-07").unwrap().to_string(), "2024-07");
    assert!(parse_month("2024-07-01").is_err());
}

// ── ExpenseInput ──────────────────────────────────────────────

#[test]
fn test_expense_input_validate() {
    let input = ExpenseInput {
        date: Some("2024-05-01"),
        category: " groceries",
        amount: "$12.30",
        description: " milk and eggs ",
    };
    let txn = input.validate(today()).unwrap();
    assert_eq!(txn.category.as_str(), "Groceries");
    assert_eq!(txn.amount, dec!(12.30));
    assert_eq!(txn.description, "milk and eggs");
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
}

#[test]
fn test_expense_input_defaults_date_to_today() {
    let input = ExpenseInput {
        category: "Utilities",
        amount: "80",
        ..Default::default()
    };
    assert_eq!(input.validate(today()).unwrap().date, today());
}

#[test]
fn test_expense_input_reports_first_failure() {
    let input = ExpenseInput {
        date: Some("yesterday"),
        category: "",
        amount: "-1",
        description: "",
    };
    assert!(matches!(
        input.validate(today()),
        Err(ValidationError::InvalidDate(_))
    ));
}
