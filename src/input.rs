use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::{CategoryName, NewTransaction, YearMonth};

/// Raw expense fields as typed by a user.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExpenseInput<'a> {
    pub(crate) date: Option<&'a str>,
    pub(crate) category: &'a str,
    pub(crate) amount: &'a str,
    pub(crate) description: &'a str,
}

impl ExpenseInput<'_> {
    pub(crate) fn validate(&self, today: NaiveDate) -> Result<NewTransaction, ValidationError> {
        Ok(NewTransaction {
            date: parse_date(self.date, today)?,
            category: CategoryName::parse(self.category)?,
            amount: parse_amount(self.amount)?,
            description: self.description.trim().to_string(),
        })
    }
}

/// Largest amount or limit accepted: one trillion. Ledger sums stay far below `Decimal::MAX`.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Parse a non-negative currency amount. `$` and thousands separators are ignored.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal, ValidationError> {
    check_amount(parse_decimal(s)?)
}

/// Parse a budget limit; same rules as an amount, kept to the cent.
pub(crate) fn parse_limit(s: &str) -> Result<Decimal, ValidationError> {
    check_limit(parse_decimal(s)?)
}

/// Range check shared by user input and rows read back from storage.
pub(crate) fn check_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    Ok(amount)
}

/// Range check for a monthly limit. The result is rounded to 2 decimal places.
pub(crate) fn check_limit(limit: Decimal) -> Result<Decimal, ValidationError> {
    if limit.is_sign_negative() && !limit.is_zero() {
        return Err(ValidationError::NegativeLimit(limit));
    }
    if limit > MAX_AMOUNT {
        return Err(ValidationError::LimitTooLarge(limit));
    }
    Ok(limit.round_dp(2))
}

fn parse_decimal(s: &str) -> Result<Decimal, ValidationError> {
    let cleaned = s.replace(['$', ','], "").trim().to_string();
    if cleaned.is_empty() {
        return Err(ValidationError::InvalidAmount(s.to_string()));
    }
    Decimal::from_str(&cleaned).map_err(|_| ValidationError::InvalidAmount(s.to_string()))
}

/// Parse an ISO date; a missing or blank value means `today`.
pub(crate) fn parse_date(s: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    match s.map(str::trim) {
        None | Some("") => Ok(today),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(raw.to_string())),
    }
}

pub(crate) fn parse_month(s: &str) -> Result<YearMonth, ValidationError> {
    YearMonth::parse(s)
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
