//! Month, category and day buckets derived from the full transaction set.
//!
//! Everything here is a pure function of its input; nothing is cached or stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{CategoryName, Transaction, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthBucket {
    pub(crate) month: YearMonth,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryBucket {
    pub(crate) category: CategoryName,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DayBucket {
    pub(crate) date: NaiveDate,
    pub(crate) total: Decimal,
}

/// One bucket per distinct (year, month), oldest first.
pub(crate) fn by_month(txns: &[Transaction]) -> Vec<MonthBucket> {
    let mut totals: BTreeMap<YearMonth, Decimal> = BTreeMap::new();
    for txn in txns {
        *totals.entry(txn.month()).or_default() += txn.amount;
    }
    totals
        .into_iter()
        .map(|(month, total)| MonthBucket { month, total })
        .collect()
}

/// All-time total per distinct category.
pub(crate) fn by_category(txns: &[Transaction]) -> BTreeMap<CategoryName, Decimal> {
    let mut totals: BTreeMap<CategoryName, Decimal> = BTreeMap::new();
    for txn in txns {
        *totals.entry(txn.category.clone()).or_default() += txn.amount;
    }
    totals
}

/// One bucket per distinct day, oldest first.
pub(crate) fn by_day(txns: &[Transaction]) -> Vec<DayBucket> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for txn in txns {
        *totals.entry(txn.date).or_default() += txn.amount;
    }
    totals
        .into_iter()
        .map(|(date, total)| DayBucket { date, total })
        .collect()
}

/// Transactions whose date falls in `month`, in ledger order.
pub(crate) fn filter_month(txns: &[Transaction], month: YearMonth) -> Vec<Transaction> {
    txns.iter().filter(|t| t.in_month(month)).cloned().collect()
}

/// Spend in one category during one month.
pub(crate) fn category_spend(txns: &[Transaction], category: &CategoryName, month: YearMonth) -> Decimal {
    txns.iter()
        .filter(|t| t.in_month(month) && &t.category == category)
        .map(|t| t.amount)
        .sum()
}

pub(crate) fn grand_total(txns: &[Transaction]) -> Decimal {
    txns.iter().map(|t| t.amount).sum()
}
