use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{CategoryName, YearMonth};

/// A recorded expense. Never updated in place once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transaction {
    pub(crate) id: i64,
    pub(crate) date: NaiveDate,
    pub(crate) category: CategoryName,
    pub(crate) amount: Decimal,
    pub(crate) description: String,
}

impl Transaction {
    pub(crate) fn month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }

    pub(crate) fn in_month(&self, month: YearMonth) -> bool {
        month.contains(self.date)
    }
}

/// A validated expense that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewTransaction {
    pub(crate) date: NaiveDate,
    pub(crate) category: CategoryName,
    pub(crate) amount: Decimal,
    pub(crate) description: String,
}

impl NewTransaction {
    pub(crate) fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id,
            date: self.date,
            category: self.category,
            amount: self.amount,
            description: self.description,
        }
    }
}
