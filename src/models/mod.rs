mod budget;
mod category;
mod month;
mod transaction;

pub(crate) use budget::BudgetLimit;
pub(crate) use category::CategoryName;
pub(crate) use month::YearMonth;
pub(crate) use transaction::{NewTransaction, Transaction};
