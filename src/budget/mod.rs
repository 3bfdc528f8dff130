use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::aggregate;
use crate::error::StorageError;
use crate::models::{CategoryName, Transaction, YearMonth};
use crate::store::BudgetRegistry;

/// Outcome of comparing month-to-date spend plus a pending amount against a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BudgetStatus {
    NoLimitConfigured,
    WithinBudget {
        limit: Decimal,
        spent_this_month: Decimal,
        pending_amount: Decimal,
    },
    OverBudget {
        limit: Decimal,
        spent_this_month: Decimal,
        pending_amount: Decimal,
    },
}

impl BudgetStatus {
    /// Spending exactly up to the limit is still within budget.
    pub(crate) fn evaluate(limit: Option<Decimal>, spent_this_month: Decimal, pending_amount: Decimal) -> Self {
        let Some(limit) = limit else {
            return Self::NoLimitConfigured;
        };
        if spent_this_month + pending_amount > limit {
            Self::OverBudget {
                limit,
                spent_this_month,
                pending_amount,
            }
        } else {
            Self::WithinBudget {
                limit,
                spent_this_month,
                pending_amount,
            }
        }
    }

    pub(crate) fn is_over(&self) -> bool {
        matches!(self, Self::OverBudget { .. })
    }

    /// Amount left before the limit is reached, negative when over.
    pub(crate) fn remaining(&self) -> Option<Decimal> {
        match *self {
            Self::NoLimitConfigured => None,
            Self::WithinBudget {
                limit,
                spent_this_month,
                pending_amount,
            }
            | Self::OverBudget {
                limit,
                spent_this_month,
                pending_amount,
            } => Some(limit - spent_this_month - pending_amount),
        }
    }
}

/// Check `category` against its limit for the month containing `as_of`.
///
/// `txns` is the spend already on the books; `pending_amount` is added on top.
pub(crate) fn check(
    registry: &dyn BudgetRegistry,
    txns: &[Transaction],
    category: &CategoryName,
    pending_amount: Decimal,
    as_of: NaiveDate,
) -> Result<BudgetStatus, StorageError> {
    let Some(limit) = registry.get(category)? else {
        return Ok(BudgetStatus::NoLimitConfigured);
    };
    let spent = aggregate::category_spend(txns, category, YearMonth::from_date(as_of));
    Ok(BudgetStatus::evaluate(Some(limit), spent, pending_amount))
}
