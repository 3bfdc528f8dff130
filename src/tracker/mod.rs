use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::aggregate::{self, MonthBucket};
use crate::budget::{self, BudgetStatus};
use crate::error::TrackerError;
use crate::forecast::{self, Forecast};
use crate::input::{self, ExpenseInput};
use crate::models::{CategoryName, Transaction, YearMonth};
use crate::report::MonthlyReport;
use crate::store::{BudgetRegistry, LedgerStore, Stores};

/// Result of adding an expense. The transaction is durable regardless of
/// whether the advisory budget check succeeded.
#[derive(Debug)]
pub(crate) struct Recorded {
    pub(crate) transaction: Transaction,
    pub(crate) budget: Result<BudgetStatus, TrackerError>,
}

/// The ledger and budget registry, opened once and shared by the front ends.
pub(crate) struct Tracker {
    ledger: Box<dyn LedgerStore + Send>,
    budgets: Box<dyn BudgetRegistry + Send>,
}

impl Tracker {
    pub(crate) fn new(stores: Stores) -> Self {
        let (ledger, budgets) = stores;
        Self { ledger, budgets }
    }

    /// Validate, record, then check the category budget for the month of the
    /// expense. The new row is not counted twice: it is the pending amount.
    pub(crate) fn add_expense(&mut self, input: &ExpenseInput<'_>, today: NaiveDate) -> Result<Recorded, TrackerError> {
        let new = input.validate(today)?;
        let id = self.ledger.record(&new)?;
        let transaction = new.into_transaction(id);

        let budget = self.ledger.all().map_err(TrackerError::from).and_then(|txns| {
            let prior: Vec<Transaction> = txns.into_iter().filter(|t| t.id != id).collect();
            budget::check(
                self.budgets.as_ref(),
                &prior,
                &transaction.category,
                transaction.amount,
                transaction.date,
            )
            .map_err(TrackerError::from)
        });

        match &budget {
            Ok(status @ BudgetStatus::OverBudget { .. }) => {
                tracing::warn!(category = %transaction.category, ?status, "expense exceeds budget");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(id, error = %e, "budget check failed after recording"),
        }

        Ok(Recorded {
            transaction,
            budget,
        })
    }

    pub(crate) fn transactions(&self) -> Result<Vec<Transaction>, TrackerError> {
        Ok(self.ledger.all()?)
    }

    pub(crate) fn monthly_totals(&self) -> Result<Vec<MonthBucket>, TrackerError> {
        Ok(aggregate::by_month(&self.transactions()?))
    }

    pub(crate) fn category_totals(&self) -> Result<BTreeMap<CategoryName, Decimal>, TrackerError> {
        Ok(aggregate::by_category(&self.transactions()?))
    }

    pub(crate) fn month_transactions(&self, month: YearMonth) -> Result<Vec<Transaction>, TrackerError> {
        Ok(aggregate::filter_month(&self.transactions()?, month))
    }

    pub(crate) fn check_budget(
        &self,
        category: &CategoryName,
        pending_amount: Decimal,
        as_of: NaiveDate,
    ) -> Result<BudgetStatus, TrackerError> {
        let txns = self.transactions()?;
        Ok(budget::check(
            self.budgets.as_ref(),
            &txns,
            category,
            pending_amount,
            as_of,
        )?)
    }

    pub(crate) fn forecast(&self) -> Result<Forecast, TrackerError> {
        let forecast = Forecast::fit(&self.transactions()?)?;
        if forecast.predicted < Decimal::ZERO {
            tracing::warn!(predicted = %forecast.predicted, "forecast is negative; trend is falling");
        }
        Ok(forecast)
    }

    pub(crate) fn predict_next_month(&self) -> Result<Decimal, TrackerError> {
        forecast::predict_next_month(&self.transactions()?)
    }

    pub(crate) fn monthly_report(&self, month: YearMonth) -> Result<MonthlyReport, TrackerError> {
        Ok(MonthlyReport::build(month, &self.transactions()?))
    }

    pub(crate) fn set_budget(&mut self, category: &CategoryName, monthly_limit: Decimal) -> Result<(), TrackerError> {
        let monthly_limit = input::check_limit(monthly_limit)?;
        self.budgets.set(category, monthly_limit)?;
        Ok(())
    }

    pub(crate) fn budgets(&self) -> Result<BTreeMap<CategoryName, Decimal>, TrackerError> {
        Ok(self.budgets.all()?)
    }
}
