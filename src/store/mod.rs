mod files;

pub(crate) use files::{write_ledger_csv, CsvLedger, JsonBudgets};

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::{Backend, Config};
use crate::db::Database;
use crate::error::StorageError;
use crate::models::{CategoryName, NewTransaction, Transaction};

/// Durable, append-only record of transactions.
pub(crate) trait LedgerStore {
    /// Append a transaction and return the id the store assigned to it.
    fn record(&mut self, txn: &NewTransaction) -> Result<i64, StorageError>;

    /// Every stored transaction, oldest first.
    fn all(&self) -> Result<Vec<Transaction>, StorageError>;
}

/// Durable mapping of category to monthly limit.
pub(crate) trait BudgetRegistry {
    fn get(&self, category: &CategoryName) -> Result<Option<Decimal>, StorageError>;
    fn set(&mut self, category: &CategoryName, monthly_limit: Decimal) -> Result<(), StorageError>;
    fn all(&self) -> Result<BTreeMap<CategoryName, Decimal>, StorageError>;
}

pub(crate) type Stores = (Box<dyn LedgerStore + Send>, Box<dyn BudgetRegistry + Send>);

/// Open the ledger and budget registry selected by `config`.
pub(crate) fn open(config: &Config) -> Result<Stores, StorageError> {
    std::fs::create_dir_all(&config.data_dir)?;
    match config.backend {
        Backend::Sqlite => {
            let path = config.data_dir.join("spendwise.db");
            tracing::debug!(path = %path.display(), "opening sqlite stores");
            // One connection per handle; SQLite serializes the writes.
            let ledger: Box<dyn LedgerStore + Send> = Box::new(Database::open(&path)?);
            let budgets: Box<dyn BudgetRegistry + Send> = Box::new(Database::open(&path)?);
            Ok((ledger, budgets))
        }
        Backend::Files => {
            let ledger_path = config.data_dir.join("expenses.csv");
            let budget_path = config.data_dir.join("budgets.json");
            tracing::debug!(
                ledger = %ledger_path.display(),
                budgets = %budget_path.display(),
                "opening file stores"
            );
            let ledger: Box<dyn LedgerStore + Send> = Box::new(CsvLedger::open(ledger_path)?);
            let budgets: Box<dyn BudgetRegistry + Send> = Box::new(JsonBudgets::open(budget_path)?);
            Ok((ledger, budgets))
        }
    }
}
