mod schema;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::StorageError;
use crate::input;
use crate::models::{BudgetLimit, CategoryName, NewTransaction, Transaction};
use crate::store::{BudgetRegistry, LedgerStore};

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_budgets()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_budgets()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<(), StorageError> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            tracing::info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_budgets(&mut self) -> Result<(), StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for budget in BudgetLimit::defaults() {
            tx.execute(
                "INSERT OR IGNORE INTO budgets (category, monthly_limit) VALUES (?1, ?2)",
                params![budget.category.as_str(), budget.monthly_limit.to_string()],
            )?;
        }
        tx.commit()?;
        tracing::info!("seeded default budgets");
        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &NewTransaction) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO transactions (date, category, amount, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                txn.date.format("%Y-%m-%d").to_string(),
                txn.category.as_str(),
                txn.amount.to_string(),
                txn.description,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, category, amount, description FROM transactions ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let date_str: String = row.get(1)?;
            let category_str: String = row.get(2)?;
            let amount_str: String = row.get(3)?;
            let amount = Decimal::from_str(&amount_str).map_err(|e| conversion_error(3, e))?;
            Ok(Transaction {
                id: row.get(0)?,
                date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .map_err(|e| conversion_error(1, e))?,
                category: CategoryName::parse(&category_str)
                    .map_err(|e| conversion_error(2, e))?,
                amount: input::check_amount(amount).map_err(|e| conversion_error(3, e))?,
                description: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn get_budget(&self, category: &CategoryName) -> Result<Option<Decimal>, StorageError> {
        let result = self.conn.query_row(
            "SELECT monthly_limit FROM budgets WHERE category = ?1",
            params![category.as_str()],
            |row| {
                let amt_str: String = row.get(0)?;
                let limit = Decimal::from_str(&amt_str).map_err(|e| conversion_error(0, e))?;
                input::check_limit(limit).map_err(|e| conversion_error(0, e))
            },
        );
        match result {
            Ok(limit) => Ok(Some(limit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn upsert_budget(&self, category: &CategoryName, monthly_limit: Decimal) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO budgets (category, monthly_limit)
             VALUES (?1, ?2)
             ON CONFLICT(category) DO UPDATE SET monthly_limit = ?2",
            params![category.as_str(), monthly_limit.to_string()],
        )?;
        Ok(())
    }

    pub(crate) fn get_budgets(&self) -> Result<BTreeMap<CategoryName, Decimal>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, monthly_limit FROM budgets ORDER BY category")?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let amt_str: String = row.get(1)?;
            let limit = Decimal::from_str(&amt_str).map_err(|e| conversion_error(1, e))?;
            Ok((
                CategoryName::parse(&name).map_err(|e| conversion_error(0, e))?,
                input::check_limit(limit).map_err(|e| conversion_error(1, e))?,
            ))
        })?;
        Ok(rows.collect::<std::result::Result<BTreeMap<_, _>, _>>()?)
    }
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

impl LedgerStore for Database {
    fn record(&mut self, txn: &NewTransaction) -> Result<i64, StorageError> {
        let id = self.insert_transaction(txn)?;
        tracing::info!(id, category = %txn.category, amount = %txn.amount, "recorded transaction");
        Ok(id)
    }

    fn all(&self) -> Result<Vec<Transaction>, StorageError> {
        let txns = self.get_transactions()?;
        tracing::debug!(count = txns.len(), "loaded ledger from database");
        Ok(txns)
    }
}

impl BudgetRegistry for Database {
    fn get(&self, category: &CategoryName) -> Result<Option<Decimal>, StorageError> {
        self.get_budget(category)
    }

    fn set(&mut self, category: &CategoryName, monthly_limit: Decimal) -> Result<(), StorageError> {
        self.upsert_budget(category, monthly_limit)?;
        tracing::info!(%category, %monthly_limit, "budget limit set");
        Ok(())
    }

    fn all(&self) -> Result<BTreeMap<CategoryName, Decimal>, StorageError> {
        self.get_budgets()
    }
}
