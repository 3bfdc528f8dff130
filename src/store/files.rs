use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{BudgetRegistry, LedgerStore};
use crate::error::StorageError;
use crate::input;
use crate::models::{BudgetLimit, CategoryName, NewTransaction, Transaction};

const HEADER: [&str; 4] = ["Date", "Category", "Amount", "Description"];

/// Ledger kept as a CSV file. Ids are 1-based row positions below the header.
pub(crate) struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if !path.exists() {
            write_ledger_csv(File::create(&path)?, &[])?;
        }
        Ok(Self { path })
    }

    fn reader(&self) -> Result<csv::Reader<File>, StorageError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let headers = rdr.headers()?;
        if headers.iter().ne(HEADER) {
            return Err(StorageError::Corrupt {
                location: format!("{} header", self.path.display()),
                reason: format!("expected {}", HEADER.join(",")),
            });
        }
        Ok(rdr)
    }
}

impl LedgerStore for CsvLedger {
    fn record(&mut self, txn: &NewTransaction) -> Result<i64, StorageError> {
        let existing = self.reader()?.records().count();
        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        if !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.write_record(row(txn.date, &txn.category, txn.amount, &txn.description))?;
        wtr.flush()?;
        let id = existing as i64 + 1;
        tracing::info!(id, category = %txn.category, amount = %txn.amount, "recorded transaction");
        Ok(id)
    }

    fn all(&self) -> Result<Vec<Transaction>, StorageError> {
        let mut txns = Vec::new();
        for (i, result) in self.reader()?.records().enumerate() {
            let record = result?;
            let id = i as i64 + 1;
            let location = || format!("{} row {}", self.path.display(), id);

            let field = |idx: usize| record.get(idx).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(field(0), "%Y-%m-%d").map_err(|e| {
                StorageError::Corrupt {
                    location: location(),
                    reason: format!("bad date '{}': {e}", field(0)),
                }
            })?;
            let category =
                CategoryName::parse(field(1)).map_err(|e| StorageError::Corrupt {
                    location: location(),
                    reason: e.to_string(),
                })?;
            let amount = Decimal::from_str(field(2)).map_err(|e| StorageError::Corrupt {
                location: location(),
                reason: format!("bad amount '{}': {e}", field(2)),
            })?;
            let amount = input::check_amount(amount).map_err(|e| StorageError::Corrupt {
                location: location(),
                reason: e.to_string(),
            })?;

            txns.push(Transaction {
                id,
                date,
                category,
                amount,
                description: record.get(3).unwrap_or("").to_string(),
            });
        }
        tracing::debug!(count = txns.len(), "loaded ledger from csv");
        Ok(txns)
    }
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn row(date: NaiveDate, category: &CategoryName, amount: Decimal, description: &str) -> [String; 4] {
    [
        date.format("%Y-%m-%d").to_string(),
        category.to_string(),
        amount.to_string(),
        description.to_string(),
    ]
}

/// Write a header row followed by one row per transaction. Returns the row count.
pub(crate) fn write_ledger_csv<W: Write>(writer: W, txns: &[Transaction]) -> Result<usize, StorageError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for txn in txns {
        wtr.write_record(row(txn.date, &txn.category, txn.amount, &txn.description))?;
    }
    wtr.flush()?;
    Ok(txns.len())
}

/// Budget registry kept as a JSON object of category name to limit.
pub(crate) struct JsonBudgets {
    path: PathBuf,
}

impl JsonBudgets {
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let registry = Self { path: path.into() };
        if !registry.path.exists() {
            let seeds: BTreeMap<CategoryName, Decimal> = BudgetLimit::defaults()
                .into_iter()
                .map(|b| (b.category, b.monthly_limit))
                .collect();
            registry.save(&seeds)?;
            tracing::info!(path = %registry.path.display(), "seeded default budgets");
        }
        Ok(registry)
    }

    fn load(&self) -> Result<BTreeMap<CategoryName, Decimal>, StorageError> {
        let text = fs::read_to_string(&self.path)?;
        let raw: Map<String, Value> = serde_json::from_str(&text)?;
        let corrupt = |key: &str, reason: String| StorageError::Corrupt {
            location: format!("{} key '{key}'", self.path.display()),
            reason,
        };

        let mut limits = BTreeMap::new();
        for (key, value) in raw {
            let category = CategoryName::parse(&key).map_err(|e| corrupt(&key, e.to_string()))?;
            let text = match &value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.trim().to_string(),
                other => return Err(corrupt(&key, format!("expected a number, got {other}"))),
            };
            let limit = Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|e| corrupt(&key, format!("bad limit '{text}': {e}")))?;
            let limit = input::check_limit(limit).map_err(|e| corrupt(&key, e.to_string()))?;
            limits.insert(category, limit);
        }
        Ok(limits)
    }

    fn save(&self, limits: &BTreeMap<CategoryName, Decimal>) -> Result<(), StorageError> {
        let mut obj = Map::new();
        for (category, limit) in limits {
            let number = limit_to_json(*limit).ok_or_else(|| StorageError::Corrupt {
                location: format!("{} key '{category}'", self.path.display()),
                reason: format!("limit {limit} cannot be written as a JSON number"),
            })?;
            obj.insert(category.to_string(), Value::Number(number));
        }
        let json = serde_json::to_string_pretty(&Value::Object(obj))?;
        let tmp = tmp_path(&self.path);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// `None` when the limit has no JSON number that reads back as the same value.
fn limit_to_json(limit: Decimal) -> Option<Number> {
    let number = if limit.fract().is_zero() {
        limit.to_i64().map(Number::from)
    } else {
        limit.to_f64().and_then(Number::from_f64)
    }?;
    let exact = Decimal::from_str(&number.to_string()).is_ok_and(|back| back == limit);
    exact.then_some(number)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

impl BudgetRegistry for JsonBudgets {
    fn get(&self, category: &CategoryName) -> Result<Option<Decimal>, StorageError> {
        Ok(self.load()?.get(category).copied())
    }

    fn set(&mut self, category: &CategoryName, monthly_limit: Decimal) -> Result<(), StorageError> {
        let mut limits = self.load()?;
        limits.insert(category.clone(), monthly_limit);
        self.save(&limits)?;
        tracing::info!(%category, %monthly_limit, "budget limit set");
        Ok(())
    }

    fn all(&self) -> Result<BTreeMap<CategoryName, Decimal>, StorageError> {
        self.load()
    }
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
