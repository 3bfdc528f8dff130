use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of the backing medium. Never retried; surfaced to the caller.
#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt record at {location}: {reason}")]
    Corrupt { location: String, reason: String },
}

/// Input rejected before it reaches a store.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ValidationError {
    #[error("amount '{0}' is not a number")]
    InvalidAmount(String),
    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),
    #[error("amount {0} is above the maximum of {max}", max = crate::input::MAX_AMOUNT)]
    AmountTooLarge(Decimal),
    #[error("date '{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("month '{0}' is not a YYYY-MM month")]
    InvalidMonth(String),
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("budget limit {0} is negative")]
    NegativeLimit(Decimal),
    #[error("budget limit {0} is above the maximum of {max}", max = crate::input::MAX_AMOUNT)]
    LimitTooLarge(Decimal),
}

#[derive(Debug, Error)]
pub(crate) enum TrackerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not enough history to forecast: {months} month(s), need {required}")]
    InsufficientData { months: usize, required: usize },
}
