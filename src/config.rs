use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Backend {
    /// One SQLite database holding the ledger and the budgets.
    Sqlite,
    /// `expenses.csv` plus `budgets.json`.
    Files,
}

impl Backend {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "db" => Some(Self::Sqlite),
            "files" | "file" | "csv" => Some(Self::Files),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Files => "files",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) backend: Backend,
    pub(crate) outbox_dir: PathBuf,
    pub(crate) log_filter: String,
}

pub(crate) const DEFAULT_LOG_FILTER: &str = "spendwise=info";

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup` (an environment-like key/value source).
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = match value("SPENDWISE_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let backend = match value("SPENDWISE_BACKEND") {
            Some(raw) => Backend::parse(&raw).with_context(|| {
                format!("Unknown SPENDWISE_BACKEND '{raw}' (expected 'sqlite' or 'files')")
            })?,
            None => Backend::Sqlite,
        };

        let outbox_dir = value("SPENDWISE_OUTBOX")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("outbox"));

        let log_filter = value("RUST_LOG")
            .or_else(|| value("SPENDWISE_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            backend,
            outbox_dir,
            log_filter,
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendwise", "Spendwise")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_settings() {
        let config = Config::from_lookup(lookup(&[
            ("SPENDWISE_DATA_DIR", "/tmp/spend"),
            ("SPENDWISE_BACKEND", "Files"),
            ("SPENDWISE_OUTBOX", "/tmp/mail"),
            ("SPENDWISE_LOG", "spendwise=debug"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/spend"));
        assert_eq!(config.backend, Backend::Files);
        assert_eq!(config.outbox_dir, PathBuf::from("/tmp/mail"));
        assert_eq!(config.log_filter, "spendwise=debug");
    }

    #[test]
    fn test_defaults_derive_from_data_dir() {
        let config = Config::from_lookup(lookup(&[("SPENDWISE_DATA_DIR", "/tmp/spend")])).unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.outbox_dir, PathBuf::from("/tmp/spend/outbox"));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_rust_log_wins() {
        let config = Config::from_lookup(lookup(&[
            ("SPENDWISE_DATA_DIR", "/tmp/spend"),
            ("SPENDWISE_LOG", "spendwise=debug"),
            ("RUST_LOG", "warn"),
        ]))
        .unwrap();
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_blank_values_ignored() {
        let config = Config::from_lookup(lookup(&[
            ("SPENDWISE_DATA_DIR", "/tmp/spend"),
            ("SPENDWISE_BACKEND", "  "),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("SPENDWISE_DATA_DIR", "/tmp/spend"),
            ("SPENDWISE_BACKEND", "postgres"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }

    #[test]
    fn test_backend_names() {
        for backend in [Backend::Sqlite, Backend::Files] {
            assert_eq!(Backend::parse(backend.as_str()), Some(backend));
        }
        assert_eq!(Backend::parse("CSV"), Some(Backend::Files));
    }
}
