mod csv_import;
mod json;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::Transaction;

pub(crate) use csv_import::read_csv;
pub(crate) use json::read_json;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {line}: {reason}")]
    Row { line: usize, reason: String },
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// Anything that can hand over a full transaction dataset.
pub trait TransactionSource {
    fn load(&self) -> Result<Vec<Transaction>, SourceError>;

    /// Human-readable origin, used in logs and the status bar.
    fn describe(&self) -> String;
}

/// A dataset file, read as JSON or CSV depending on its extension.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionSource for FileSource {
    fn load(&self) -> Result<Vec<Transaction>, SourceError> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let txs = match ext.as_str() {
            "json" => read_json(&self.path)?,
            "csv" => read_csv(&self.path)?,
            _ => return Err(SourceError::UnsupportedFormat(self.path.display().to_string())),
        };
        Ok(normalize(txs))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Load from `source`, falling back to an empty dataset on failure.
pub fn load_or_empty(source: &dyn TransactionSource) -> Vec<Transaction> {
    match source.load() {
        Ok(txs) => {
            tracing::info!(source = %source.describe(), count = txs.len(), "dataset loaded");
            txs
        }
        Err(e) => {
            tracing::error!(source = %source.describe(), error = %e, "dataset load failed");
            Vec::new()
        }
    }
}

/// Amounts are magnitudes; direction comes from the transaction type.
fn normalize(mut txs: Vec<Transaction>) -> Vec<Transaction> {
    for tx in &mut txs {
        if tx.amount.is_sign_negative() && !tx.amount.is_zero() {
            tracing::warn!(id = %tx.id, amount = %tx.amount, "negative amount, using magnitude");
            tx.amount = tx.amount.abs();
        }
    }
    txs
}
