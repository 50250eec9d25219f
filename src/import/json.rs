use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::SourceError;
use crate::models::Transaction;

/// Read a JSON array of transaction objects.
pub(crate) fn read_json(path: &Path) -> Result<Vec<Transaction>, SourceError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
