use crate::domain::entities::trade_record::{RejectedRecord, TradeRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::trade_store::{LoadReport, TradeStore};
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Trade history kept as a pretty-printed JSON array in a single file.
///
/// Writes go through a sibling temp file and a rename, so a failed write
/// leaves the previous contents in place. There is no locking: with several
/// writers the last one wins.
pub struct JsonFileTradeStore {
    path: PathBuf,
}

impl JsonFileTradeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<Value>, DomainError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "trade file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_str(&content).map_err(|e| {
            DomainError::Storage(format!("{} is not valid JSON: {e}", self.path.display()))
        })?;
        match value {
            Value::Array(rows) => Ok(rows),
            other => Err(DomainError::Storage(format!(
                "{} must contain a JSON array of trades, found {}",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }

    fn write_rows(&self, rows: &[Value]) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                DomainError::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let mut json = serde_json::to_string_pretty(rows)
            .map_err(|e| DomainError::Storage(format!("Failed to encode trades: {e}")))?;
        json.push('\n');

        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(DomainError::Storage(format!(
                "Failed to write {}: {e}",
                tmp.display()
            )));
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(DomainError::Storage(format!(
                "Failed to replace {}: {e}",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .unwrap_or_else(|| OsStr::new("trades.json"))
            .to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TradeStore for JsonFileTradeStore {
    fn load_all(&self) -> Result<LoadReport, DomainError> {
        let rows = self.read_rows()?;
        let mut report = LoadReport::default();
        for (index, row) in rows.into_iter().enumerate() {
            match TradeRecord::from_json(&row) {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    let rejected = RejectedRecord::new(index, row, e);
                    tracing::warn!(
                        path = %self.path.display(),
                        "skipping invalid trade: {}",
                        rejected.error
                    );
                    report.rejected.push(rejected);
                }
            }
        }
        tracing::debug!(
            path = %self.path.display(),
            loaded = report.records.len(),
            rejected = report.rejected.len(),
            "loaded trades"
        );
        Ok(report)
    }

    fn append(&self, record: &TradeRecord) -> Result<(), DomainError> {
        record.validate()?;
        // Existing rows are carried over untouched, including ones that fail validation.
        let mut rows = self.read_rows()?;
        rows.push(encode(record)?);
        self.write_rows(&rows)?;
        tracing::info!(symbol = %record.symbol, status = %record.status, total = rows.len(), "appended trade");
        Ok(())
    }

    fn replace_all(&self, records: &[TradeRecord]) -> Result<(), DomainError> {
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            record.validate().map_err(|e| e.at(index))?;
            rows.push(encode(record)?);
        }
        self.write_rows(&rows)?;
        tracing::info!(path = %self.path.display(), total = rows.len(), "rewrote trade file");
        Ok(())
    }
}

fn encode(record: &TradeRecord) -> Result<Value, DomainError> {
    serde_json::to_value(record)
        .map_err(|e| DomainError::Storage(format!("Failed to encode trade: {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
