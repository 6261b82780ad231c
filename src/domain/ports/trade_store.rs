use crate::domain::entities::trade_record::{RejectedRecord, TradeRecord};
use crate::domain::error::DomainError;
use serde::Serialize;

/// Result of reading the backing store: usable records in stored order, plus
/// the rows that failed validation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub records: Vec<TradeRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Durable, append-only trade history.
pub trait TradeStore: Send + Sync {
    /// A missing backing store is an empty history, not an error.
    fn load_all(&self) -> Result<LoadReport, DomainError>;
    fn append(&self, record: &TradeRecord) -> Result<(), DomainError>;
    fn replace_all(&self, records: &[TradeRecord]) -> Result<(), DomainError>;
}
