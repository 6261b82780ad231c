pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::ledger::{LedgerUseCase, TradeHistory};
use crate::config::LedgerConfig;
use crate::domain::entities::trade_record::TradeRecord;
use crate::domain::error::DomainError;
use crate::domain::metrics::{DerivedTrade, MetricsSummary, TradeFilter};
use crate::domain::ports::trade_store::{LoadReport, TradeStore};
use crate::infrastructure::json_file::JsonFileTradeStore;
use std::path::Path;
use std::sync::Arc;

pub use crate::domain::metrics::{compute_derived, filter, latest, summarize};

/// Entry point for a presentation layer: one backing store, every ledger
/// operation.
pub struct TradeLedger {
    ledger_uc: LedgerUseCase,
}

impl TradeLedger {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::with_store(Arc::new(JsonFileTradeStore::new(path.as_ref())))
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::open(&config.trades_file)
    }

    pub fn with_store(store: Arc<dyn TradeStore>) -> Self {
        Self {
            ledger_uc: LedgerUseCase::new(store),
        }
    }

    pub fn load_all(&self) -> Result<LoadReport, DomainError> {
        self.ledger_uc.load()
    }

    pub fn append(&self, record: &TradeRecord) -> Result<(), DomainError> {
        self.ledger_uc.record(record)
    }

    pub fn replace_all(&self, records: &[TradeRecord]) -> Result<(), DomainError> {
        self.ledger_uc.replace_all(records)
    }

    pub fn history(&self, criteria: &TradeFilter) -> Result<TradeHistory, DomainError> {
        self.ledger_uc.history(criteria)
    }

    pub fn summary(&self, criteria: &TradeFilter) -> Result<MetricsSummary, DomainError> {
        self.ledger_uc.summary(criteria)
    }

    pub fn ticker(&self, n: usize) -> Result<Vec<DerivedTrade>, DomainError> {
        self.ledger_uc.ticker(n)
    }

    pub fn prune(&self) -> Result<usize, DomainError> {
        self.ledger_uc.prune()
    }
}
