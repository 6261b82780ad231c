use crate::domain::entities::trade_record::{RejectedRecord, TradeRecord};
use crate::domain::error::DomainError;
use crate::domain::metrics::{self, DerivedTrade, MetricsSummary, TradeFilter};
use crate::domain::ports::trade_store::{LoadReport, TradeStore};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct TradeHistory {
    pub trades: Vec<DerivedTrade>,
    pub rejected: Vec<RejectedRecord>,
}

pub struct LedgerUseCase {
    store: Arc<dyn TradeStore>,
}

impl LedgerUseCase {
    pub fn new(store: Arc<dyn TradeStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Result<LoadReport, DomainError> {
        self.store.load_all()
    }

    pub fn record(&self, trade: &TradeRecord) -> Result<(), DomainError> {
        self.store.append(trade)
    }

    pub fn replace_all(&self, trades: &[TradeRecord]) -> Result<(), DomainError> {
        self.store.replace_all(trades)
    }

    /// Matching trades with derived fields, alongside every stored row that
    /// could not be used.
    pub fn history(&self, criteria: &TradeFilter) -> Result<TradeHistory, DomainError> {
        let report = self.store.load_all()?;
        let matching = metrics::filter(&report.records, criteria);
        // load_all already validated every record, so nothing is rejected here.
        let trades = metrics::derive_all(&matching).0;
        Ok(TradeHistory {
            trades,
            rejected: report.rejected,
        })
    }

    pub fn summary(&self, criteria: &TradeFilter) -> Result<MetricsSummary, DomainError> {
        let report = self.store.load_all()?;
        Ok(metrics::summarize(&metrics::filter(&report.records, criteria)))
    }

    pub fn ticker(&self, n: usize) -> Result<Vec<DerivedTrade>, DomainError> {
        let report = self.store.load_all()?;
        // Loaded records are already validated; derive_all has nothing to reject.
        Ok(metrics::derive_all(&metrics::latest(&report.records, n)).0)
    }

    /// Rewrite the store keeping only rows that validate. Returns how many
    /// rows were dropped.
    pub fn prune(&self) -> Result<usize, DomainError> {
        let report = self.store.load_all()?;
        if report.rejected.is_empty() {
            return Ok(0);
        }
        self.store.replace_all(&report.records)?;
        tracing::info!(dropped = report.rejected.len(), "pruned invalid trades");
        Ok(report.rejected.len())
    }
}
