use std::path::PathBuf;

pub const DEFAULT_TRADES_FILE: &str = "data/trades.json";

/// Where the ledger keeps its backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub trades_file: PathBuf,
}

impl LedgerConfig {
    pub fn new(trades_file: impl Into<PathBuf>) -> Self {
        Self {
            trades_file: trades_file.into(),
        }
    }

    /// Reads `TRADELEDGER_FILE`, falling back to `data/trades.json`.
    pub fn from_env() -> Self {
        let trades_file = std::env::var("TRADELEDGER_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TRADES_FILE.into());
        Self::new(trades_file)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TRADES_FILE)
    }
}
