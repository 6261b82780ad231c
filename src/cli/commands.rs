use crate::domain::error::DomainError;
use crate::domain::metrics::TradeFilter;
use crate::domain::values::timestamp::{parse_range_end, parse_timestamp};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tradeledger", about = "Trade journal with performance metrics")]
pub struct Cli {
    /// Backing trade file (overrides TRADELEDGER_FILE)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new trade
    Add {
        /// Ticker symbol (e.g. AAPL)
        symbol: String,
        /// Trade type (buy, sell)
        trade_type: String,
        /// Entry price
        entry_price: String,
        /// Entry time (RFC3339, YYYY-MM-DD HH:MM or YYYY-MM-DD); defaults to now
        #[arg(long)]
        entry_time: Option<String>,
        /// Exit price
        #[arg(long)]
        exit_price: Option<String>,
        /// Exit time; defaults to now when an exit price is given
        #[arg(long)]
        exit_time: Option<String>,
        /// Status (open, closed); defaults to closed when an exit price is given
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List trades with computed P&L
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// Show performance metrics
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show the most recent trades, newest first
    Ticker {
        #[arg(long, default_value = "15")]
        count: usize,
    },
    /// Show stored rows that failed validation
    Rejected,
    /// Rewrite the trade file without rows that fail validation
    Prune,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub symbol: Option<String>,
    /// Status (open, closed)
    #[arg(long)]
    pub status: Option<String>,
    /// Trade type (buy, sell)
    #[arg(long = "type")]
    pub trade_type: Option<String>,
    /// Start of entry-time range, inclusive (YYYY-MM-DD or RFC3339)
    #[arg(long)]
    pub from: Option<String>,
    /// End of entry-time range, inclusive (YYYY-MM-DD or RFC3339)
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<TradeFilter, DomainError> {
        let mut filter = TradeFilter::default();
        if let Some(symbol) = &self.symbol {
            filter = filter.symbol(symbol);
        }
        if let Some(status) = &self.status {
            filter = filter.status(status.parse().map_err(DomainError::InvalidInput)?);
        }
        if let Some(trade_type) = &self.trade_type {
            filter = filter.trade_type(trade_type.parse().map_err(DomainError::InvalidInput)?);
        }
        let from = self
            .from
            .as_deref()
            .map(|s| parse_timestamp(s).ok_or_else(|| invalid_date(s)))
            .transpose()?;
        let to = self
            .to
            .as_deref()
            .map(|s| parse_range_end(s).ok_or_else(|| invalid_date(s)))
            .transpose()?;
        Ok(filter.between(from, to))
    }
}

fn invalid_date(s: &str) -> DomainError {
    DomainError::InvalidInput(format!("Invalid date: {s}. Use YYYY-MM-DD or RFC3339"))
}
