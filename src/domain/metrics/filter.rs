use crate::domain::entities::trade_record::{normalize_symbol, TradeRecord};
use crate::domain::values::trade_status::TradeStatus;
use crate::domain::values::trade_type::TradeType;
use chrono::{DateTime, Utc};

/// Combinable record criteria. Unset fields match everything; `from`/`to`
/// are inclusive bounds on `entry_time`.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub symbol: Option<String>,
    pub status: Option<TradeStatus>,
    pub trade_type: Option<TradeType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TradeFilter {
    pub fn symbol(mut self, symbol: &str) -> Self {
        self.symbol = Some(normalize_symbol(symbol));
        self
    }

    pub fn status(mut self, status: TradeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn trade_type(mut self, trade_type: TradeType) -> Self {
        self.trade_type = Some(trade_type);
        self
    }

    pub fn between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn matches(&self, record: &TradeRecord) -> bool {
        if let Some(symbol) = &self.symbol {
            if normalize_symbol(symbol) != normalize_symbol(&record.symbol) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.trade_type.is_some_and(|t| t != record.trade_type) {
            return false;
        }
        if self.from.is_some_and(|from| record.entry_time < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.entry_time > to) {
            return false;
        }
        true
    }
}

/// Records matching `criteria`, in their original order.
pub fn filter(records: &[TradeRecord], criteria: &TradeFilter) -> Vec<TradeRecord> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}
