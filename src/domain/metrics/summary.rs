use crate::domain::entities::trade_record::{normalize_symbol, TradeRecord};
use crate::domain::metrics::derived::{derive_all, DerivedTrade};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Gross profit over gross loss. Degenerate cases are explicit variants
/// rather than float infinities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfitFactor {
    Ratio(f64),
    /// Winning trades but no losing ones.
    Unbounded,
    /// Neither winning nor losing trades.
    NotAvailable,
}

impl ProfitFactor {
    fn from_gross(gross_profit: f64, gross_loss: f64) -> Self {
        if gross_loss > 0.0 {
            ProfitFactor::Ratio(gross_profit / gross_loss)
        } else if gross_profit > 0.0 {
            ProfitFactor::Unbounded
        } else {
            ProfitFactor::NotAvailable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ProfitFactor::Ratio(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Ratio(v) => write!(f, "{v:.2}"),
            ProfitFactor::Unbounded => write!(f, "unbounded"),
            ProfitFactor::NotAvailable => write!(f, "N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub time: DateTime<Utc>,
    pub symbol: String,
    pub pnl: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SymbolBreakdown {
    /// All trades for the symbol, OPEN included.
    pub trades: usize,
    pub closed_trades: usize,
    pub winning_trades: usize,
    pub win_rate: Option<f64>,
    pub total_pnl: f64,
    pub avg_pnl: Option<f64>,
}

/// Aggregate performance over a set of trades. Every P&L statistic covers
/// CLOSED trades only; `win_rate` and `avg_pnl` are `None` when there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: Option<f64>,
    pub total_pnl: f64,
    pub avg_pnl: Option<f64>,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: ProfitFactor,
    pub best_trade: Option<DerivedTrade>,
    pub worst_trade: Option<DerivedTrade>,
    pub cumulative_pnl: Vec<CumulativePoint>,
    pub per_symbol: BTreeMap<String, SymbolBreakdown>,
    pub skipped_records: usize,
}

impl MetricsSummary {
    pub fn win_rate_pct(&self) -> Option<f64> {
        self.win_rate.map(|w| w * 100.0)
    }
}

pub fn summarize(records: &[TradeRecord]) -> MetricsSummary {
    let (derived, rejected) = derive_all(records);

    let closed: Vec<(&DerivedTrade, f64)> = derived
        .iter()
        .filter_map(|d| d.pnl.map(|pnl| (d, pnl)))
        .collect();

    let winning_trades = closed.iter().filter(|(_, pnl)| *pnl > 0.0).count();
    let losing_trades = closed.iter().filter(|(_, pnl)| *pnl < 0.0).count();
    let total_pnl: f64 = closed.iter().map(|(_, pnl)| pnl).sum();
    let gross_profit: f64 = closed.iter().map(|(_, pnl)| pnl.max(0.0)).sum();
    let gross_loss: f64 = closed.iter().map(|(_, pnl)| (-pnl).max(0.0)).sum();

    // First occurrence wins ties.
    let mut best: Option<(&DerivedTrade, f64)> = None;
    let mut worst: Option<(&DerivedTrade, f64)> = None;
    for &(trade, pnl) in &closed {
        if best.map_or(true, |(_, b)| pnl > b) {
            best = Some((trade, pnl));
        }
        if worst.map_or(true, |(_, w)| pnl < w) {
            worst = Some((trade, pnl));
        }
    }

    MetricsSummary {
        total_trades: derived.len(),
        open_trades: derived.len() - closed.len(),
        closed_trades: closed.len(),
        winning_trades,
        losing_trades,
        win_rate: ratio(winning_trades as f64, closed.len()),
        total_pnl,
        avg_pnl: ratio(total_pnl, closed.len()),
        gross_profit,
        gross_loss,
        profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
        best_trade: best.map(|(t, _)| t.clone()),
        worst_trade: worst.map(|(t, _)| t.clone()),
        cumulative_pnl: cumulative_series(&closed),
        per_symbol: per_symbol(&derived),
        skipped_records: rejected.len(),
    }
}

fn ratio(numerator: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| numerator / count as f64)
}

fn cumulative_series(closed: &[(&DerivedTrade, f64)]) -> Vec<CumulativePoint> {
    let mut by_exit: Vec<(DateTime<Utc>, &DerivedTrade, f64)> = closed
        .iter()
        .filter_map(|&(t, pnl)| t.record.exit_time.map(|time| (time, t, pnl)))
        .collect();
    by_exit.sort_by_key(|(time, _, _)| *time);

    let mut running = 0.0;
    by_exit
        .into_iter()
        .map(|(time, trade, pnl)| {
            running += pnl;
            CumulativePoint {
                time,
                symbol: trade.record.symbol.clone(),
                pnl,
                cumulative: running,
            }
        })
        .collect()
}

fn per_symbol(derived: &[DerivedTrade]) -> BTreeMap<String, SymbolBreakdown> {
    let mut map: BTreeMap<String, SymbolBreakdown> = BTreeMap::new();
    for trade in derived {
        let entry = map.entry(normalize_symbol(&trade.record.symbol)).or_default();
        entry.trades += 1;
        if let Some(pnl) = trade.pnl {
            entry.closed_trades += 1;
            entry.total_pnl += pnl;
            if pnl > 0.0 {
                entry.winning_trades += 1;
            }
        }
    }
    for breakdown in map.values_mut() {
        breakdown.win_rate = ratio(breakdown.winning_trades as f64, breakdown.closed_trades);
        breakdown.avg_pnl = ratio(breakdown.total_pnl, breakdown.closed_trades);
    }
    map
}
