//! Shared test helpers.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::path::PathBuf;
use tempfile::TempDir;
use tradeledger::domain::entities::trade_record::TradeRecord;
use tradeledger::domain::values::trade_type::TradeType;
use tradeledger::TradeLedger;

pub struct Fixture {
    // Held so the directory outlives the test.
    pub dir: TempDir,
    pub path: PathBuf,
    pub ledger: TradeLedger,
}

pub fn setup() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("trades.json");
    let ledger = TradeLedger::open(&path);
    Fixture { dir, path, ledger }
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

pub fn closed_trade(symbol: &str, trade_type: TradeType, entry: f64, exit: f64, day: u32) -> TradeRecord {
    TradeRecord::new(symbol, trade_type, entry, at(day, 9)).closed(exit, at(day, 15))
}

pub fn open_trade(symbol: &str, trade_type: TradeType, entry: f64, day: u32) -> TradeRecord {
    TradeRecord::new(symbol, trade_type, entry, at(day, 9))
}
