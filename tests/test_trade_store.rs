mod common;

use common::{closed_trade, open_trade, setup};
use serde_json::{json, Value};
use tradeledger::domain::error::{DomainError, Violation};
use tradeledger::domain::ports::trade_store::TradeStore;
use tradeledger::domain::values::trade_type::TradeType;
use tradeledger::infrastructure::json_file::JsonFileTradeStore;

#[test]
fn test_missing_file_is_empty() {
    let fx = setup();
    let report = fx.ledger.load_all().unwrap();
    assert!(report.records.is_empty());
    assert!(report.rejected.is_empty());
    assert!(!fx.path.exists());
}

#[test]
fn test_blank_file_is_empty() {
    let fx = setup();
    std::fs::create_dir_all(fx.path.parent().unwrap()).unwrap();
    std::fs::write(&fx.path, "  \n").unwrap();
    assert!(fx.ledger.load_all().unwrap().records.is_empty());
}

#[test]
fn test_corrupt_file_is_storage_error() {
    let fx = setup();
    std::fs::create_dir_all(fx.path.parent().unwrap()).unwrap();
    std::fs::write(&fx.path, "[{\"symbol\": \"AAPL\",").unwrap();
    let err = fx.ledger.load_all().unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));
}

#[test]
fn test_non_array_file_is_storage_error() {
    let fx = setup();
    std::fs::create_dir_all(fx.path.parent().unwrap()).unwrap();
    std::fs::write(&fx.path, "{\"trades\": []}").unwrap();
    let err = fx.ledger.load_all().unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));
}

#[test]
fn test_append_then_load_round_trip() {
    let fx = setup();
    let first = closed_trade("AAPL", TradeType::Buy, 150.25, 151.50, 2).with_notes("gap up");
    let second = open_trade("TSLA", TradeType::Sell, 200.0, 3);
    fx.ledger.append(&first).unwrap();
    fx.ledger.append(&second).unwrap();

    let third = closed_trade("MSFT", TradeType::Sell, 410.0, 405.5, 4);
    fx.ledger.append(&third).unwrap();

    let report = fx.ledger.load_all().unwrap();
    assert_eq!(report.records, vec![first, second, third]);
    assert!(report.rejected.is_empty());
}

#[test]
fn test_file_is_a_json_array() {
    let fx = setup();
    fx.ledger
        .append(&closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2))
        .unwrap();
    let content = std::fs::read_to_string(&fx.path).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["type"], "BUY");
    assert!(rows[0].get("pnl").is_none());
}

#[test]
fn test_append_rejects_invalid_record() {
    let fx = setup();
    let mut trade = closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2);
    trade.exit_time = None;
    trade.entry_price = -1.0;

    match fx.ledger.append(&trade).unwrap_err() {
        DomainError::Validation(e) => {
            assert!(e.contains(&Violation::ClosedMissingExit("exit_time")));
            assert!(e.contains(&Violation::NonPositivePrice {
                field: "entry_price",
                value: -1.0
            }));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(!fx.path.exists());
}

#[test]
fn test_append_to_corrupt_file_leaves_it_alone() {
    let fx = setup();
    std::fs::create_dir_all(fx.path.parent().unwrap()).unwrap();
    std::fs::write(&fx.path, "not json").unwrap();
    let err = fx
        .ledger
        .append(&closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2))
        .unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));
    assert_eq!(std::fs::read_to_string(&fx.path).unwrap(), "not json");
}

#[test]
fn test_invalid_rows_are_skipped_and_reported() {
    let fx = setup();
    std::fs::create_dir_all(fx.path.parent().unwrap()).unwrap();
    let rows = json!([
        {"symbol": "AAPL", "entry_price": 150.25, "exit_price": 151.5,
         "entry_time": "2024-01-02T09:30:00", "exit_time": "2024-01-02T15:00:00",
         "type": "BUY", "status": "CLOSED"},
        {"symbol": "BAD", "entry_price": -3.0, "entry_time": "2024-01-03T09:30:00",
         "type": "BUY", "status": "OPEN"},
        {"symbol": "TSLA", "entry_price": 200, "exit_price": 210,
         "entry_time": "2024-01-04T09:30:00", "exit_time": "2024-01-04T15:00:00",
         "type": "SELL", "status": "CLOSED"}
    ]);
    std::fs::write(&fx.path, rows.to_string()).unwrap();

    let report = fx.ledger.load_all().unwrap();
    let symbols: Vec<&str> = report.records.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "TSLA"]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].index, 1);
    assert_eq!(report.rejected[0].raw["symbol"], "BAD");
    assert!(report.rejected[0].error.contains(&Violation::NonPositivePrice {
        field: "entry_price",
        value: -3.0
    }));
}

#[test]
fn test_append_keeps_rows_it_cannot_parse() {
    let fx = setup();
    std::fs::create_dir_all(fx.path.parent().unwrap()).unwrap();
    std::fs::write(&fx.path, r#"[{"symbol": "", "note": "hand edited"}]"#).unwrap();

    fx.ledger
        .append(&closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2))
        .unwrap();

    let value: Value = serde_json::from_str(&std::fs::read_to_string(&fx.path).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["note"], "hand edited");

    let report = fx.ledger.load_all().unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.rejected.len(), 1);
}

#[test]
fn test_replace_all_validates_before_writing() {
    let fx = setup();
    let good = closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2);
    fx.ledger.append(&good).unwrap();

    let mut bad = open_trade("TSLA", TradeType::Buy, 5.0, 3);
    bad.symbol = String::new();
    let err = fx.ledger.replace_all(&[good.clone(), bad]).unwrap_err();
    match err {
        DomainError::Validation(e) => assert_eq!(e.index, Some(1)),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(fx.ledger.load_all().unwrap().records, vec![good]);
}

#[test]
fn test_store_without_parent_directory_component() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileTradeStore::new(dir.path().join("trades.json"));
    store
        .append(&open_trade("AAPL", TradeType::Buy, 10.0, 2))
        .unwrap();
    assert_eq!(store.load_all().unwrap().records.len(), 1);
    assert!(!dir.path().join("trades.json.tmp").exists());
}

#[test]
fn test_append_rejects_lowercase_symbol() {
    let fx = setup();
    let mut trade = closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2);
    trade.symbol = "aapl".into();

    match fx.ledger.append(&trade).unwrap_err() {
        DomainError::Validation(e) => {
            assert!(e.contains(&Violation::SymbolNotNormalized("aapl".into())));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(!fx.path.exists());
}

#[test]
fn test_appended_record_loads_back_equal() {
    let fx = setup();
    let mut trade = closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2);
    trade.notes = Some("  spaced ".into());
    fx.ledger.append(&trade).unwrap();

    let report = fx.ledger.load_all().unwrap();
    assert_eq!(report.records, vec![trade]);
}

#[test]
fn test_lowercase_row_on_disk_groups_with_uppercase() {
    let fx = setup();
    fx.ledger
        .append(&closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2))
        .unwrap();
    let mut rows: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(&fx.path).unwrap()).unwrap();
    let mut lowercase = rows[0].clone();
    lowercase["symbol"] = json!(" aapl ");
    lowercase["id"] = json!("hand-written");
    rows.push(lowercase);
    std::fs::write(&fx.path, serde_json::to_string_pretty(&rows).unwrap()).unwrap();

    let report = fx.ledger.load_all().unwrap();
    assert!(report.rejected.is_empty());
    assert!(report.records.iter().all(|r| r.symbol == "AAPL"));
    let summary = tradeledger::summarize(&report.records);
    assert_eq!(summary.per_symbol.keys().collect::<Vec<_>>(), vec!["AAPL"]);
    assert_eq!(summary.per_symbol["AAPL"].trades, 2);
}

#[test]
fn test_failed_temp_write_keeps_original_file() {
    let fx = setup();
    fx.ledger
        .append(&closed_trade("AAPL", TradeType::Buy, 10.0, 11.0, 2))
        .unwrap();
    let before = std::fs::read_to_string(&fx.path).unwrap();
    // A directory where the temp file should go makes the write fail.
    std::fs::create_dir(fx.path.with_file_name("trades.json.tmp")).unwrap();

    let err = fx
        .ledger
        .append(&open_trade("TSLA", TradeType::Sell, 200.0, 3))
        .unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));
    assert_eq!(std::fs::read_to_string(&fx.path).unwrap(), before);
}
