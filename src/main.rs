use chrono::Utc;
use clap::Parser;
use tradeledger::application::trade_form::TradeForm;
use tradeledger::cli::commands::{Cli, Commands};
use tradeledger::config::LedgerConfig;
use tradeledger::domain::metrics::DerivedTrade;
use tradeledger::TradeLedger;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = LedgerConfig::from_env();
    if let Some(file) = cli.file {
        config.trades_file = file;
    }

    let ledger = TradeLedger::from_config(&config);
    if let Err(e) = run_command(&ledger, cli.command) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run_command(ledger: &TradeLedger, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Add {
            symbol,
            trade_type,
            entry_price,
            entry_time,
            exit_price,
            exit_time,
            status,
            notes,
        } => {
            let now = Utc::now().to_rfc3339();
            let has_exit = exit_price.is_some();
            let form = TradeForm {
                symbol,
                trade_type,
                status: status.unwrap_or_else(|| (if has_exit { "CLOSED" } else { "OPEN" }).to_string()),
                entry_price,
                exit_price: exit_price.unwrap_or_default(),
                entry_time: entry_time.unwrap_or_else(|| now.clone()),
                exit_time: exit_time.unwrap_or_else(|| if has_exit { now } else { String::new() }),
                notes: notes.unwrap_or_default(),
            };
            let record = form.into_record()?;
            ledger.append(&record)?;
            let derived = tradeledger::compute_derived(&record)?;
            println!("{}", serde_json::to_string_pretty(&derived)?);
        }
        Commands::List { filter, limit } => {
            let mut history = ledger.history(&filter.to_filter()?)?;
            history.trades.truncate(limit);
            println!("{}", serde_json::to_string_pretty(&history.trades)?);
            if !history.rejected.is_empty() {
                tracing::warn!(
                    "{} stored rows were skipped; run `tradeledger rejected` for details",
                    history.rejected.len()
                );
            }
        }
        Commands::Summary { filter } => {
            let summary = ledger.summary(&filter.to_filter()?)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Ticker { count } => {
            for trade in ledger.ticker(count)? {
                println!("{}", ticker_line(&trade));
            }
        }
        Commands::Rejected => {
            let report = ledger.load_all()?;
            println!("{}", serde_json::to_string_pretty(&report.rejected)?);
        }
        Commands::Prune => {
            let dropped = ledger.prune()?;
            println!("Removed {dropped} invalid rows");
        }
    }
    Ok(())
}

fn ticker_line(trade: &DerivedTrade) -> String {
    let r = &trade.record;
    let exit = r
        .exit_price
        .filter(|_| r.is_closed())
        .map(|p| format!("${p:.2}"))
        .unwrap_or_else(|| "-".into());
    let pnl = match (trade.pnl, trade.pnl_pct) {
        (Some(pnl), Some(pct)) => {
            let sign = if pnl > 0.0 { "+" } else { "" };
            format!("{sign}${pnl:.2} ({sign}{pct:.2}%)")
        }
        _ => "-".into(),
    };
    format!(
        "{}  {:<6} {:<4}  ${:.2} -> {:<10}  {:<22}  {:<6}  [{}]",
        r.entry_time.format("%Y-%m-%d %H:%M:%S"),
        r.symbol,
        r.trade_type.to_string(),
        r.entry_price,
        exit,
        pnl,
        r.status.to_string(),
        trade.tone()
    )
}
