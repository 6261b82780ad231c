use crate::domain::entities::trade_record::{RejectedRecord, TradeRecord};
use crate::domain::error::ValidationError;
use crate::domain::values::pnl_tone::PnlTone;
use chrono::Duration;
use serde::{Serialize, Serializer};

/// A trade with its computed P&L and holding time. All derived fields are
/// `None` while the trade is OPEN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedTrade {
    #[serde(flatten)]
    pub record: TradeRecord,
    pub pnl: Option<f64>,
    pub pnl_pct: Option<f64>,
    #[serde(rename = "duration_secs", serialize_with = "duration_secs")]
    pub duration: Option<Duration>,
}

impl DerivedTrade {
    pub fn tone(&self) -> PnlTone {
        PnlTone::classify(self.pnl)
    }
}

fn duration_secs<S: Serializer>(duration: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match duration {
        Some(d) => s.serialize_some(&d.num_seconds()),
        None => s.serialize_none(),
    }
}

pub fn compute_derived(record: &TradeRecord) -> Result<DerivedTrade, ValidationError> {
    record.validate()?;

    let closed_exit = match (record.is_closed(), record.exit_price, record.exit_time) {
        (true, Some(price), Some(time)) => Some((price, time)),
        _ => None,
    };
    let pnl = closed_exit.map(|(price, _)| record.trade_type.pnl(record.entry_price, price));

    Ok(DerivedTrade {
        record: record.clone(),
        pnl,
        pnl_pct: pnl.map(|p| p / record.entry_price * 100.0),
        duration: closed_exit.map(|(_, time)| time - record.entry_time),
    })
}

/// Derive every record, setting aside the ones that fail validation instead
/// of failing the batch.
pub fn derive_all(records: &[TradeRecord]) -> (Vec<DerivedTrade>, Vec<RejectedRecord>) {
    let mut derived = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match compute_derived(record) {
            Ok(d) => derived.push(d),
            Err(e) => {
                let raw = serde_json::to_value(record).unwrap_or_default();
                rejected.push(RejectedRecord::new(index, raw, e));
            }
        }
    }
    (derived, rejected)
}
