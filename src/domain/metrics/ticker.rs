use crate::domain::entities::trade_record::TradeRecord;

/// The `n` most recent trades by entry time, newest first. Equal entry
/// times keep their insertion order.
pub fn latest(records: &[TradeRecord], n: usize) -> Vec<TradeRecord> {
    let mut ordered: Vec<&TradeRecord> = records.iter().collect();
    // sort_by is stable
    ordered.sort_by(|a, b| b.entry_time.cmp(&a.entry_time));
    ordered.into_iter().take(n).cloned().collect()
}
