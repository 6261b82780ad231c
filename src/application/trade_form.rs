use crate::domain::entities::trade_record::TradeRecord;
use crate::domain::error::{ValidationError, Violation};
use crate::domain::values::timestamp::parse_timestamp;
use crate::domain::values::trade_status::TradeStatus;
use crate::domain::values::trade_type::TradeType;
use chrono::{DateTime, Utc};

/// Raw "add trade" input as a form submits it. Blank optional fields count
/// as absent.
#[derive(Debug, Clone, Default)]
pub struct TradeForm {
    pub symbol: String,
    pub trade_type: String,
    pub status: String,
    pub entry_price: String,
    pub exit_price: String,
    pub entry_time: String,
    pub exit_time: String,
    pub notes: String,
}

impl TradeForm {
    /// Convert to a new record, reporting every bad field at once.
    pub fn into_record(self) -> Result<TradeRecord, ValidationError> {
        let mut violations = Vec::new();

        if self.symbol.trim().is_empty() {
            violations.push(Violation::EmptySymbol);
        }
        let trade_type = parse_enum::<TradeType>(&self.trade_type, "type", &mut violations, |s| {
            Violation::UnknownTradeType(s.to_string())
        });
        let status = parse_enum::<TradeStatus>(&self.status, "status", &mut violations, |s| {
            Violation::UnknownStatus(s.to_string())
        });
        let entry_price = required(&self.entry_price, "entry_price", &mut violations)
            .and_then(|s| parse_price(s, "entry_price", &mut violations));
        let exit_price =
            optional(&self.exit_price).and_then(|s| parse_price(s, "exit_price", &mut violations));
        let entry_time = required(&self.entry_time, "entry_time", &mut violations)
            .and_then(|s| parse_time(s, "entry_time", &mut violations));
        let exit_time =
            optional(&self.exit_time).and_then(|s| parse_time(s, "exit_time", &mut violations));

        let (Some(trade_type), Some(status), Some(entry_price), Some(entry_time)) =
            (trade_type, status, entry_price, entry_time)
        else {
            return Err(ValidationError::new(violations));
        };
        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        let mut record =
            TradeRecord::new(&self.symbol, trade_type, entry_price, entry_time).with_notes(&self.notes);
        record.status = status;
        record.exit_price = exit_price;
        record.exit_time = exit_time;
        record.validate()?;
        Ok(record)
    }
}

fn optional(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn required<'a>(
    value: &'a str,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<&'a str> {
    let present = optional(value);
    if present.is_none() {
        violations.push(Violation::MissingField(field));
    }
    present
}

fn parse_enum<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
    violations: &mut Vec<Violation>,
    unknown: impl Fn(&str) -> Violation,
) -> Option<T> {
    let raw = required(value, field, violations)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            violations.push(unknown(raw));
            None
        }
    }
}

fn parse_price(value: &str, field: &'static str, violations: &mut Vec<Violation>) -> Option<f64> {
    match value.trim_start_matches('$').replace(',', "").parse::<f64>() {
        Ok(price) => Some(price),
        Err(_) => {
            violations.push(Violation::NonNumeric {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}

fn parse_time(
    value: &str,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<DateTime<Utc>> {
    let parsed = parse_timestamp(value);
    if parsed.is_none() {
        violations.push(Violation::BadTimestamp {
            field,
            value: value.to_string(),
        });
    }
    parsed
}
