use crate::domain::error::{ValidationError, Violation};
use crate::domain::values::timestamp::parse_timestamp;
use crate::domain::values::trade_status::TradeStatus;
use crate::domain::values::trade_type::TradeType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// One logged trade as stored in the backing file. Derived values (P&L,
/// duration) are never stored; see `domain::metrics::derived`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub symbol: String,
    pub entry_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    pub entry_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub status: TradeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl TradeRecord {
    /// A fresh OPEN trade with a new id, stamped with the current time.
    pub fn new(
        symbol: &str,
        trade_type: TradeType,
        entry_price: f64,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            symbol: normalize_symbol(symbol),
            entry_price,
            exit_price: None,
            entry_time,
            exit_time: None,
            trade_type,
            status: TradeStatus::Open,
            notes: None,
            recorded_at: Some(Utc::now()),
        }
    }

    /// Mark the trade CLOSED at the given exit.
    pub fn closed(mut self, exit_price: f64, exit_time: DateTime<Utc>) -> Self {
        self.status = TradeStatus::Closed;
        self.exit_price = Some(exit_price);
        self.exit_time = Some(exit_time);
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        let trimmed = notes.trim();
        self.notes = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    /// Check the record invariants, reporting every one that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if !self.symbol.trim().is_empty() && self.symbol != normalize_symbol(&self.symbol) {
            violations.push(Violation::SymbolNotNormalized(self.symbol.clone()));
        }
        violations.extend(check_invariants(&Fields {
            symbol: Some(&self.symbol),
            entry_price: Some(self.entry_price),
            exit_price: self.exit_price,
            entry_time: Some(self.entry_time),
            exit_time: self.exit_time,
            status: Some(self.status),
        }));
        violations
    }

    /// Parse and validate one stored JSON object.
    ///
    /// Unknown keys are ignored, so files that also carry precomputed
    /// `pnl`/`pnl_percent` columns still load.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ValidationError::new(vec![Violation::NotAnObject]))?;
        let mut violations = Vec::new();

        let symbol = required_str(obj, "symbol", &mut violations).map(normalize_symbol);
        let entry_price = price(obj, "entry_price", true, &mut violations);
        let exit_price = price(obj, "exit_price", false, &mut violations);
        let entry_time = timestamp(obj, "entry_time", true, &mut violations);
        let exit_time = timestamp(obj, "exit_time", false, &mut violations);
        let trade_type = required_str(obj, "type", &mut violations).and_then(|s| {
            s.parse::<TradeType>()
                .map_err(|_| violations.push(Violation::UnknownTradeType(s.to_string())))
                .ok()
        });
        let status = required_str(obj, "status", &mut violations).and_then(|s| {
            s.parse::<TradeStatus>()
                .map_err(|_| violations.push(Violation::UnknownStatus(s.to_string())))
                .ok()
        });

        // Invariants are checked on whatever parsed, so a row missing one
        // field still reports its other problems.
        violations.extend(
            check_invariants(&Fields {
                symbol: symbol.as_deref(),
                entry_price,
                exit_price,
                entry_time,
                exit_time,
                status,
            })
            .into_iter()
            .filter(|v| match v {
                // A present-but-unparseable exit field was already reported.
                Violation::ClosedMissingExit(field) => present(obj, field).is_none(),
                _ => true,
            }),
        );

        let (Some(symbol), Some(entry_price), Some(entry_time), Some(trade_type), Some(status)) =
            (symbol, entry_price, entry_time, trade_type, status)
        else {
            return Err(ValidationError::new(violations));
        };
        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        Ok(TradeRecord {
            id: id_of(obj),
            symbol,
            entry_price,
            exit_price,
            entry_time,
            exit_time,
            trade_type,
            status,
            // Stored verbatim so a written record reads back unchanged.
            notes: obj.get("notes").and_then(Value::as_str).map(String::from),
            recorded_at: obj
                .get("recorded_at")
                .and_then(Value::as_str)
                .and_then(parse_timestamp),
        })
    }
}

/// A stored row that failed validation, kept with its raw content so it can
/// be shown next to the usable history.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub raw: Value,
    pub reasons: Vec<String>,
    #[serde(skip)]
    pub error: ValidationError,
}

impl RejectedRecord {
    pub fn new(index: usize, raw: Value, error: ValidationError) -> Self {
        let error = error.at(index);
        Self {
            index,
            raw,
            reasons: error.violations.iter().map(|v| v.to_string()).collect(),
            error,
        }
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// The parts of a record the invariants look at; `None` for fields that
/// failed to parse.
struct Fields<'a> {
    symbol: Option<&'a str>,
    entry_price: Option<f64>,
    exit_price: Option<f64>,
    entry_time: Option<DateTime<Utc>>,
    exit_time: Option<DateTime<Utc>>,
    status: Option<TradeStatus>,
}

fn check_invariants(fields: &Fields<'_>) -> Vec<Violation> {
    let mut violations = Vec::new();
    if fields.symbol.is_some_and(|s| s.trim().is_empty()) {
        violations.push(Violation::EmptySymbol);
    }
    if let Some(entry_price) = fields.entry_price.filter(|p| !is_valid_price(*p)) {
        violations.push(Violation::NonPositivePrice {
            field: "entry_price",
            value: entry_price,
        });
    }
    if let Some(exit_price) = fields.exit_price.filter(|p| !is_valid_price(*p)) {
        violations.push(Violation::NonPositivePrice {
            field: "exit_price",
            value: exit_price,
        });
    }
    // Exit fields of an OPEN trade are ignored, so only CLOSED trades are held to them.
    if fields.status == Some(TradeStatus::Closed) {
        if fields.exit_price.is_none() {
            violations.push(Violation::ClosedMissingExit("exit_price"));
        }
        match (fields.entry_time, fields.exit_time) {
            (_, None) => violations.push(Violation::ClosedMissingExit("exit_time")),
            (Some(entry_time), Some(exit_time)) if exit_time < entry_time => {
                violations.push(Violation::ExitBeforeEntry)
            }
            _ => {}
        }
    }
    violations
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<&'a str> {
    match present(obj, field) {
        None => {
            violations.push(Violation::MissingField(field));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            violations.push(Violation::WrongType {
                field,
                expected: "string",
            });
            None
        }
    }
}

fn price(
    obj: &Map<String, Value>,
    field: &'static str,
    required: bool,
    violations: &mut Vec<Violation>,
) -> Option<f64> {
    match present(obj, field) {
        None => {
            if required {
                violations.push(Violation::MissingField(field));
            }
            None
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            violations.push(Violation::NonNumeric {
                field,
                value: other.to_string(),
            });
            None
        }
    }
}

fn timestamp(
    obj: &Map<String, Value>,
    field: &'static str,
    required: bool,
    violations: &mut Vec<Violation>,
) -> Option<DateTime<Utc>> {
    match present(obj, field) {
        None => {
            if required {
                violations.push(Violation::MissingField(field));
            }
            None
        }
        Some(Value::String(s)) => {
            let parsed = parse_timestamp(s);
            if parsed.is_none() {
                violations.push(Violation::BadTimestamp {
                    field,
                    value: s.clone(),
                });
            }
            parsed
        }
        Some(_) => {
            violations.push(Violation::WrongType {
                field,
                expected: "timestamp string",
            });
            None
        }
    }
}

// Older writers used sequential integer ids.
fn id_of(obj: &Map<String, Value>) -> Option<String> {
    match present(obj, "id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
