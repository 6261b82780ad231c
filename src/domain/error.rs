use thiserror::Error;

/// A single broken rule on a trade record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {field} has the wrong type (expected {expected})")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("symbol {0:?} must be trimmed and uppercase")]
    SymbolNotNormalized(String),

    #[error("{field} must be a positive number, got {value}")]
    NonPositivePrice { field: &'static str, value: f64 },

    #[error("{field} is not a number: {value}")]
    NonNumeric { field: &'static str, value: String },

    #[error("{field} is not a valid timestamp: {value}")]
    BadTimestamp { field: &'static str, value: String },

    #[error("unknown trade type: {0} (expected BUY or SELL)")]
    UnknownTradeType(String),

    #[error("unknown status: {0} (expected OPEN or CLOSED)")]
    UnknownStatus(String),

    #[error("closed trade is missing {0}")]
    ClosedMissingExit(&'static str),

    #[error("exit_time is before entry_time")]
    ExitBeforeEntry,

    #[error("record is not a JSON object")]
    NotAnObject,
}

/// Every invariant a record failed, with its position in the backing file when known.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", describe(.index, .violations))]
pub struct ValidationError {
    pub index: Option<usize>,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            index: None,
            violations,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.violations.contains(violation)
    }
}

fn describe(index: &Option<usize>, violations: &[Violation]) -> String {
    let reasons: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    match index {
        Some(index) => format!("record #{index}: {}", reasons.join("; ")),
        None => reasons.join("; "),
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
