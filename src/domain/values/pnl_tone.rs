use serde::Serialize;
use std::fmt;

/// Half a cent either side of zero reads as break-even.
pub const NEUTRAL_BAND: f64 = 0.005;

/// Display classification of a trade result, used for win/loss coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PnlTone {
    Win,
    Loss,
    Neutral,
    Open,
}

impl PnlTone {
    pub fn classify(pnl: Option<f64>) -> Self {
        match pnl {
            None => PnlTone::Open,
            Some(p) if p > NEUTRAL_BAND => PnlTone::Win,
            Some(p) if p < -NEUTRAL_BAND => PnlTone::Loss,
            Some(_) => PnlTone::Neutral,
        }
    }
}

impl fmt::Display for PnlTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PnlTone::Win => write!(f, "win"),
            PnlTone::Loss => write!(f, "loss"),
            PnlTone::Neutral => write!(f, "neutral"),
            PnlTone::Open => write!(f, "open"),
        }
    }
}
