pub mod pnl_tone;
pub mod timestamp;
pub mod trade_status;
pub mod trade_type;
