pub mod entities;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod values;
