//! Pure computations over loaded trade records. Nothing here touches the
//! backing file; callers load once and pass slices in.

pub mod derived;
pub mod filter;
pub mod summary;
pub mod ticker;

pub use derived::{compute_derived, derive_all, DerivedTrade};
pub use filter::{filter, TradeFilter};
pub use summary::{summarize, CumulativePoint, MetricsSummary, ProfitFactor, SymbolBreakdown};
pub use ticker::latest;
