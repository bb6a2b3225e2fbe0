//! Domain types for momscan

pub mod float_serde;
pub mod series;
pub mod signal;

pub use series::{PricePoint, PriceSeries, SeriesError};
pub use signal::{PositionState, SignalKind, SignalMarker};
