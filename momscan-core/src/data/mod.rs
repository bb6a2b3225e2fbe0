//! Data collaborators: price sources, universes, alignment

pub mod align;
pub mod circuit_breaker;
pub mod csv_source;
pub mod memory;
pub mod period;
pub mod provider;
pub mod universe;
pub mod yahoo;

pub use align::{align_closes, AlignedCloses};
pub use circuit_breaker::CircuitBreaker;
pub use csv_source::CsvSource;
pub use memory::InMemorySource;
pub use period::{LookbackPeriod, PeriodError};
pub use provider::{DataError, DataSource, PriceSource, UniverseSource};
pub use universe::{hk_ticker, StaticUniverse, Universe};
pub use yahoo::YahooSource;
