//! Price sources and the ticker universe.

pub mod circuit_breaker;
pub mod csv_source;
pub mod provider;
pub mod static_source;
pub mod universe;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_source::CsvSource;
pub use provider::{DataError, PriceSource};
pub use static_source::StaticSource;
pub use universe::Universe;
pub use yahoo::YahooSource;
