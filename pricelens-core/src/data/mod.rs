//! Market data acquisition: provider trait, Yahoo Finance, synthetic bars.

pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use provider::{
    fetch_series, DataError, DataProvider, DataSource, FetchResult, FetchedSeries, RawBar,
};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
