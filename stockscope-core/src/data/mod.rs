//! Data acquisition: provider trait, Yahoo Finance, CSV directory.

pub mod csv_dir;
pub mod provider;
pub mod yahoo;

pub use csv_dir::CsvProvider;
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use yahoo::YahooProvider;
