//! Domain types for StockScope

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::PriceSeries;
