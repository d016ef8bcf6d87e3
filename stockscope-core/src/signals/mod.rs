//! Trading signals derived from price series.
//!
//! Signals look only at market data. The crossover detector is the single
//! signal the dashboard overlays on the trend chart.

pub mod crossover;

pub use crossover::{
    CrossoverDetector, CrossoverEvent, CrossoverKind, CrossoverResult, CrossoverSignal,
    WarmupPolicy,
};
