//! Moving Average Convergence/Divergence (MACD) line.
//!
//! MACD = EMA(close, fast) - EMA(close, slow), with both EMAs seeded at the
//! first close. Values before the slow EMA has seen `slow` bars are reported
//! as NaN, so the line starts at index slow-1 (25 for the standard 12/26).
//! The signal line is not produced.

use super::ema::ema_of_series;
use super::indicator::{closes, Indicator};
use crate::domain::Bar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1, "MACD fast period must be >= 1");
        assert!(slow > fast, "MACD slow period must be > fast period");
        Self {
            fast,
            slow,
            name: format!("macd_{fast}_{slow}"),
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(DEFAULT_FAST, DEFAULT_SLOW)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        macd_of_series(&closes(bars), self.fast, self.slow)
    }
}

pub fn macd_of_series(values: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let fast_ema = ema_of_series(values, fast);
    let slow_ema = ema_of_series(values, slow);
    fast_ema
        .iter()
        .zip(&slow_ema)
        .enumerate()
        .map(|(i, (f, s))| if i + 1 < slow { f64::NAN } else { f - s })
        .collect()
}
