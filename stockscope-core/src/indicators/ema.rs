//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1)
//! Seed: EMA[0] = close[0].
//! Lookback: 0.

use super::indicator::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn alpha(&self) -> f64 {
        smoothing(self.period)
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&closes(bars), self.period)
    }
}

fn smoothing(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Compute raw EMA values from a pre-extracted f64 slice.
///
/// Once a NaN input is seen, that value and everything after it is NaN.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n == 0 || period == 0 {
        return result;
    }

    let alpha = smoothing(period);
    let mut prev = f64::NAN;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            return result;
        }
        let ema = if i == 0 { v } else { alpha * v + (1.0 - alpha) * prev };
        result[i] = ema;
        prev = ema;
    }

    result
}
