//! Relative Strength Index (RSI).
//!
//! Average gain and average loss are exponentially smoothed with alpha = 1/period,
//! seeded at 0 from the first bar (which has no change), and reported once
//! `period` observations have been seen: the first value is at index period - 1.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → RSI = 100 (flat series included); avg_gain == 0 → RSI = 0.
//! A change touching a missing close counts as neither gain nor loss.

use super::indicator::{closes, Indicator};
use crate::domain::Bar;

/// Conventional RSI period.
pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rsi_of_series(&closes(bars), self.period)
    }
}

/// Wilder RSI over a pre-extracted f64 slice.
pub fn rsi_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 0..n {
        let change = if i == 0 { f64::NAN } else { values[i] - values[i - 1] };
        // NaN compares false on both sides, so a missing change is 0 gain and 0 loss.
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        }

        if i + 1 >= period {
            result[i] = compute_rsi(avg_gain, avg_loss);
        }
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[..2].iter().all(|v| v.is_nan()));
        assert_approx(result[2], 100.0, 1e-6);
        assert_approx(result[5], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[2], 0.0, 1e-6);
        assert_approx(result[5], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_hundred() {
        // No losses at all, so avg_loss stays 0.
        let bars = make_bars(&[50.0; 6]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[..2].iter().all(|v| v.is_nan()));
        assert!(result[2..].iter().all(|&v| v == 100.0));
    }

    #[test]
    fn rsi_mixed_seed_value() {
        // Changes: (none), +0.34, -0.25, -0.48, +0.72; averages start at 0.
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).compute(&bars);
        let a = 1.0 / 3.0;
        let rsi = |g: f64, l: f64| 100.0 - 100.0 / (1.0 + g / l);

        let g2 = (1.0 - a) * (a * 0.34);
        let l2 = a * 0.25;
        let g3 = (1.0 - a) * g2;
        let l3 = (1.0 - a) * l2 + a * 0.48;
        let g4 = (1.0 - a) * g3 + a * 0.72;
        let l4 = (1.0 - a) * l3;

        assert!(result[..2].iter().all(|v| v.is_nan()));
        assert_approx(result[2], rsi(g2, l2), 1e-9);
        assert_approx(result[3], rsi(g3, l3), 1e-9);
        assert_approx(result[4], rsi(g4, l4), 1e-9);
    }

    /// Checks the recursion against the closed form of an unadjusted
    /// exponential mean: avg[t] = a * sum((1 - a)^(t - k) * x[k]) for k in 1..=t.
    #[test]
    fn rsi_matches_closed_form_ewm() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + 0.2 * i as f64 + 6.0 * (i as f64 / 5.0).sin())
            .collect();
        let period = DEFAULT_RSI_PERIOD;
        let result = rsi_of_series(&closes, period);
        let a = 1.0 / period as f64;

        assert!(result[..period - 1].iter().all(|v| v.is_nan()));
        for t in (period - 1)..closes.len() {
            let (mut g, mut l) = (0.0, 0.0);
            for k in 1..=t {
                let w = a * (1.0 - a).powi((t - k) as i32);
                let change = closes[k] - closes[k - 1];
                g += w * change.max(0.0);
                l += w * (-change).max(0.0);
            }
            let expected = if l == 0.0 { 100.0 } else { 100.0 - 100.0 / (1.0 + g / l) };
            assert_approx(result[t], expected, 1e-9);
        }
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&bars);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_missing_close_is_no_change() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        bars[2].close = f64::NAN;
        let result = Rsi::new(3).compute(&bars);
        assert!(result[..2].iter().all(|v| v.is_nan()));
        assert!(result[2..].iter().all(|&v| v == 100.0));
    }

    #[test]
    fn rsi_shorter_than_period() {
        let result = rsi_of_series(&[1.0, 2.0], 3);
        assert!(result.iter().all(|v| v.is_nan()));
        let result = rsi_of_series(&[1.0, 2.0, 1.5], 3);
        assert!(!result[2].is_nan());
    }

    #[test]
    fn rsi_default_period() {
        assert_eq!(Rsi::default().lookback(), DEFAULT_RSI_PERIOD - 1);
    }
}
