//! Concrete indicator implementations.
//!
//! Every indicator implements the `Indicator` trait and is computed once over
//! the full close series. `IndicatorKind` is the user-facing selection.

pub mod ema;
pub mod indicator;
pub mod kind;
pub mod macd;
pub mod rsi;
pub mod sma;

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::Bar;

pub use ema::Ema;
pub use indicator::Indicator;
pub use kind::{IndicatorKind, UnknownIndicator};
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::Sma;

/// Compute each selected indicator independently over `bars`.
///
/// Duplicates in `kinds` collapse; the map iterates in canonical column order.
pub fn compute_selected(bars: &[Bar], kinds: &[IndicatorKind]) -> BTreeMap<IndicatorKind, Vec<f64>> {
    let mut out = BTreeMap::new();
    for &kind in kinds {
        if out.contains_key(&kind) {
            continue;
        }
        let indicator = kind.build();
        debug!(indicator = indicator.name(), bars = bars.len(), "computing indicator");
        out.insert(kind, indicator.compute(bars));
    }
    out
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                1000,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
