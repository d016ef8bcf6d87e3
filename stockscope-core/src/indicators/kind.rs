//! The selectable indicator set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Ema, Indicator, Macd, Rsi, Sma};

/// One of the indicators a user can switch on.
///
/// The declaration order is the canonical column order used by tables and
/// CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "RSI", alias = "rsi")]
    Rsi,
    #[serde(rename = "MACD", alias = "macd")]
    Macd,
    #[serde(rename = "SMA (50)", alias = "sma50")]
    Sma50,
    #[serde(rename = "SMA (100)", alias = "sma100")]
    Sma100,
    #[serde(rename = "EMA (20)", alias = "ema20")]
    Ema20,
    #[serde(rename = "EMA (50)", alias = "ema50")]
    Ema50,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 6] = [
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Sma50,
        IndicatorKind::Sma100,
        IndicatorKind::Ema20,
        IndicatorKind::Ema50,
    ];

    /// Column header and display label.
    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Sma50 => "SMA (50)",
            IndicatorKind::Sma100 => "SMA (100)",
            IndicatorKind::Ema20 => "EMA (20)",
            IndicatorKind::Ema50 => "EMA (50)",
        }
    }

    /// Compact form accepted on the command line.
    pub fn short_name(self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Sma50 => "sma50",
            IndicatorKind::Sma100 => "sma100",
            IndicatorKind::Ema20 => "ema20",
            IndicatorKind::Ema50 => "ema50",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            IndicatorKind::Rsi => {
                "Relative Strength Index: momentum oscillator; above 70 overbought, below 30 oversold."
            }
            IndicatorKind::Macd => {
                "Moving Average Convergence Divergence: 12-day EMA minus 26-day EMA; tracks momentum shifts."
            }
            IndicatorKind::Sma50 | IndicatorKind::Sma100 => {
                "Simple Moving Average: plain mean of the last N closes; smooths out noise."
            }
            IndicatorKind::Ema20 | IndicatorKind::Ema50 => {
                "Exponential Moving Average: weights recent closes more, so it reacts faster than an SMA."
            }
        }
    }

    /// The indicator implementation behind this selection.
    pub fn build(self) -> Box<dyn Indicator> {
        match self {
            IndicatorKind::Rsi => Box::new(Rsi::default()),
            IndicatorKind::Macd => Box::new(Macd::default()),
            IndicatorKind::Sma50 => Box::new(Sma::new(50)),
            IndicatorKind::Sma100 => Box::new(Sma::new(100)),
            IndicatorKind::Ema20 => Box::new(Ema::new(20)),
            IndicatorKind::Ema50 => Box::new(Ema::new(50)),
        }
    }

    /// Selection shown before the user picks anything.
    pub fn defaults() -> Vec<IndicatorKind> {
        vec![IndicatorKind::Rsi, IndicatorKind::Macd]
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown indicator '{0}' (valid: RSI, MACD, SMA (50), SMA (100), EMA (20), EMA (50))")]
pub struct UnknownIndicator(pub String);

impl FromStr for IndicatorKind {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let squashed: String = wanted
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        IndicatorKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(wanted) || k.short_name() == squashed)
            .ok_or_else(|| UnknownIndicator(s.to_string()))
    }
}
