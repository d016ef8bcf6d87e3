//! Moving average crossover: golden cross and death cross detection.
//!
//! Two trailing SMAs of the close are compared on every date. A Buy fires
//! when the short MA moves above the long MA, a Sell when it moves back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::sma::sma_of_series;

/// How dates before both moving averages exist are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarmupPolicy {
    /// No state until both MAs are computable; events only on true crosses.
    #[default]
    Strict,
    /// Binary 0/1 state from index `short` on, comparisons with a missing MA
    /// count as "not above". Can emit a Buy on the first date the long MA
    /// exists without any actual cross.
    Legacy,
}

/// Crossover state on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverSignal {
    NoPosition,
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverKind {
    Buy,
    Sell,
}

impl CrossoverKind {
    pub fn label(self) -> &'static str {
        match self {
            CrossoverKind::Buy => "Buy",
            CrossoverKind::Sell => "Sell",
        }
    }
}

/// A state transition, annotated with the short MA value on that date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub kind: CrossoverKind,
    pub price: f64,
}

/// Everything the detector derives, aligned 1:1 with the input bars.
#[derive(Debug, Clone, Default)]
pub struct CrossoverResult {
    pub short_ma: Vec<f64>,
    pub long_ma: Vec<f64>,
    pub states: Vec<CrossoverSignal>,
    /// 1.0 Long, 0.0 otherwise; NaN for NoPosition under `Strict`.
    pub signal: Vec<f64>,
    /// +1.0 on Buy, -1.0 on Sell, 0.0 otherwise; NaN at index 0.
    pub position: Vec<f64>,
    pub events: Vec<CrossoverEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverDetector {
    pub short_window: usize,
    pub long_window: usize,
    pub policy: WarmupPolicy,
}

impl CrossoverDetector {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        assert!(short_window >= 1, "short_window must be >= 1");
        assert!(long_window >= 1, "long_window must be >= 1");
        Self {
            short_window,
            long_window,
            policy: WarmupPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: WarmupPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn detect(&self, bars: &[Bar]) -> CrossoverResult {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let short_ma = sma_of_series(&closes, self.short_window);
        let long_ma = sma_of_series(&closes, self.long_window);

        let states = match self.policy {
            WarmupPolicy::Strict => strict_states(&short_ma, &long_ma),
            WarmupPolicy::Legacy => legacy_states(&short_ma, &long_ma, self.short_window),
        };

        let signal: Vec<f64> = states
            .iter()
            .map(|s| match (s, self.policy) {
                (CrossoverSignal::Long, _) => 1.0,
                (CrossoverSignal::Short, _) => 0.0,
                (CrossoverSignal::NoPosition, WarmupPolicy::Legacy) => 0.0,
                (CrossoverSignal::NoPosition, WarmupPolicy::Strict) => f64::NAN,
            })
            .collect();

        let transitions = match self.policy {
            WarmupPolicy::Strict => strict_transitions(&states),
            WarmupPolicy::Legacy => legacy_transitions(&states),
        };

        let mut position = vec![0.0; bars.len()];
        if let Some(first) = position.first_mut() {
            *first = f64::NAN;
        }
        let mut events = Vec::new();
        for (index, kind) in transitions {
            position[index] = match kind {
                CrossoverKind::Buy => 1.0,
                CrossoverKind::Sell => -1.0,
            };
            events.push(CrossoverEvent {
                index,
                date: bars[index].date,
                kind,
                price: short_ma[index],
            });
        }

        CrossoverResult {
            short_ma,
            long_ma,
            states,
            signal,
            position,
            events,
        }
    }
}

fn strict_states(short_ma: &[f64], long_ma: &[f64]) -> Vec<CrossoverSignal> {
    short_ma
        .iter()
        .zip(long_ma)
        .map(|(&s, &l)| {
            if s.is_nan() || l.is_nan() {
                CrossoverSignal::NoPosition
            } else if s > l {
                CrossoverSignal::Long
            } else {
                CrossoverSignal::Short
            }
        })
        .collect()
}

fn legacy_states(short_ma: &[f64], long_ma: &[f64], short_window: usize) -> Vec<CrossoverSignal> {
    short_ma
        .iter()
        .zip(long_ma)
        .enumerate()
        .map(|(i, (&s, &l))| {
            // NaN comparisons are false, so a missing MA reads as "not above".
            if i >= short_window && s > l {
                CrossoverSignal::Long
            } else {
                CrossoverSignal::NoPosition
            }
        })
        .collect()
}

fn legacy_transitions(states: &[CrossoverSignal]) -> Vec<(usize, CrossoverKind)> {
    states
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| match (pair[0], pair[1]) {
            (CrossoverSignal::NoPosition, CrossoverSignal::Long) => Some((i + 1, CrossoverKind::Buy)),
            (CrossoverSignal::Long, CrossoverSignal::NoPosition) => Some((i + 1, CrossoverKind::Sell)),
            _ => None,
        })
        .collect()
}

fn strict_transitions(states: &[CrossoverSignal]) -> Vec<(usize, CrossoverKind)> {
    let mut out = Vec::new();
    let mut last: Option<CrossoverSignal> = None;
    for (i, &state) in states.iter().enumerate() {
        if state == CrossoverSignal::NoPosition {
            continue;
        }
        match (last, state) {
            (Some(CrossoverSignal::Short), CrossoverSignal::Long) => out.push((i, CrossoverKind::Buy)),
            (Some(CrossoverSignal::Long), CrossoverSignal::Short) => out.push((i, CrossoverKind::Sell)),
            _ => {}
        }
        last = Some(state);
    }
    out
}
