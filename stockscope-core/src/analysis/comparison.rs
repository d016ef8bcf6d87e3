//! Multi-ticker closing price comparison.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::MarketSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub date: NaiveDate,
    /// One cell per symbol, in `ComparisonTable::symbols` order.
    pub closes: Vec<Option<f64>>,
}

/// Closes of every fetched ticker, outer-joined on date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    pub symbols: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn from_snapshot(snapshot: &MarketSnapshot) -> Self {
        let dates: BTreeSet<NaiveDate> = snapshot
            .series
            .iter()
            .flat_map(|s| s.bars().iter().map(|b| b.date))
            .collect();

        let rows = dates
            .into_iter()
            .map(|date| ComparisonRow {
                date,
                closes: snapshot.series.iter().map(|s| s.close_on(date)).collect(),
            })
            .collect();

        Self {
            symbols: snapshot.symbols().into_iter().map(str::to_string).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The last `n` rows (the most recent dates).
    pub fn tail(&self, n: usize) -> &[ComparisonRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, PriceSeries};

    fn series(symbol: &str, days: &[(u32, f64)]) -> PriceSeries {
        let bars = days
            .iter()
            .map(|&(d, c)| {
                Bar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), c, c, c, c, 1)
            })
            .collect();
        PriceSeries::new(symbol, bars)
    }

    #[test]
    fn outer_joins_on_date() {
        let snapshot = MarketSnapshot {
            series: vec![
                series("AAPL", &[(2, 10.0), (3, 11.0)]),
                series("MSFT", &[(3, 20.0), (4, 21.0)]),
            ],
            warnings: vec![],
        };
        let table = ComparisonTable::from_snapshot(&snapshot);
        assert_eq!(table.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].closes, vec![Some(10.0), None]);
        assert_eq!(table.rows[1].closes, vec![Some(11.0), Some(20.0)]);
        assert_eq!(table.rows[2].closes, vec![None, Some(21.0)]);
        assert!(table.rows.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn tail_is_clamped() {
        let snapshot = MarketSnapshot {
            series: vec![series("AAPL", &[(2, 1.0), (3, 2.0)])],
            warnings: vec![],
        };
        let table = ComparisonTable::from_snapshot(&snapshot);
        assert_eq!(table.tail(5).len(), 2);
        assert_eq!(table.tail(1)[0].closes, vec![Some(2.0)]);
    }

    #[test]
    fn empty_snapshot_gives_empty_table() {
        let table = ComparisonTable::from_snapshot(&MarketSnapshot::default());
        assert!(table.is_empty());
        assert!(table.symbols.is_empty());
    }
}
