//! Running sums of per-item metrics, keyed by (horizon, source).

use std::collections::BTreeMap;

use serde::Serialize;

/// Sum and count of the defined values seen for one table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Tally {
    pub sum: f64,
    pub count: usize,
}

impl Tally {
    /// The average, or `None` if nothing was added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// A finalized table cell. `mean` is `None` (JSON `null`) when no value
/// contributed; it is never reported as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: Option<f64>,
    pub count: usize,
}

/// horizon → source → value.
pub type Table<T> = BTreeMap<u32, BTreeMap<String, T>>;

/// One metric's (horizon, source) → (sum, count) mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricTable {
    cells: Table<Tally>,
}

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a cell exists so that it is reported even if it never
    /// receives a value.
    pub fn register(&mut self, horizon: u32, source: &str) {
        self.cells
            .entry(horizon)
            .or_default()
            .entry(source.to_string())
            .or_default();
    }

    /// Add `value` to the cell. Undefined and non-finite values are ignored.
    /// Returns whether the value was counted.
    pub fn accumulate(&mut self, horizon: u32, source: &str, value: Option<f64>) -> bool {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            self.register(horizon, source);
            return false;
        };
        let tally = self
            .cells
            .entry(horizon)
            .or_default()
            .entry(source.to_string())
            .or_default();
        tally.sum += v;
        tally.count += 1;
        true
    }

    pub fn tally(&self, horizon: u32, source: &str) -> Option<&Tally> {
        self.cells.get(&horizon)?.get(source)
    }

    /// Divide every sum by its count.
    pub fn finalize(&self) -> Table<Summary> {
        self.cells
            .iter()
            .map(|(&h, row)| {
                let row = row
                    .iter()
                    .map(|(s, t)| {
                        (
                            s.clone(),
                            Summary {
                                mean: t.mean(),
                                count: t.count,
                            },
                        )
                    })
                    .collect();
                (h, row)
            })
            .collect()
    }
}

/// The raw state of a verification sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Accumulator {
    pub rmse: MetricTable,
    pub correlation: MetricTable,
    /// Per horizon, how many issue dates had usable reference data.
    pub reference_dates: BTreeMap<u32, usize>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, horizon: u32, source: &str) {
        self.rmse.register(horizon, source);
        self.correlation.register(horizon, source);
        self.reference_dates.entry(horizon).or_insert(0);
    }

    pub fn reference_loaded(&mut self, horizon: u32) {
        *self.reference_dates.entry(horizon).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn averages_defined_values_only() {
        let mut t = MetricTable::new();
        assert!(t.accumulate(1, "GEFS", Some(2.0)));
        assert!(t.accumulate(1, "GEFS", Some(4.0)));
        assert!(!t.accumulate(1, "GEFS", None));
        assert!(!t.accumulate(1, "GEFS", Some(f64::NAN)));

        let tally = t.tally(1, "GEFS").unwrap();
        assert_eq!(tally.count, 2);
        let out = t.finalize();
        assert_relative_eq!(out[&1]["GEFS"].mean.unwrap(), 3.0);
    }

    #[test]
    fn empty_cell_is_missing_not_zero() {
        let mut t = MetricTable::new();
        t.register(5, "ICON");
        t.accumulate(5, "AIFS", None);
        let out = t.finalize();
        assert_eq!(out[&5]["ICON"], Summary { mean: None, count: 0 });
        assert_eq!(out[&5]["AIFS"].mean, None);
    }

    #[test]
    fn counts_are_per_source() {
        let mut t = MetricTable::new();
        t.accumulate(3, "GEFS", Some(1.0));
        t.accumulate(3, "GEFS", Some(1.0));
        t.accumulate(3, "ICON", Some(5.0));
        assert_eq!(t.tally(3, "GEFS").unwrap().count, 2);
        assert_eq!(t.tally(3, "ICON").unwrap().count, 1);
        assert_relative_eq!(t.finalize()[&3]["ICON"].mean.unwrap(), 5.0);
    }

    #[test]
    fn serializes_null_for_missing() {
        let mut t = MetricTable::new();
        t.register(1, "GEFS");
        let json = serde_json::to_string(&t.finalize()).unwrap();
        assert_eq!(json, r#"{"1":{"GEFS":{"mean":null,"count":0}}}"#);

        let raw = serde_json::to_string(&t).unwrap();
        assert_eq!(raw, r#"{"1":{"GEFS":{"sum":0.0,"count":0}}}"#);
    }

    #[test]
    fn reference_dates_counted_per_horizon() {
        let mut acc = Accumulator::new();
        acc.register(1, "GEFS");
        acc.reference_loaded(1);
        acc.reference_loaded(1);
        acc.register(2, "GEFS");
        assert_eq!(acc.reference_dates[&1], 2);
        assert_eq!(acc.reference_dates[&2], 0);
    }
}
