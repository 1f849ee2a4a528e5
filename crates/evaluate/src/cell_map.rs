//! Per-cell RMSE maps and the best source per cell.

use std::path::Path;

use chrono::NaiveDate;
use gwpm_catalog::Catalog;
use gwpm_io::{Grid, GridLoader, IndexLayer, MapFile, MapLayer, write_map};
use ndarray::{Array2, Axis, Zip};

use crate::config::VerifyConfig;
use crate::error::EvaluateError;
use crate::output::RunSummary;
use crate::score::abs_error;
use crate::skip::{SkipReason, SkipRecord};
use crate::sweep::{self, Plan, Visitor};

/// Per-cell RMSE of every source over all dates and horizons of a run.
#[derive(Debug)]
pub struct CellMap {
    pub run: RunSummary,
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    /// Source ids; index `k` of `rmse`, `counts` and `best` refers to
    /// `sources[k]`.
    pub sources: Vec<String>,
    /// `NaN` where a source never had a valid pair.
    pub rmse: Vec<Array2<f64>>,
    pub counts: Vec<Array2<usize>>,
    /// Index of the lowest-RMSE source per cell; `-1` where none has data.
    /// Ties go to the earlier source.
    pub best: Array2<i32>,
    pub skipped: Vec<SkipRecord>,
}

impl CellMap {
    /// The NetCDF layout of this map.
    pub fn to_map_file(&self) -> MapFile {
        let layers = self
            .sources
            .iter()
            .zip(&self.rmse)
            .map(|(id, values)| MapLayer {
                name: format!("rmse_{id}"),
                long_name: format!("RMSE of {id} against {}", self.run.reference),
                units: Some(self.run.units.clone()),
                values: values.clone(),
            })
            .collect();
        let horizons: Vec<String> = self.run.horizons.iter().map(u32::to_string).collect();
        MapFile {
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            layers,
            index: Some(IndexLayer {
                name: "best_source".to_string(),
                long_name: "source with the lowest RMSE".to_string(),
                labels: self.sources.clone(),
                values: self.best.clone(),
            }),
            attributes: vec![
                ("parameter".to_string(), self.run.parameter.clone()),
                ("reference".to_string(), self.run.reference.clone()),
                ("start".to_string(), self.run.start.to_string()),
                ("end".to_string(), self.run.end.to_string()),
                ("horizons".to_string(), horizons.join(",")),
            ],
        }
    }

    /// Write the map as NetCDF.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluateError::Io`] on write failure.
    pub fn write(&self, path: &Path) -> Result<(), EvaluateError> {
        write_map(path, &self.to_map_file())?;
        Ok(())
    }
}

type CellItem = (Array2<f64>, Array2<usize>);

struct CellVisitor {
    sources: Vec<String>,
    coords: Option<(Vec<f64>, Vec<f64>)>,
    sq: Vec<Array2<f64>>,
    n: Vec<Array2<usize>>,
}

impl Visitor for CellVisitor {
    type Item = CellItem;

    fn on_reference(
        &mut self,
        _issue: NaiveDate,
        _horizon: u32,
        reference: &Grid,
    ) -> Result<(), (SkipReason, String)> {
        match &self.coords {
            None => {
                let shape = (reference.lats().len(), reference.lons().len());
                self.coords = Some((reference.lats().to_vec(), reference.lons().to_vec()));
                self.sq = vec![Array2::zeros(shape); self.sources.len()];
                self.n = vec![Array2::zeros(shape); self.sources.len()];
                Ok(())
            }
            Some((lats, lons)) if lats == reference.lats() && lons == reference.lons() => Ok(()),
            Some(_) => Err((
                SkipReason::ShapeMismatch,
                "reference grid differs from the first reference of the run".to_string(),
            )),
        }
    }

    fn measure(&self, forecast: &Grid, reference: &Grid) -> Result<CellItem, (SkipReason, String)> {
        let err = abs_error(forecast, reference)
            .map_err(|e| (SkipReason::from_io(&e), e.to_string()))?;
        let sq = err
            .values()
            .mapv(|v| if v.is_finite() { v * v } else { 0.0 })
            .sum_axis(Axis(0));
        let n = err
            .values()
            .mapv(|v| usize::from(v.is_finite()))
            .sum_axis(Axis(0));
        if n.sum() == 0 {
            return Err((
                SkipReason::NoValidCells,
                "no cell where forecast and reference are both finite".to_string(),
            ));
        }
        Ok((sq, n))
    }

    fn record(&mut self, _issue: NaiveDate, _horizon: u32, source: &str, item: CellItem) {
        if let Some(k) = self.sources.iter().position(|s| s == source) {
            self.sq[k] += &item.0;
            self.n[k] += &item.1;
        }
    }
}

/// Accumulate per-cell squared errors of every source over the run and
/// reduce them to per-cell RMSE and the best source per cell.
///
/// The first usable reference fixes the map grid; later references on a
/// different grid are skipped as `shape_mismatch`.
///
/// # Errors
///
/// Configuration problems as for [`verify`](crate::verify);
/// [`EvaluateError::Validation`] if area means are requested;
/// [`EvaluateError::NoData`] if no reference could be loaded at all.
pub fn cell_map(
    catalog: &Catalog,
    loader: &dyn GridLoader,
    config: &VerifyConfig,
) -> Result<CellMap, EvaluateError> {
    if config.area_mean() {
        return Err(EvaluateError::Validation {
            count: 1,
            details: "a per-cell map cannot use area means".to_string(),
        });
    }
    let plan = Plan::build(catalog, config)?;
    let sources: Vec<String> = plan.source_ids().into_iter().map(str::to_string).collect();

    let mut visitor = CellVisitor {
        sources: sources.clone(),
        coords: None,
        sq: Vec::new(),
        n: Vec::new(),
    };
    let skipped = sweep::run(catalog, loader, config, &plan, &mut visitor)?;

    let Some((lats, lons)) = visitor.coords else {
        return Err(EvaluateError::NoData {
            reason: "no reference grid could be loaded".to_string(),
        });
    };

    let rmse: Vec<Array2<f64>> = visitor
        .sq
        .iter()
        .zip(&visitor.n)
        .map(|(sq, n)| {
            Zip::from(sq)
                .and(n)
                .map_collect(|&s, &c| if c > 0 { (s / c as f64).sqrt() } else { f64::NAN })
        })
        .collect();
    let best = best_source(&rmse, (lats.len(), lons.len()));

    Ok(CellMap {
        run: RunSummary::new(catalog, config, &plan)?,
        lats,
        lons,
        sources,
        rmse,
        counts: visitor.n,
        best,
        skipped,
    })
}

/// Index of the smallest finite value per cell, `-1` if none.
fn best_source(rmse: &[Array2<f64>], shape: (usize, usize)) -> Array2<i32> {
    let mut best = Array2::from_elem(shape, -1_i32);
    let mut min = Array2::from_elem(shape, f64::INFINITY);
    for (k, layer) in rmse.iter().enumerate() {
        let k = i32::try_from(k).unwrap_or(i32::MAX);
        Zip::from(&mut best)
            .and(&mut min)
            .and(layer)
            .for_each(|b, m, &v| {
                if v.is_finite() && v < *m {
                    *m = v;
                    *b = k;
                }
            });
    }
    best
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn best_source_picks_lowest_and_marks_empty() {
        let a = array![[1.0, 2.0, f64::NAN], [0.5, 1.0, f64::NAN]];
        let b = array![[1.5, 1.0, f64::NAN], [0.5, f64::NAN, 3.0]];
        let best = best_source(&[a, b], (2, 3));
        assert_eq!(best, array![[0, 1, -1], [0, 0, 1]]);
    }

    #[test]
    fn best_source_no_sources() {
        let best = best_source(&[], (1, 2));
        assert_eq!(best, array![[-1, -1]]);
    }
}
