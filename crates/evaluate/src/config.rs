//! Run configuration for a verification sweep.

use chrono::NaiveDate;
use gwpm_io::Region;

/// Default lead times, in days.
pub const DEFAULT_HORIZONS: std::ops::RangeInclusive<u32> = 1..=15;

/// What to verify, over which issue dates, and how grids are reduced
/// before scoring.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    parameter: String,
    start: NaiveDate,
    end: NaiveDate,
    horizons: Vec<u32>,
    sources: Option<Vec<String>>,
    reference: Option<String>,
    climatology: Option<String>,
    region: Option<Region>,
    area_mean: bool,
}

impl VerifyConfig {
    /// Verify `parameter` for issue dates `start..=end` at the default
    /// horizons, against the parameter's own reference.
    pub fn new(parameter: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            parameter: parameter.into(),
            start,
            end,
            horizons: DEFAULT_HORIZONS.collect(),
            sources: None,
            reference: None,
            climatology: None,
            region: None,
            area_mean: false,
        }
    }

    /// Set the lead times to score.
    pub fn with_horizons(mut self, horizons: impl IntoIterator<Item = u32>) -> Self {
        self.horizons = horizons.into_iter().collect();
        self
    }

    /// Restrict scoring to these forecast sources. Without this, every
    /// eligible source is scored.
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    /// Score against this reference instead of the parameter's default.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Remove this day-of-year climatology from both grids before scoring.
    pub fn with_climatology(mut self, climatology: impl Into<String>) -> Self {
        self.climatology = Some(climatology.into());
        self
    }

    /// Cut both grids to `region` before scoring.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Compare area-mean values instead of individual cells.
    pub fn with_area_mean(mut self, area_mean: bool) -> Self {
        self.area_mean = area_mean;
        self
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn horizons(&self) -> &[u32] {
        &self.horizons
    }

    pub fn sources(&self) -> Option<&[String]> {
        self.sources.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn climatology(&self) -> Option<&str> {
        self.climatology.as_deref()
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn area_mean(&self) -> bool {
        self.area_mean
    }

    /// Checks that do not need the catalog. Returns every problem found.
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.start > self.end {
            problems.push(format!("start {} is after end {}", self.start, self.end));
        }
        if self.horizons.is_empty() {
            problems.push("no horizons given".to_string());
        }
        if self.horizons.contains(&0) {
            problems.push("horizon 0 is not a forecast lead time".to_string());
        }
        let mut sorted = self.horizons.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != self.horizons.len() {
            problems.push("horizons contain duplicates".to_string());
        }
        if let Some(sources) = &self.sources {
            if sources.is_empty() {
                problems.push("source list is empty".to_string());
            }
            let mut s: Vec<&String> = sources.iter().collect();
            s.sort();
            s.dedup();
            if s.len() != sources.len() {
                problems.push("source list contains duplicates".to_string());
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_default_values() {
        let config = VerifyConfig::new("Temp", d("2024-08-16"), d("2024-09-30"));
        assert_eq!(config.parameter(), "Temp");
        assert_eq!(config.horizons().len(), 15);
        assert_eq!(config.horizons()[0], 1);
        assert!(config.sources().is_none());
        assert!(config.reference().is_none());
        assert!(config.climatology().is_none());
        assert!(config.region().is_none());
        assert!(!config.area_mean());
        assert!(config.problems().is_empty());
    }

    #[test]
    fn test_builder_methods() {
        let region = Region::new(36.0, 41.0, 67.0, 75.0).unwrap();
        let config = VerifyConfig::new("P", d("2024-08-16"), d("2024-08-20"))
            .with_horizons([3, 5, 7])
            .with_sources(["GEFS", "ICON"])
            .with_reference("ERA5")
            .with_climatology("CLIM")
            .with_region(region)
            .with_area_mean(true);

        assert_eq!(config.horizons(), [3, 5, 7]);
        assert_eq!(config.sources().unwrap(), ["GEFS", "ICON"]);
        assert_eq!(config.reference(), Some("ERA5"));
        assert_eq!(config.climatology(), Some("CLIM"));
        assert_eq!(config.region(), Some(&region));
        assert!(config.area_mean());
    }

    #[test]
    fn test_problems_collected() {
        let config = VerifyConfig::new("Temp", d("2024-09-30"), d("2024-08-16"))
            .with_horizons([0, 2, 2])
            .with_sources(Vec::<String>::new());
        let problems = config.problems();
        assert_eq!(problems.len(), 4, "{problems:?}");
    }
}
