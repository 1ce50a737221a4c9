//! The loaded survey dataset and the aggregation surface built on top of it.
//!
//! A [`SurveyStore`] is written once by its first load and read by every
//! aggregator afterwards. Before a load, and after a load that failed, the
//! store behaves as an empty dataset and every aggregate is its zero value.

use crate::config::SurveyConfig;
use crate::error::{Result, SurveyError};
use crate::executives::{self, ExecutiveParticipation};
use crate::geography;
use crate::loader;
use crate::nps;
use crate::segments::{self, SegmentComparison};
use crate::stats::{self, FilterField, FilterStats};
use crate::suggestions;
use crate::technical;
use crate::types::{
    GeographicEntry, KpiEntry, LoadReport, Metric, NpsResult, Stats, SuggestionCategory,
    SurveyRecord, TechnicalInfo,
};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

pub struct SurveyStore {
    config: SurveyConfig,
    loaded: OnceCell<(Vec<SurveyRecord>, LoadReport)>,
}

impl SurveyStore {
    pub fn new(config: SurveyConfig) -> Self {
        Self {
            config,
            loaded: OnceCell::new(),
        }
    }

    /// A store already holding `records`, with default configuration.
    pub fn from_records(records: Vec<SurveyRecord>) -> Self {
        let report = LoadReport {
            total_rows: records.len(),
            valid_rows: records.len(),
            ..LoadReport::default()
        };
        let store = Self::new(SurveyConfig::default());
        // A fresh cell cannot already be set.
        let _ = store.loaded.set((records, report));
        store
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Load the configured export once.
    ///
    /// Later calls return the first result without reading the file again. A
    /// failed read is logged and answered with an empty dataset, and leaves
    /// the store unloaded so the next call tries again.
    pub fn load(&self) -> &[SurveyRecord] {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.config.csv_path, error = %e, "survey export could not be loaded");
                &[]
            }
        }
    }

    /// Like [`SurveyStore::load`] but hands the error back.
    pub fn try_load(&self) -> Result<&[SurveyRecord]> {
        let (records, _) = self.loaded.get_or_try_init(|| {
            let loaded = loader::load_from_path(&self.config.csv_path, self.config.delimiter)?;
            info!(records = loaded.0.len(), "survey dataset ready");
            Ok::<_, SurveyError>(loaded)
        })?;
        Ok(records)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Every valid record; empty until a load has happened.
    pub fn data(&self) -> &[SurveyRecord] {
        self.loaded.get().map(|(r, _)| r.as_slice()).unwrap_or(&[])
    }

    pub fn load_report(&self) -> LoadReport {
        self.loaded.get().map(|(_, report)| *report).unwrap_or_default()
    }

    pub fn kpi_data(&self) -> Vec<KpiEntry> {
        stats::kpi_data(self.data())
    }

    pub fn city_data(&self) -> Vec<GeographicEntry> {
        geography::city_data(self.data())
    }

    pub fn agency_data(&self) -> Vec<GeographicEntry> {
        geography::agency_data(self.data())
    }

    pub fn calculate_nps(&self) -> NpsResult {
        nps::calculate_nps(self.data())
    }

    pub fn suggestion_data(&self) -> Vec<SuggestionCategory> {
        suggestions::categorize(self.data())
    }

    pub fn technical_info(&self) -> TechnicalInfo {
        technical::technical_info(self.data(), &self.config)
    }

    pub fn overall_average_rating(&self) -> f64 {
        stats::overall_average_rating(self.data())
    }

    pub fn filter_records(&self, field: FilterField, value: &str) -> Vec<&SurveyRecord> {
        stats::filter_records(self.data(), field, value)
    }

    /// Stats over a subset, typically one built with
    /// [`SurveyStore::filter_records`] and further narrowed by the caller.
    pub fn compute_stats(&self, subset: &[&SurveyRecord], metric: Metric) -> Stats {
        stats::compute_stats(subset.iter().copied(), metric)
    }

    pub fn rating_distribution(&self, metric: Metric) -> [usize; 5] {
        stats::rating_distribution(self.data(), metric)
    }

    pub fn filter_stats(&self, field: FilterField) -> Vec<FilterStats> {
        stats::filter_stats(self.data(), field)
    }

    pub fn segment_comparison(&self) -> SegmentComparison {
        segments::segment_comparison(self.data())
    }

    pub fn executive_participation(&self) -> Vec<ExecutiveParticipation> {
        executives::executive_participation(self.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::record;

    #[test]
    fn missing_file_loads_as_empty_dataset() {
        let store = SurveyStore::new(
            SurveyConfig::default().with_csv_path("/nonexistent/survey/datos.csv"),
        );
        assert!(store.try_load().is_err());
        assert!(!store.is_loaded());

        assert!(store.load().is_empty());
        assert!(!store.is_loaded());
        assert_eq!(store.load_report(), LoadReport::default());
        assert_eq!(store.calculate_nps(), NpsResult::default());
        assert_eq!(store.overall_average_rating(), 0.0);
        let kpis = store.kpi_data();
        assert_eq!(kpis.len(), 4);
        assert!(kpis.iter().all(|k| k.consolidated == Stats::zero()));
        assert!(store.city_data().is_empty());
        assert!(store.suggestion_data().is_empty());
    }

    #[test]
    fn unloaded_store_reads_as_empty() {
        let store = SurveyStore::new(SurveyConfig::default());
        assert!(store.data().is_empty());
        assert_eq!(store.technical_info().total_respondents, 0);
    }

    #[test]
    fn filtered_view_composes_with_stats() {
        let mut a = record("1", "PERSONAS", [Some(5), Some(5), Some(5), Some(5)]);
        a.city = "Bogotá".to_string();
        a.executive_type = "Senior".to_string();
        let mut b = record("2", "EMPRESARIAL", [Some(2), Some(2), Some(2), Some(2)]);
        b.city = "Bogotá".to_string();
        b.executive_type = "Junior".to_string();
        let store = SurveyStore::from_records(vec![a, b]);

        let subset: Vec<&SurveyRecord> = store
            .filter_records(FilterField::City, "Bogotá")
            .into_iter()
            .filter(|r| FilterField::ExecutiveType.matches(r, "senior"))
            .collect();
        let s = store.compute_stats(&subset, Metric::Loyalty);
        assert_eq!(s.average, 5.0);
        assert_eq!(s.total, 1);
        assert_eq!(store.load_report().valid_rows, 2);
        assert_eq!(store.calculate_nps().nps_score, 0);
    }
}
