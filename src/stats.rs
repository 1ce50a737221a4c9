//! Metric aggregation: averages, rating bands and filtered subsets.

use crate::types::{KpiEntry, Metric, PerMetric, Segment, Stats, SurveyRecord};
use crate::util::{average, percentage, round_to};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Record dimensions the dashboard can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Segment,
    City,
    Agency,
    ExecutiveType,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Segment,
        FilterField::City,
        FilterField::Agency,
        FilterField::ExecutiveType,
    ];

    /// Accepts the column names of the export and the dashboard filter names.
    pub fn from_name(name: &str) -> Option<FilterField> {
        match name.trim() {
            "SEGMENTO" | "segmento" | "segment" => Some(FilterField::Segment),
            "CIUDAD" | "ciudad" | "city" => Some(FilterField::City),
            "AGENCIA" | "agencia" | "agency" => Some(FilterField::Agency),
            "TIPO_EJECUTIVO" | "TIPO EJECUTIVO" | "tipoEjecutivo" | "executive_type" => {
                Some(FilterField::ExecutiveType)
            }
            _ => None,
        }
    }

    pub fn value_of(self, record: &SurveyRecord) -> &str {
        match self {
            FilterField::Segment => record.segment.as_str(),
            FilterField::City => &record.city,
            FilterField::Agency => &record.agency,
            FilterField::ExecutiveType => &record.executive_type,
        }
    }

    /// Executive type compares case-insensitively; the rest exactly.
    pub fn matches(self, record: &SurveyRecord, value: &str) -> bool {
        let field_value = self.value_of(record);
        match self {
            FilterField::ExecutiveType => field_value.to_uppercase() == value.to_uppercase(),
            _ => field_value == value,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterField::Segment => "SEGMENTO",
            FilterField::City => "CIUDAD",
            FilterField::Agency => "AGENCIA",
            FilterField::ExecutiveType => "TIPO_EJECUTIVO",
        };
        f.write_str(s)
    }
}

pub fn filter_records<'a>(
    records: &'a [SurveyRecord],
    field: FilterField,
    value: &str,
) -> Vec<&'a SurveyRecord> {
    records.iter().filter(|r| field.matches(r, value)).collect()
}

pub fn filter_segment<'a>(
    records: &'a [SurveyRecord],
    segment: &Segment,
) -> Vec<&'a SurveyRecord> {
    records.iter().filter(|r| &r.segment == segment).collect()
}

/// Average and 5 / 4 / 1-3 bands of `metric` over the answered values.
///
/// Records without an answer for `metric` are ignored. With no answered
/// values at all the result is [`Stats::zero`].
pub fn compute_stats<'a, I>(records: I, metric: Metric) -> Stats
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let values: Vec<u8> = records
        .into_iter()
        .filter_map(|r| r.rating(metric))
        .collect();
    let total = values.len();
    if total == 0 {
        return Stats::zero();
    }

    let sum: u32 = values.iter().map(|v| u32::from(*v)).sum();
    let fives = values.iter().filter(|v| **v == 5).count();
    let fours = values.iter().filter(|v| **v == 4).count();
    let low = values.iter().filter(|v| (1..=3).contains(*v)).count();

    Stats {
        average: round_to(f64::from(sum) / total as f64, 2),
        rating5: round_to(percentage(fives, total), 1),
        rating4: round_to(percentage(fours, total), 1),
        rating123: round_to(percentage(low, total), 1),
        total,
    }
}

/// The four metric averages of a subset, each 0 when unanswered.
pub fn metric_averages(records: &[&SurveyRecord]) -> PerMetric<f64> {
    PerMetric::from_fn(|m| compute_stats(records.iter().copied(), m).average)
}

/// Consolidated, Personas and Empresarial stats for every tracked metric.
pub fn kpi_data(records: &[SurveyRecord]) -> Vec<KpiEntry> {
    let personas = filter_segment(records, &Segment::Personas);
    let empresarial = filter_segment(records, &Segment::Empresarial);
    debug!(
        total = records.len(),
        personas = personas.len(),
        empresarial = empresarial.len(),
        "computing KPI data"
    );

    Metric::ALL
        .iter()
        .map(|&metric| KpiEntry {
            metric,
            name: metric.display_name().to_string(),
            consolidated: compute_stats(records, metric),
            personas: compute_stats(personas.iter().copied(), metric),
            empresarial: compute_stats(empresarial.iter().copied(), metric),
        })
        .collect()
}

/// Mean overall satisfaction over respondents who answered it.
pub fn overall_average_rating(records: &[SurveyRecord]) -> f64 {
    compute_stats(records, Metric::Satisfaction).average
}

/// Count of answers per rating; index 0 holds rating 1.
pub fn rating_distribution(records: &[SurveyRecord], metric: Metric) -> [usize; 5] {
    let mut counts = [0usize; 5];
    for v in records.iter().filter_map(|r| r.rating(metric)) {
        counts[usize::from(v) - 1] += 1;
    }
    counts
}

/// Metrics for one value of a filter dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterStats {
    pub value: String,
    pub total_surveys: usize,
    pub averages: PerMetric<f64>,
    /// Mean of the metric averages that have data.
    pub average_rating: f64,
}

/// One [`FilterStats`] per distinct non-empty value of `field`, busiest first.
///
/// Executive types are grouped upper-cased since the export spells them
/// inconsistently.
pub fn filter_stats(records: &[SurveyRecord], field: FilterField) -> Vec<FilterStats> {
    let mut values: Vec<String> = Vec::new();
    for r in records {
        let raw = field.value_of(r).trim();
        if raw.is_empty() {
            continue;
        }
        let key = match field {
            FilterField::ExecutiveType => raw.to_uppercase(),
            _ => raw.to_string(),
        };
        if !values.contains(&key) {
            values.push(key);
        }
    }

    let mut stats: Vec<FilterStats> = values
        .into_iter()
        .filter_map(|value| {
            let subset = filter_records(records, field, &value);
            if subset.is_empty() {
                return None;
            }
            let averages = metric_averages(&subset);
            let with_data: Vec<f64> = Metric::ALL
                .iter()
                .map(|m| *averages.get(*m))
                .filter(|v| *v > 0.0)
                .collect();
            Some(FilterStats {
                value,
                total_surveys: subset.len(),
                averages,
                average_rating: round_to(average(&with_data), 2),
            })
        })
        .collect();

    stats.sort_by(|a, b| b.total_surveys.cmp(&a.total_surveys));
    stats
}
