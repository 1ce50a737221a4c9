use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tabled::Tabled;

/// One row of the export after header normalization, before any cleaning.
///
/// Field names are the normalized column keys produced by
/// [`crate::loader::normalize_header`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "DATE_MODIFIED")]
    pub date_modified: Option<String>,
    #[serde(rename = "SEGMENTO")]
    pub segmento: Option<String>,
    #[serde(rename = "CIUDAD")]
    pub ciudad: Option<String>,
    #[serde(rename = "AGENCIA")]
    pub agencia: Option<String>,
    #[serde(rename = "TIPO_EJECUTIVO")]
    pub tipo_ejecutivo: Option<String>,
    #[serde(rename = "EJECUTIVO")]
    pub ejecutivo: Option<String>,
    #[serde(rename = "EJECUTIVO_FINAL")]
    pub ejecutivo_final: Option<String>,
    pub claridad_informacion: Option<String>,
    pub recomendacion: Option<String>,
    pub satisfaccion_general: Option<String>,
    pub lealtad: Option<String>,
    pub sugerencias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Personas,
    Empresarial,
    Other(String),
}

impl Segment {
    /// Trims and upper-cases the raw value before matching.
    pub fn from_raw(raw: &str) -> Self {
        let normalized = raw.trim().to_uppercase();
        match normalized.as_str() {
            "PERSONAS" => Segment::Personas,
            "EMPRESARIAL" => Segment::Empresarial,
            _ => Segment::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Segment::Personas => "PERSONAS",
            Segment::Empresarial => "EMPRESARIAL",
            Segment::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The four Likert questions tracked as KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Clarity,
    Recommendation,
    Satisfaction,
    Loyalty,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Clarity,
        Metric::Recommendation,
        Metric::Satisfaction,
        Metric::Loyalty,
    ];

    /// Normalized column key in the export.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Clarity => "claridad_informacion",
            Metric::Recommendation => "recomendacion",
            Metric::Satisfaction => "satisfaccion_general",
            Metric::Loyalty => "lealtad",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Clarity => "Claridad de Información",
            Metric::Recommendation => "Recomendación (NPS)",
            Metric::Satisfaction => "Satisfacción General",
            Metric::Loyalty => "Lealtad",
        }
    }

    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.key() == key)
    }
}

/// A value per tracked metric, serialized under the column keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerMetric<T> {
    #[serde(rename = "claridad_informacion")]
    pub clarity: T,
    #[serde(rename = "recomendacion")]
    pub recommendation: T,
    #[serde(rename = "satisfaccion_general")]
    pub satisfaction: T,
    #[serde(rename = "lealtad")]
    pub loyalty: T,
}

impl<T> PerMetric<T> {
    pub fn from_fn<F: FnMut(Metric) -> T>(mut f: F) -> Self {
        PerMetric {
            clarity: f(Metric::Clarity),
            recommendation: f(Metric::Recommendation),
            satisfaction: f(Metric::Satisfaction),
            loyalty: f(Metric::Loyalty),
        }
    }

    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Clarity => &self.clarity,
            Metric::Recommendation => &self.recommendation,
            Metric::Satisfaction => &self.satisfaction,
            Metric::Loyalty => &self.loyalty,
        }
    }
}

/// One respondent. Built once by the loader and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyRecord {
    pub id: String,
    pub date_modified: String,
    /// `None` when `date_modified` could not be parsed.
    pub responded_at: Option<NaiveDateTime>,
    pub segment: Segment,
    pub city: String,
    pub agency: String,
    pub executive_type: String,
    pub executive: String,
    pub executive_final: String,
    /// Ratings in 1..=5; `None` means no (valid) answer.
    pub ratings: PerMetric<Option<u8>>,
    pub suggestion: Option<String>,
}

impl SurveyRecord {
    pub fn rating(&self, metric: Metric) -> Option<u8> {
        *self.ratings.get(metric)
    }

    pub fn has_any_rating(&self) -> bool {
        Metric::ALL.iter().any(|m| self.rating(*m).is_some())
    }
}

/// Average and rating bands of one metric over a subset of records.
///
/// An empty subset yields `average == 0.0` with `total == 0`; use
/// [`Stats::mean`] to tell that apart from a real score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stats {
    pub average: f64,
    pub rating5: f64,
    pub rating4: f64,
    pub rating123: f64,
    /// Number of answered values the figures were computed from.
    pub total: usize,
}

impl Stats {
    pub fn zero() -> Self {
        Stats::default()
    }

    pub fn mean(&self) -> Option<f64> {
        (self.total > 0).then_some(self.average)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiEntry {
    pub metric: Metric,
    pub name: String,
    pub consolidated: Stats,
    pub personas: Stats,
    pub empresarial: Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Higher,
    Equal,
    Lower,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparison::Higher => "higher",
            Comparison::Equal => "equal",
            Comparison::Lower => "lower",
        };
        f.write_str(s)
    }
}

/// One city or agency compared against the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicEntry {
    pub name: String,
    pub total_respondents: usize,
    /// 0.0 means the place has no answers for that metric.
    pub metrics: PerMetric<f64>,
    pub comparison: PerMetric<Comparison>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NpsResult {
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
    /// Records with a recommendation answer.
    pub total: usize,
    pub nps_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionDetail {
    pub text: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// Follow-up urgency of a suggestion. Ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentTally {
    pub fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityTally {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityTally {
    pub fn add(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }

    /// Most frequent priority; ties go to the more urgent one.
    pub fn dominant(&self) -> Priority {
        if self.high >= self.medium && self.high >= self.low {
            Priority::High
        } else if self.medium >= self.low {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionCategory {
    pub label: String,
    pub percentage: u32,
    pub count: usize,
    pub details: Vec<SuggestionDetail>,
    /// Sentiment of the matching suggestions.
    pub sentiment: SentimentTally,
    pub priorities: PriorityTally,
    /// Dominant priority among the matching suggestions.
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalInfo {
    pub universe_total: usize,
    pub total_respondents: usize,
    pub response_rate: f64,
    pub confidence_level: String,
    /// Margin of error in percent, infinite-population formula.
    pub margin_of_error: f64,
    /// Margin of error in percent with the finite-population correction.
    pub margin_of_error_corrected: f64,
    pub field_start: Option<NaiveDateTime>,
    pub field_end: Option<NaiveDateTime>,
    pub evaluated_metrics: Vec<String>,
}

/// Tally of what happened to each row during a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub missing_id: usize,
    pub missing_segment: usize,
    pub no_valid_metric: usize,
    pub parse_errors: usize,
}

impl LoadReport {
    pub fn dropped_rows(&self) -> usize {
        self.missing_id + self.missing_segment + self.no_valid_metric + self.parse_errors
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Scope")]
    #[tabled(rename = "Scope")]
    pub scope: String,
    #[serde(rename = "Average")]
    #[tabled(rename = "Average")]
    pub average: String,
    #[serde(rename = "Rating5Pct")]
    #[tabled(rename = "Rating5Pct")]
    pub rating5: String,
    #[serde(rename = "Rating4Pct")]
    #[tabled(rename = "Rating4Pct")]
    pub rating4: String,
    #[serde(rename = "Rating123Pct")]
    #[tabled(rename = "Rating123Pct")]
    pub rating123: String,
    #[serde(rename = "Responses")]
    #[tabled(rename = "Responses")]
    pub responses: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GeographicRow {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "Respondents")]
    #[tabled(rename = "Respondents")]
    pub respondents: usize,
    #[serde(rename = "Clarity")]
    #[tabled(rename = "Clarity")]
    pub clarity: String,
    #[serde(rename = "Recommendation")]
    #[tabled(rename = "Recommendation")]
    pub recommendation: String,
    #[serde(rename = "Satisfaction")]
    #[tabled(rename = "Satisfaction")]
    pub satisfaction: String,
    #[serde(rename = "Loyalty")]
    #[tabled(rename = "Loyalty")]
    pub loyalty: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SuggestionRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "CategoryPct")]
    #[tabled(rename = "CategoryPct")]
    pub category_pct: u32,
    #[serde(rename = "Mentions")]
    #[tabled(rename = "Mentions")]
    pub mentions: usize,
    #[serde(rename = "Suggestion")]
    #[tabled(rename = "Suggestion")]
    pub suggestion: String,
    #[serde(rename = "SuggestionPct")]
    #[tabled(rename = "SuggestionPct")]
    pub suggestion_pct: u32,
    #[serde(rename = "Priority")]
    #[tabled(rename = "Priority")]
    pub priority: String,
    #[serde(rename = "Sentiment")]
    #[tabled(rename = "Sentiment")]
    pub sentiment: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ExecutiveRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Executive")]
    #[tabled(rename = "Executive")]
    pub executive: String,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub executive_type: String,
    #[serde(rename = "Agency")]
    #[tabled(rename = "Agency")]
    pub agency: String,
    #[serde(rename = "Surveys")]
    #[tabled(rename = "Surveys")]
    pub surveys: usize,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share: String,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SegmentGapRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Personas")]
    #[tabled(rename = "Personas")]
    pub personas: String,
    #[serde(rename = "Empresarial")]
    #[tabled(rename = "Empresarial")]
    pub empresarial: String,
    #[serde(rename = "Difference")]
    #[tabled(rename = "Difference")]
    pub difference: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_respondents: usize,
    pub overall_average_rating: f64,
    pub nps: NpsResult,
    pub technical: TechnicalInfo,
    pub priority_metric: Option<Metric>,
    pub load_report: LoadReport,
}
