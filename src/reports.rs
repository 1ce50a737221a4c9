//! Flat report rows for CSV export and console previews.

use crate::dataset::SurveyStore;
use crate::executives::ExecutiveParticipation;
use crate::geography::city_for_agency;
use crate::segments::{GapStatus, SegmentComparison};
use crate::types::{
    Comparison, DashboardSummary, ExecutiveRow, GeographicEntry, GeographicRow, KpiEntry, KpiRow,
    SegmentGapRow, Stats, SuggestionCategory, SuggestionRow,
};
use crate::util::format_number;

fn kpi_row(entry: &KpiEntry, scope: &str, stats: &Stats) -> KpiRow {
    KpiRow {
        metric: entry.name.clone(),
        scope: scope.to_string(),
        average: format_number(stats.average, 2),
        rating5: format_number(stats.rating5, 1),
        rating4: format_number(stats.rating4, 1),
        rating123: format_number(stats.rating123, 1),
        responses: stats.total,
    }
}

/// Three rows per metric: consolidated, Personas, Empresarial.
pub fn kpi_report(kpis: &[KpiEntry]) -> Vec<KpiRow> {
    kpis.iter()
        .flat_map(|k| {
            [
                kpi_row(k, "Consolidado", &k.consolidated),
                kpi_row(k, "Personas", &k.personas),
                kpi_row(k, "Empresarial", &k.empresarial),
            ]
        })
        .collect()
}

fn geographic_row(entry: &GeographicEntry, city: String) -> GeographicRow {
    let cell = |v: f64, c: Comparison| format!("{} ({})", format_number(v, 2), c);
    GeographicRow {
        name: entry.name.clone(),
        city,
        respondents: entry.total_respondents,
        clarity: cell(entry.metrics.clarity, entry.comparison.clarity),
        recommendation: cell(entry.metrics.recommendation, entry.comparison.recommendation),
        satisfaction: cell(entry.metrics.satisfaction, entry.comparison.satisfaction),
        loyalty: cell(entry.metrics.loyalty, entry.comparison.loyalty),
    }
}

pub fn city_report(cities: &[GeographicEntry]) -> Vec<GeographicRow> {
    cities
        .iter()
        .map(|c| geographic_row(c, c.name.clone()))
        .collect()
}

/// Agency rows with the city each agency belongs to.
pub fn agency_report(agencies: &[GeographicEntry]) -> Vec<GeographicRow> {
    agencies
        .iter()
        .map(|a| geographic_row(a, city_for_agency(&a.name)))
        .collect()
}

/// One row per listed detail, categories in ranking order.
pub fn suggestion_report(categories: &[SuggestionCategory]) -> Vec<SuggestionRow> {
    categories
        .iter()
        .flat_map(|c| {
            c.details.iter().map(move |d| SuggestionRow {
                category: c.label.clone(),
                category_pct: c.percentage,
                mentions: c.count,
                suggestion: d.text.clone(),
                suggestion_pct: d.percentage,
                priority: c.priority.to_string(),
                sentiment: format!(
                    "+{} / -{} / ={}",
                    c.sentiment.positive, c.sentiment.negative, c.sentiment.neutral
                ),
            })
        })
        .collect()
}

pub fn executive_report(executives: &[ExecutiveParticipation]) -> Vec<ExecutiveRow> {
    executives
        .iter()
        .enumerate()
        .map(|(idx, e)| ExecutiveRow {
            rank: idx + 1,
            executive: e.name.clone(),
            executive_type: e.executive_type.clone(),
            agency: e.agency.clone(),
            surveys: e.surveys,
            share: format_number(e.percentage, 2),
            category: e.category.label().to_string(),
        })
        .collect()
}

fn gap_status_label(status: GapStatus) -> &'static str {
    match status {
        GapStatus::Balanced => "Equilibrado",
        GapStatus::PersonasAhead => "Personas superior",
        GapStatus::EmpresarialAhead => "Empresarial superior",
    }
}

pub fn segment_gap_report(comparison: &SegmentComparison) -> Vec<SegmentGapRow> {
    comparison
        .gaps
        .iter()
        .map(|g| SegmentGapRow {
            metric: g.metric.display_name().to_string(),
            personas: format_number(g.personas.average, 2),
            empresarial: format_number(g.empresarial.average, 2),
            difference: format_number(g.difference, 2),
            status: if g.is_comparable() {
                gap_status_label(g.status).to_string()
            } else {
                "Sin datos".to_string()
            },
        })
        .collect()
}

pub fn generate_summary(store: &SurveyStore) -> DashboardSummary {
    DashboardSummary {
        total_respondents: store.data().len(),
        overall_average_rating: store.overall_average_rating(),
        nps: store.calculate_nps(),
        technical: store.technical_info(),
        priority_metric: store.segment_comparison().priority_metric,
        load_report: store.load_report(),
    }
}

/// Console one-liner of the key summary figures, as plain JSON numbers.
pub fn summary_headline(summary: &DashboardSummary) -> serde_json::Value {
    serde_json::json!({
        "respondents": summary.total_respondents,
        "nps": summary.nps.nps_score,
        "overall_average": summary.overall_average_rating,
        "margin_of_error": summary.technical.margin_of_error,
    })
}
