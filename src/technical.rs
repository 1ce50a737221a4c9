use crate::config::SurveyConfig;
use crate::types::{Metric, SurveyRecord, TechnicalInfo};
use crate::util::round_to;
use chrono::NaiveDateTime;

/// Sample figures for the survey's technical sheet.
///
/// The margin of error assumes maximum variance (p = 0.5) at the configured
/// confidence level. With no records every figure is 0 and the field period
/// is unknown.
pub fn technical_info(records: &[SurveyRecord], config: &SurveyConfig) -> TechnicalInfo {
    let n = records.len();
    let universe = config.universe_total;
    let (field_start, field_end) = field_period(records);

    TechnicalInfo {
        universe_total: universe,
        total_respondents: n,
        response_rate: response_rate(n, universe),
        confidence_level: confidence_label(config.confidence_z),
        margin_of_error: round_to(margin_of_error(n, config.confidence_z) * 100.0, 2),
        margin_of_error_corrected: round_to(
            margin_of_error(n, config.confidence_z) * finite_population_correction(n, universe) * 100.0,
            2,
        ),
        field_start,
        field_end,
        evaluated_metrics: Metric::ALL
            .iter()
            .map(|m| m.display_name().to_string())
            .collect(),
    }
}

pub fn response_rate(n: usize, universe: usize) -> f64 {
    if universe == 0 {
        return 0.0;
    }
    round_to(n as f64 / universe as f64 * 100.0, 2)
}

/// `z * sqrt(0.25 / n)` as a fraction; 0 for an empty sample.
pub fn margin_of_error(n: usize, z: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    z * (0.5 * 0.5 / n as f64).sqrt()
}

/// `sqrt((N - n) / (N - 1))`, clamped to 0 once the sample covers the universe.
pub fn finite_population_correction(n: usize, universe: usize) -> f64 {
    if universe <= 1 || n >= universe {
        return 0.0;
    }
    ((universe - n) as f64 / (universe - 1) as f64).sqrt()
}

/// Earliest and latest parseable response timestamps.
pub fn field_period(records: &[SurveyRecord]) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let stamps = records.iter().filter_map(|r| r.responded_at);
    let start = stamps.clone().min();
    let end = stamps.max();
    (start, end)
}

fn confidence_label(z: f64) -> String {
    let level = match z {
        z if (z - 1.645).abs() < 1e-3 => "90%",
        z if (z - 1.96).abs() < 1e-3 => "95%",
        z if (z - 2.576).abs() < 1e-3 => "99%",
        _ => return format!("z = {:.3}", z),
    };
    level.to_string()
}
