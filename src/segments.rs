//! Personas vs Empresarial comparison.
//!
//! The gap for a metric is the absolute difference between the two segment
//! averages. The metric with the widest gap (among those both segments
//! answered) is the one flagged for attention.

use crate::stats::{compute_stats, filter_segment};
use crate::types::{Metric, Segment, Stats, SurveyRecord};
use crate::util::{average, round_to};
use serde::Serialize;

/// Differences below this many points count as balanced.
pub const BALANCED_GAP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapStatus {
    Balanced,
    PersonasAhead,
    EmpresarialAhead,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentGap {
    pub metric: Metric,
    pub personas: Stats,
    pub empresarial: Stats,
    /// Personas minus Empresarial, 2 decimals.
    pub difference: f64,
    pub gap: f64,
    pub status: GapStatus,
}

impl SegmentGap {
    /// Both segments have answers, so the gap means something.
    pub fn is_comparable(&self) -> bool {
        !self.personas.is_empty() && !self.empresarial.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentComparison {
    pub personas_respondents: usize,
    pub empresarial_respondents: usize,
    /// Mean of the answered metric averages per segment.
    pub personas_average: f64,
    pub empresarial_average: f64,
    pub gaps: Vec<SegmentGap>,
    pub priority_metric: Option<Metric>,
}

pub fn classify_gap(difference: f64) -> GapStatus {
    if difference.abs() < BALANCED_GAP {
        GapStatus::Balanced
    } else if difference > 0.0 {
        GapStatus::PersonasAhead
    } else {
        GapStatus::EmpresarialAhead
    }
}

pub fn segment_comparison(records: &[SurveyRecord]) -> SegmentComparison {
    let personas = filter_segment(records, &Segment::Personas);
    let empresarial = filter_segment(records, &Segment::Empresarial);

    let gaps: Vec<SegmentGap> = Metric::ALL
        .iter()
        .map(|&metric| {
            let p = compute_stats(personas.iter().copied(), metric);
            let e = compute_stats(empresarial.iter().copied(), metric);
            let difference = round_to(p.average - e.average, 2);
            SegmentGap {
                metric,
                personas: p,
                empresarial: e,
                difference,
                gap: difference.abs(),
                status: classify_gap(difference),
            }
        })
        .collect();

    let priority_metric = gaps
        .iter()
        .filter(|g| g.is_comparable() && g.status != GapStatus::Balanced)
        .fold(None::<&SegmentGap>, |best, g| match best {
            Some(b) if b.gap >= g.gap => Some(b),
            _ => Some(g),
        })
        .map(|g| g.metric);

    SegmentComparison {
        personas_respondents: personas.len(),
        empresarial_respondents: empresarial.len(),
        personas_average: mean_of_answered(gaps.iter().map(|g| &g.personas)),
        empresarial_average: mean_of_answered(gaps.iter().map(|g| &g.empresarial)),
        priority_metric,
        gaps,
    }
}

fn mean_of_answered<'a>(stats: impl Iterator<Item = &'a Stats>) -> f64 {
    let averages: Vec<f64> = stats.filter_map(Stats::mean).collect();
    round_to(average(&averages), 2)
}
