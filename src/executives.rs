use crate::types::{Segment, SurveyRecord};
use crate::util::{percentage, round_to};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutiveCategory {
    Personas,
    EmpresarialBogota,
    EmpresarialMedellin,
    EmpresarialOther,
    General,
}

impl ExecutiveCategory {
    pub fn classify(segment: &Segment, city: &str) -> Self {
        match segment {
            Segment::Personas => ExecutiveCategory::Personas,
            Segment::Empresarial => {
                let city = city.to_lowercase();
                if city.contains("bogota") || city.contains("bogotá") {
                    ExecutiveCategory::EmpresarialBogota
                } else if city.contains("medellin") || city.contains("medellín") {
                    ExecutiveCategory::EmpresarialMedellin
                } else {
                    ExecutiveCategory::EmpresarialOther
                }
            }
            Segment::Other(_) => ExecutiveCategory::General,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExecutiveCategory::Personas => "Personas",
            ExecutiveCategory::EmpresarialBogota => "Empresarial Bogotá",
            ExecutiveCategory::EmpresarialMedellin => "Empresarial Medellín",
            ExecutiveCategory::EmpresarialOther => "Empresarial Otras",
            ExecutiveCategory::General => "General",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveParticipation {
    pub name: String,
    pub surveys: usize,
    /// Share of all surveys attributed to an executive, 2 decimals.
    pub percentage: f64,
    pub executive_type: String,
    pub agency: String,
    pub segment: Segment,
    pub city: String,
    pub category: ExecutiveCategory,
}

/// Surveys per resolved executive name, most surveyed first.
///
/// Descriptive fields come from the executive's first survey in the export.
pub fn executive_participation(records: &[SurveyRecord]) -> Vec<ExecutiveParticipation> {
    let mut groups: Vec<(&str, Vec<&SurveyRecord>)> = Vec::new();
    for r in records {
        let name = r.executive_final.trim();
        if name.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, members)) => members.push(r),
            None => groups.push((name, vec![r])),
        }
    }
    let attributed: usize = groups.iter().map(|(_, m)| m.len()).sum();

    let mut rows: Vec<ExecutiveParticipation> = groups
        .into_iter()
        .map(|(name, members)| {
            let first = members[0];
            ExecutiveParticipation {
                name: name.to_string(),
                surveys: members.len(),
                percentage: round_to(percentage(members.len(), attributed), 2),
                executive_type: first.executive_type.to_uppercase(),
                agency: first.agency.clone(),
                segment: first.segment.clone(),
                city: first.city.clone(),
                category: ExecutiveCategory::classify(&first.segment, &first.city),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.surveys.cmp(&a.surveys));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::record;

    fn by(id: &str, exec: &str, segment: &str, city: &str) -> SurveyRecord {
        let mut r = record(id, segment, [Some(4), None, None, None]);
        r.executive_final = exec.to_string();
        r.executive_type = "senior".to_string();
        r.city = city.to_string();
        r
    }

    #[test]
    fn groups_by_resolved_executive() {
        let rows = vec![
            by("1", "ANA GOMEZ", "EMPRESARIAL", "BOGOTA D.C."),
            by("2", "LUIS PEREZ", "PERSONAS", "CALI"),
            by("3", "ANA GOMEZ", "EMPRESARIAL", "BOGOTA D.C."),
            by("4", "", "PERSONAS", "CALI"),
            by("5", "ANA GOMEZ", "EMPRESARIAL", "MEDELLIN"),
            by("6", "MARIA RUIZ", "EMPRESARIAL", "Medellín"),
        ];
        let report = executive_participation(&rows);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].name, "ANA GOMEZ");
        assert_eq!(report[0].surveys, 3);
        assert_eq!(report[0].percentage, 60.0);
        assert_eq!(report[0].executive_type, "SENIOR");
        assert_eq!(report[0].category, ExecutiveCategory::EmpresarialBogota);
        assert_eq!(report[1].category, ExecutiveCategory::Personas);
        assert_eq!(report[2].category, ExecutiveCategory::EmpresarialMedellin);
        let total: f64 = report.iter().map(|e| e.percentage).sum();
        assert!((total - 100.0).abs() < 0.05);
    }

    #[test]
    fn no_executives_gives_empty_report() {
        let rows = vec![by("1", " ", "PERSONAS", "CALI")];
        assert!(executive_participation(&rows).is_empty());
    }
}
