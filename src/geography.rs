//! City and agency breakdowns compared against the whole dataset.

use crate::stats::{metric_averages, FilterField};
use crate::types::{Comparison, GeographicEntry, Metric, PerMetric, SurveyRecord};
use tracing::debug;

/// Differences below this are reported as `equal`.
pub const EQUAL_BAND: f64 = 0.1;

// Averages carry two decimals; this keeps e.g. 4.30 - 4.20 from landing
// just under the band because of float representation.
const BAND_TOLERANCE: f64 = 1e-9;

/// Agency name to the city it belongs to.
const AGENCY_CITY: [(&str, &str); 18] = [
    ("SAN DIEGO", "MEDELLIN"),
    ("MANIZALES", "MANIZALES"),
    ("BOGOTA PLAZA IMPERIAL", "BOGOTA D.C."),
    ("BARRANQUILLA", "BARRANQUILLA"),
    ("BOGOTA PRINCIPAL", "BOGOTA D.C."),
    ("BOGOTA GRAN ESTACION", "BOGOTA D.C."),
    ("COLTEJER PRINCIPAL", "MEDELLIN"),
    ("BOGOTA SANTA FE", "BOGOTA D.C."),
    ("BUCARAMANGA", "BUCARAMANGA"),
    ("UNICENTRO", "MEDELLIN"),
    ("PEREIRA", "PEREIRA"),
    ("BOGOTA EL NOGAL", "BOGOTA D.C."),
    ("BOGOTA CENTRO MAYOR", "BOGOTA D.C."),
    ("BOGOTA CENTRO INTERNACIONAL", "BOGOTA D.C."),
    ("CALI NORTE", "CALI"),
    ("AGENCIA PRESTIGE", "MEDELLIN"),
    ("OVIEDO", "MEDELLIN"),
    ("CUCUTA", "CUCUTA"),
];

/// City of a known agency; unknown agencies map to themselves.
pub fn city_for_agency(agency: &str) -> String {
    let key = agency.trim().to_uppercase();
    AGENCY_CITY
        .iter()
        .find(|(a, _)| *a == key)
        .map(|(_, city)| city.to_string())
        .unwrap_or_else(|| agency.to_string())
}

/// Classify a local average against the global one.
///
/// The equal band is checked before the ordering, so a difference of exactly
/// 0.1 is already `higher` or `lower`.
pub fn compare_to_global(local: f64, global: f64) -> Comparison {
    let diff = local - global;
    if diff.abs() < EQUAL_BAND - BAND_TOLERANCE {
        Comparison::Equal
    } else if local > global {
        Comparison::Higher
    } else {
        Comparison::Lower
    }
}

pub fn city_data(records: &[SurveyRecord]) -> Vec<GeographicEntry> {
    geographic_breakdown(records, FilterField::City)
}

pub fn agency_data(records: &[SurveyRecord]) -> Vec<GeographicEntry> {
    geographic_breakdown(records, FilterField::Agency)
}

/// One entry per distinct non-empty value of `field`, most respondents first.
///
/// Places come from the data itself. Ties keep the order in which places
/// first appear in the export.
pub fn geographic_breakdown(records: &[SurveyRecord], field: FilterField) -> Vec<GeographicEntry> {
    let everyone: Vec<&SurveyRecord> = records.iter().collect();
    let global = metric_averages(&everyone);

    let mut groups: Vec<(String, Vec<&SurveyRecord>)> = Vec::new();
    for r in records {
        let name = field.value_of(r);
        if name.trim().is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(n, _)| n.as_str() == name) {
            Some((_, members)) => members.push(r),
            None => groups.push((name.to_string(), vec![r])),
        }
    }
    debug!(field = %field, places = groups.len(), "geographic breakdown");

    let mut entries: Vec<GeographicEntry> = groups
        .into_iter()
        .map(|(name, members)| {
            let metrics = metric_averages(&members);
            let comparison = PerMetric::from_fn(|m: Metric| {
                compare_to_global(*metrics.get(m), *global.get(m))
            });
            GeographicEntry {
                name,
                total_respondents: members.len(),
                metrics,
                comparison,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.total_respondents.cmp(&a.total_respondents));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::record;

    fn located(id: &str, city: &str, agency: &str, sat: u8) -> SurveyRecord {
        let mut r = record(id, "PERSONAS", [Some(sat), Some(sat), Some(sat), Some(sat)]);
        r.city = city.to_string();
        r.agency = agency.to_string();
        r
    }

    #[test]
    fn comparison_boundaries() {
        assert_eq!(compare_to_global(4.30, 4.20), Comparison::Higher);
        assert_eq!(compare_to_global(4.10, 4.20), Comparison::Lower);
        assert_eq!(compare_to_global(4.299, 4.20), Comparison::Equal);
        assert_eq!(compare_to_global(4.101, 4.20), Comparison::Equal);
        assert_eq!(compare_to_global(4.20, 4.20), Comparison::Equal);
        assert_eq!(compare_to_global(0.0, 4.20), Comparison::Lower);
    }

    #[test]
    fn comparison_is_consistent_with_difference() {
        let samples = [0.0, 1.0, 3.33, 3.4, 3.43, 3.5, 4.0, 4.2, 4.3, 5.0];
        for &local in &samples {
            for &global in &samples {
                let diff = local - global;
                match compare_to_global(local, global) {
                    Comparison::Equal => assert!(diff.abs() < EQUAL_BAND),
                    Comparison::Higher => assert!(diff > 0.0),
                    Comparison::Lower => assert!(diff < 0.0),
                }
            }
        }
    }

    #[test]
    fn cities_sorted_by_respondents() {
        let rows = vec![
            located("1", "CALI", "CALI NORTE", 5),
            located("2", "MEDELLIN", "SAN DIEGO", 4),
            located("3", "MEDELLIN", "UNICENTRO", 4),
            located("4", "", "SAN DIEGO", 1),
        ];
        let cities = city_data(&rows);
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].name, "MEDELLIN");
        assert_eq!(cities[0].total_respondents, 2);
        assert_eq!(cities[1].name, "CALI");

        // global satisfaction is (5 + 4 + 4 + 1) / 4 = 3.5
        assert_eq!(cities[1].metrics.satisfaction, 5.0);
        assert_eq!(cities[1].comparison.satisfaction, Comparison::Higher);
        assert_eq!(cities[0].comparison.satisfaction, Comparison::Higher);

        let agencies = agency_data(&rows);
        assert_eq!(agencies[0].name, "SAN DIEGO");
        assert_eq!(agencies[0].total_respondents, 2);
        assert_eq!(agencies[0].metrics.satisfaction, 2.5);
        assert_eq!(agencies[0].comparison.satisfaction, Comparison::Lower);
    }

    #[test]
    fn unanswered_metric_in_a_city_is_zero() {
        let mut a = located("1", "PEREIRA", "PEREIRA", 4);
        a.ratings.loyalty = None;
        let b = located("2", "CALI", "CALI NORTE", 4);
        let cities = city_data(&[a, b]);
        let pereira = cities.iter().find(|c| c.name == "PEREIRA").unwrap();
        assert_eq!(pereira.metrics.loyalty, 0.0);
        assert_eq!(pereira.comparison.loyalty, Comparison::Lower);
        assert_eq!(pereira.comparison.satisfaction, Comparison::Equal);
    }

    #[test]
    fn agency_city_lookup() {
        assert_eq!(city_for_agency("unicentro"), "MEDELLIN");
        assert_eq!(city_for_agency("BOGOTA EL NOGAL"), "BOGOTA D.C.");
        assert_eq!(city_for_agency("Nueva Agencia"), "Nueva Agencia");
    }
}
