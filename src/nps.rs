use crate::types::{Metric, NpsResult, SurveyRecord};
use crate::util::{percentage, round_half_up};

/// Net Promoter Score from the recommendation question.
///
/// 5 is a promoter, 4 a passive and 1-3 a detractor. Respondents who did not
/// answer are left out of every count, including `total`.
pub fn calculate_nps(records: &[SurveyRecord]) -> NpsResult {
    let mut result = NpsResult::default();
    for rating in records.iter().filter_map(|r| r.rating(Metric::Recommendation)) {
        match rating {
            5 => result.promoters += 1,
            4 => result.passives += 1,
            _ => result.detractors += 1,
        }
        result.total += 1;
    }
    if result.total == 0 {
        return NpsResult::default();
    }

    let score = percentage(result.promoters, result.total)
        - percentage(result.detractors, result.total);
    result.nps_score = round_half_up(score) as i32;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::record;

    fn recommending(values: &[Option<u8>]) -> Vec<SurveyRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| record(&i.to_string(), "PERSONAS", [Some(3), *v, Some(3), Some(3)]))
            .collect()
    }

    #[test]
    fn unanswered_recommendations_are_excluded() {
        let rows = recommending(&[
            Some(5), Some(5), Some(5), Some(4), Some(4),
            Some(3), Some(3), Some(2), Some(1), None,
        ]);
        let nps = calculate_nps(&rows);
        assert_eq!(nps.promoters, 3);
        assert_eq!(nps.passives, 2);
        assert_eq!(nps.detractors, 4);
        assert_eq!(nps.total, 9);
        assert_eq!(nps.nps_score, -11);
    }

    #[test]
    fn all_promoters_is_one_hundred() {
        let nps = calculate_nps(&recommending(&[Some(5), Some(5), None]));
        assert_eq!(nps.nps_score, 100);
        let nps = calculate_nps(&recommending(&[Some(1), Some(2)]));
        assert_eq!(nps.nps_score, -100);
        let nps = calculate_nps(&recommending(&[Some(5), Some(4)]));
        assert_eq!(nps.nps_score, 50);
    }

    #[test]
    fn score_stays_in_bounds() {
        let patterns: [&[Option<u8>]; 4] = [
            &[Some(5), Some(1), Some(4)],
            &[Some(4), Some(4)],
            &[Some(1), Some(5), Some(5), Some(2), Some(3), Some(4), Some(5)],
            &[Some(2)],
        ];
        for p in patterns {
            let nps = calculate_nps(&recommending(p));
            assert!((-100..=100).contains(&nps.nps_score));
            assert_eq!(nps.promoters + nps.passives + nps.detractors, nps.total);
        }
    }

    #[test]
    fn no_answers_gives_zero_result() {
        assert_eq!(calculate_nps(&[]), NpsResult::default());
        assert_eq!(calculate_nps(&recommending(&[None, None])), NpsResult::default());
    }
}
