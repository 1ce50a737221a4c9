//! Keyword categorization of the open-ended suggestion answers.
//!
//! Membership is not exclusive: a suggestion that mentions both the service
//! and the interest rate counts towards both categories, so category
//! percentages need not add up to 100.

use crate::types::{
    Priority, PriorityTally, Sentiment, SentimentTally, SuggestionCategory, SuggestionDetail,
    SurveyRecord,
};
use crate::util::percentage;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

pub const MAX_DETAILS: usize = 3;
pub const MAX_DETAIL_CHARS: usize = 80;

/// Answers that carry no suggestion, compared lower-cased.
const PLACEHOLDERS: [&str; 8] = [
    "no",
    "n/a",
    "na",
    "nada",
    "ninguna",
    "ninguno",
    "no aplica",
    "sin comentarios",
];

const QUOTES: [char; 5] = ['"', '\'', '“', '”', '«'];

struct CategoryKeywords {
    label: &'static str,
    keywords: &'static [&'static str],
}

const CATEGORIES: [CategoryKeywords; 5] = [
    CategoryKeywords {
        label: "Atención y Servicio al Cliente",
        keywords: &[
            "atención", "atencion", "servicio", "amabilidad", "personal", "asesor",
            "ejecutivo", "trato", "cordialidad", "profesionalismo", "capacitación",
            "conocimiento",
        ],
    },
    CategoryKeywords {
        label: "Productos y Tasas",
        keywords: &[
            "tasa", "interés", "interes", "producto", "tarifa", "costo", "precio", "cdt",
            "crédito", "credito", "cuenta", "ahorro", "inversión", "comisión", "cuota",
        ],
    },
    CategoryKeywords {
        label: "Tecnología y Canales Digitales",
        keywords: &[
            "página", "pagina", "web", "app", "aplicación", "aplicacion", "tecnología",
            "tecnologia", "sistema", "digital", "online", "internet", "móvil", "plataforma",
        ],
    },
    CategoryKeywords {
        label: "Tiempos de Respuesta",
        keywords: &[
            "tiempo", "espera", "rápido", "rapido", "lento", "demora", "agilidad",
            "eficiencia", "velocidad", "pronto", "tardanza", "respuesta",
        ],
    },
    CategoryKeywords {
        label: "Horarios y Disponibilidad",
        keywords: &[
            "horario", "hora", "disponibilidad", "abierto", "cerrado", "fin de semana",
            "festivo", "sábado", "sabado", "noche",
        ],
    },
];

/// Words that lean a suggestion positive or negative.
const POSITIVE_WORDS: [&str; 11] = [
    "excelente", "bueno", "bien", "satisfecho", "contento", "feliz", "gracias", "perfecto",
    "ideal", "recomiendo", "agradezco",
];
const NEGATIVE_WORDS: [&str; 11] = [
    "malo", "pésimo", "terrible", "problema", "queja", "molesto", "disgusto", "insatisfecho",
    "lento", "demora", "error",
];

/// Words that make any suggestion high priority.
const URGENT_WORDS: [&str; 8] = [
    "urgente", "inmediato", "problema", "error", "falla", "queja", "malo", "pésimo",
];

/// Neutral suggestions longer than this are medium priority.
const DETAILED_CHARS: usize = 50;

/// Strip quote characters and surrounding whitespace; `None` when what is
/// left is too short or a placeholder answer.
pub fn clean_suggestion(raw: &str) -> Option<String> {
    let stripped: String = raw.chars().filter(|c| !QUOTES.contains(c)).collect();
    let text = stripped.trim();
    if text.chars().count() <= 3 {
        return None;
    }
    let lower = text.to_lowercase();
    if PLACEHOLDERS.contains(&lower.trim_end_matches(['.', '!'])) {
        return None;
    }
    Some(text.to_string())
}

/// `keyword` occurs in `lower` starting at a word boundary, so "hora"
/// matches "horas" but not "ahora".
fn has_keyword(lower: &str, keyword: &str) -> bool {
    lower.match_indices(keyword).any(|(i, _)| {
        lower[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

fn has_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| has_keyword(lower, k))
}

/// Labels of every category whose keywords appear in `text`.
pub fn matching_categories(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    CATEGORIES
        .iter()
        .filter(|c| has_any(&lower, c.keywords))
        .map(|c| c.label)
        .collect()
}

/// More positive than negative words is positive, and the reverse negative.
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| has_keyword(&lower, w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| has_keyword(&lower, w)).count();
    match positive.cmp(&negative) {
        Ordering::Greater => Sentiment::Positive,
        Ordering::Less => Sentiment::Negative,
        Ordering::Equal => Sentiment::Neutral,
    }
}

/// Negative or urgent suggestions are high priority; long neutral ones medium.
pub fn determine_priority(text: &str, sentiment: Sentiment) -> Priority {
    let lower = text.to_lowercase();
    if sentiment == Sentiment::Negative || has_any(&lower, &URGENT_WORDS) {
        Priority::High
    } else if sentiment == Sentiment::Neutral && text.chars().count() > DETAILED_CHARS {
        Priority::Medium
    } else {
        Priority::Low
    }
}

pub fn truncate_detail(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_DETAIL_CHARS).collect();
    format!("{}...", head.trim_end())
}

struct Analyzed {
    text: String,
    lower: String,
    sentiment: Sentiment,
    priority: Priority,
}

/// Categorize every valid suggestion and rank categories by match count.
///
/// Each detail's percentage is how often that text was given among all
/// valid suggestions. Texts that read the same once truncated share one
/// detail. Categories without matches are left out.
pub fn categorize(records: &[SurveyRecord]) -> Vec<SuggestionCategory> {
    let suggestions: Vec<Analyzed> = records
        .iter()
        .filter_map(|r| r.suggestion.as_deref())
        .filter_map(clean_suggestion)
        .map(|text| {
            let sentiment = analyze_sentiment(&text);
            Analyzed {
                lower: text.to_lowercase(),
                priority: determine_priority(&text, sentiment),
                sentiment,
                text,
            }
        })
        .collect();
    let total = suggestions.len();
    if total == 0 {
        return Vec::new();
    }

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for s in &suggestions {
        *frequency.entry(s.text.as_str()).or_insert(0) += 1;
    }

    let mut categories: Vec<SuggestionCategory> = CATEGORIES
        .iter()
        .filter_map(|category| {
            let matches: Vec<&Analyzed> = suggestions
                .iter()
                .filter(|s| has_any(&s.lower, category.keywords))
                .collect();
            if matches.is_empty() {
                return None;
            }

            let mut sentiment = SentimentTally::default();
            let mut priorities = PriorityTally::default();
            for m in &matches {
                sentiment.add(m.sentiment);
                priorities.add(m.priority);
            }

            let mut seen: Vec<&str> = Vec::new();
            let mut details: Vec<SuggestionDetail> = Vec::new();
            for m in &matches {
                let text = m.text.as_str();
                if seen.contains(&text) {
                    continue;
                }
                seen.push(text);
                let shown = truncate_detail(text);
                let count = frequency[text];
                match details.iter_mut().find(|d| d.text == shown) {
                    Some(d) => d.count += count,
                    None => details.push(SuggestionDetail {
                        text: shown,
                        count,
                        percentage: 0,
                    }),
                }
            }
            // Stable: equally frequent texts keep their export order.
            details.sort_by(|a, b| b.count.cmp(&a.count));
            details.truncate(MAX_DETAILS);
            for d in &mut details {
                d.percentage = percentage(d.count, total).round() as u32;
            }

            Some(SuggestionCategory {
                label: category.label.to_string(),
                percentage: percentage(matches.len(), total).round() as u32,
                count: matches.len(),
                details,
                sentiment,
                priority: priorities.dominant(),
                priorities,
            })
        })
        .collect();

    categories.sort_by(|a, b| b.count.cmp(&a.count));
    debug!(suggestions = total, categories = categories.len(), "suggestions categorized");
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::record;

    fn suggesting(texts: &[&str]) -> Vec<SurveyRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut r = record(&i.to_string(), "PERSONAS", [Some(4), None, None, None]);
                r.suggestion = Some(t.to_string());
                r
            })
            .collect()
    }

    #[test]
    fn placeholders_and_short_answers_are_invalid() {
        assert_eq!(clean_suggestion("No"), None);
        assert_eq!(clean_suggestion("\"\""), None);
        assert_eq!(clean_suggestion("  \"no\"  "), None);
        assert_eq!(clean_suggestion("Ninguna."), None);
        assert_eq!(clean_suggestion("Bien"), Some("Bien".to_string()));
        assert_eq!(
            clean_suggestion("\"Mejorar la app\""),
            Some("Mejorar la app".to_string())
        );
    }

    #[test]
    fn one_suggestion_can_land_in_two_categories() {
        let text = "El servicio de atención fue excelente pero la tasa de interés es alta";
        let labels = matching_categories(text);
        assert!(labels.contains(&"Atención y Servicio al Cliente"));
        assert!(labels.contains(&"Productos y Tasas"));

        let cats = categorize(&suggesting(&[text]));
        assert_eq!(cats.len(), 2);
        assert!(cats.iter().all(|c| c.count == 1 && c.percentage == 100));
    }

    #[test]
    fn categories_ranked_by_matches() {
        let rows = suggesting(&[
            "Bajar la tasa del crédito",
            "Mejorar las tasas de interés",
            "Bajar la tasa del crédito",
            "La app se cae mucho",
            "No",
            "Más horario los sábados",
        ]);
        let cats = categorize(&rows);
        assert_eq!(cats[0].label, "Productos y Tasas");
        assert_eq!(cats[0].count, 3);
        assert_eq!(cats[0].percentage, 60);
        assert_eq!(cats[0].details.len(), 2);
        assert_eq!(cats[0].details[0].text, "Bajar la tasa del crédito");
        assert_eq!(cats[0].details[0].count, 2);
        assert_eq!(cats[0].details[0].percentage, 40);
        assert_eq!(cats[0].details[1].percentage, 20);
        assert!(cats.iter().all(|c| c.count > 0));
        assert!(!cats.iter().any(|c| c.label == "Tiempos de Respuesta"));
    }

    #[test]
    fn details_are_capped_and_truncated() {
        let long = format!("Mejorar el servicio {}", "muy ".repeat(30));
        let rows = suggesting(&[
            &long,
            "Servicio lento en caja",
            "Buen servicio siempre",
            "Servicio cordial",
        ]);
        let cats = categorize(&rows);
        let service = &cats[0];
        assert_eq!(service.count, 4);
        assert_eq!(service.details.len(), MAX_DETAILS);
        assert!(service.details[0].text.ends_with("..."));
        assert!(service.details[0].text.chars().count() <= MAX_DETAIL_CHARS + 3);
    }

    #[test]
    fn keywords_match_at_word_start_only() {
        let labels = matching_categories("Ahora todo está muy bien con mi asesor");
        assert_eq!(labels, vec!["Atención y Servicio al Cliente"]);
        assert!(matching_categories("Ampliar las horas de atención")
            .contains(&"Horarios y Disponibilidad"));
        assert!(matching_categories("(tasa) muy alta").contains(&"Productos y Tasas"));
    }

    #[test]
    fn sentiment_and_priority_per_suggestion() {
        assert_eq!(analyze_sentiment("Excelente servicio, muy contento"), Sentiment::Positive);
        assert_eq!(analyze_sentiment("El proceso es lento y hay demora"), Sentiment::Negative);
        assert_eq!(analyze_sentiment("Bien pero lento"), Sentiment::Neutral);
        // "también" does not carry "bien"
        assert_eq!(analyze_sentiment("También quiero otra cuenta"), Sentiment::Neutral);

        assert_eq!(determine_priority("Todo lento", Sentiment::Negative), Priority::High);
        assert_eq!(
            determine_priority("Hubo un error con la cuenta pero excelente", Sentiment::Neutral),
            Priority::High
        );
        let long = "Sería bueno tener más opciones de inversión para clientes del segmento";
        assert_eq!(determine_priority(long, Sentiment::Neutral), Priority::Medium);
        assert_eq!(determine_priority(long, Sentiment::Positive), Priority::Low);
        assert_eq!(determine_priority("Otra cuenta", Sentiment::Neutral), Priority::Low);
    }

    #[test]
    fn categories_tally_sentiment_and_priority() {
        let rows = suggesting(&[
            "Excelente servicio, gracias",
            "El servicio es muy lento",
            "Servicio con problema en caja",
            "Servicio en la agencia",
        ]);
        let cats = categorize(&rows);
        let service = &cats[0];
        assert_eq!(service.label, "Atención y Servicio al Cliente");
        assert_eq!(
            service.sentiment,
            SentimentTally {
                positive: 1,
                negative: 2,
                neutral: 1,
            }
        );
        assert_eq!(
            service.priorities,
            PriorityTally {
                high: 2,
                medium: 0,
                low: 2,
            }
        );
        assert_eq!(service.priority, Priority::High);
    }

    #[test]
    fn truncated_duplicates_share_one_detail() {
        let prefix = "Mejorar el servicio en la agencia principal porque siempre hay mucha gente en fila";
        assert!(prefix.chars().count() >= MAX_DETAIL_CHARS);
        let a = format!("{} los lunes", prefix);
        let b = format!("{} los viernes", prefix);
        let cats = categorize(&suggesting(&[&a, &b, "Servicio cordial"]));
        let service = &cats[0];
        assert_eq!(service.count, 3);
        assert_eq!(service.details.len(), 2);
        assert_eq!(service.details[0].count, 2);
        assert_eq!(service.details[0].percentage, 67);
        assert_ne!(service.details[0].text, service.details[1].text);
    }

    #[test]
    fn no_valid_suggestions_gives_nothing() {
        assert!(categorize(&suggesting(&["No", "\"\"", "ok"])).is_empty());
        assert!(categorize(&[]).is_empty());
    }
}
