//! Keyword extraction and herb recommendations for the symptom/condition rule.

use crate::knowledge::HerbalKnowledge;

const RECOMMENDATION_PREAMBLE: &str = "Based on your query, here are some recommended herbs:\n\n";

/// Symptom and condition keywords found among the whitespace-separated words of `message`.
/// Surrounding punctuation is ignored; no lemmatization.
pub fn extract_symptoms_conditions(
    message: &str,
    kb: &HerbalKnowledge,
) -> (Vec<String>, Vec<String>) {
    let mut symptoms = Vec::new();
    let mut conditions = Vec::new();
    for word in message.to_lowercase().split_whitespace() {
        let word = word.trim_matches(|c: char| c.is_ascii_punctuation());
        if kb.symptom_keywords().iter().any(|k| k == word) {
            symptoms.push(word.to_string());
        }
        if kb.condition_keywords().iter().any(|k| k == word) {
            conditions.push(word.to_string());
        }
    }
    (symptoms, conditions)
}

/// Herbs for the given symptoms then conditions, each listed once in first-seen order.
pub fn recommended_herbs(
    symptoms: &[String],
    conditions: &[String],
    kb: &HerbalKnowledge,
) -> Vec<String> {
    let mut herbs: Vec<String> = Vec::new();
    let from_symptoms = symptoms.iter().flat_map(|s| kb.symptom_herbs(s));
    let from_conditions = conditions.iter().flat_map(|c| kb.condition_herbs(c));
    for herb in from_symptoms.chain(from_conditions) {
        if !herbs.contains(herb) {
            herbs.push(herb.clone());
        }
    }
    herbs
}

/// Bulleted herb list with benefit text, or `None` when there is nothing to recommend so the
/// caller can fall through. Herbs missing from the knowledge base are skipped.
pub fn format_recommendations<S: AsRef<str>>(herbs: &[S], kb: &HerbalKnowledge) -> Option<String> {
    let lines: Vec<String> = herbs
        .iter()
        .filter_map(|name| kb.herb(name.as_ref()))
        .map(|herb| format!("- {}: {}\n", herb.name, herb.benefits))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!("{}{}", RECOMMENDATION_PREAMBLE, lines.concat()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_keywords_in_message_order() {
        let kb = HerbalKnowledge::builtin();
        let (symptoms, conditions) =
            extract_symptoms_conditions("I have Stress, anxiety and diabetes.", &kb);
        assert_eq!(symptoms, vec!["stress", "anxiety"]);
        assert_eq!(conditions, vec!["diabetes"]);
    }

    #[test]
    fn partial_words_do_not_count() {
        let kb = HerbalKnowledge::builtin();
        let (symptoms, conditions) = extract_symptoms_conditions("headache painful", &kb);
        assert!(symptoms.is_empty());
        assert!(conditions.is_empty());
    }

    #[test]
    fn overlapping_herbs_are_listed_once_in_first_seen_order() {
        let kb = HerbalKnowledge::builtin();
        let herbs = recommended_herbs(&["stress".into(), "anxiety".into()], &[], &kb);
        assert_eq!(herbs, vec!["Ashwagandha", "Brahmi"]);
    }

    #[test]
    fn condition_herbs_follow_symptom_herbs() {
        let kb = HerbalKnowledge::builtin();
        let herbs = recommended_herbs(&["pain".into()], &["diabetes".into()], &kb);
        assert_eq!(herbs, vec!["Turmeric", "Triphala"]);
    }

    #[test]
    fn keywords_without_table_entries_recommend_nothing() {
        let kb = HerbalKnowledge::builtin();
        assert!(recommended_herbs(&["ache".into()], &[], &kb).is_empty());
    }

    #[test]
    fn empty_list_formats_to_none() {
        let kb = HerbalKnowledge::builtin();
        let none: [&str; 0] = [];
        assert_eq!(format_recommendations(&none, &kb), None);
        assert_eq!(format_recommendations(&["Mandrake"], &kb), None);
    }

    #[test]
    fn formats_one_line_per_herb() {
        let kb = HerbalKnowledge::builtin();
        let text = format_recommendations(&["Ashwagandha", "Brahmi"], &kb).unwrap();
        assert_eq!(
            text,
            "Based on your query, here are some recommended herbs:\n\n\
             - Ashwagandha: Boosts immunity, improves sleep, reduces inflammation\n\
             - Brahmi: Improves memory, reduces anxiety, supports brain health\n"
        );
    }
}
