//! Heuristic dosha classification from symptom keywords.

use serde::{Deserialize, Serialize};

/// Ayurvedic constitutional category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
}

const VATA: &[&str] = &[
    "anxiety",
    "stress",
    "insomnia",
    "dry",
    "cold",
    "constipation",
    "joint pain",
    "nervousness",
    "restlessness",
    "irregular digestion",
];

const PITTA: &[&str] = &[
    "inflammation",
    "anger",
    "acid",
    "burning",
    "fever",
    "rash",
    "irritation",
    "hot",
    "sharp pain",
    "excessive hunger",
];

const KAPHA: &[&str] = &[
    "congestion",
    "weight",
    "lethargy",
    "depression",
    "slow",
    "cold",
    "mucus",
    "heaviness",
    "drowsiness",
    "water retention",
];

impl Dosha {
    pub fn all() -> [Self; 3] {
        [Self::Vata, Self::Pitta, Self::Kapha]
    }

    /// Substrings that indicate an imbalance of this dosha.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Vata => VATA,
            Self::Pitta => PITTA,
            Self::Kapha => KAPHA,
        }
    }
}

/// Doshas with at least one keyword in the joined, lowercased symptom text.
/// Always in vata, pitta, kapha order.
pub fn identify_doshas<S: AsRef<str>>(symptoms: &[S]) -> Vec<Dosha> {
    let text = symptoms
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    Dosha::all()
        .into_iter()
        .filter(|d| d.keywords().iter().any(|k| text.contains(k)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_pain_and_burning_is_vata_and_pitta() {
        assert_eq!(identify_doshas(&["joint pain", "burning"]), vec![Dosha::Vata, Dosha::Pitta]);
    }

    #[test]
    fn cold_matches_vata_and_kapha() {
        assert_eq!(identify_doshas(&["Cold hands"]), vec![Dosha::Vata, Dosha::Kapha]);
    }

    #[test]
    fn no_symptoms_no_doshas() {
        let empty: [&str; 0] = [];
        assert!(identify_doshas(&empty).is_empty());
        assert!(identify_doshas(&["sneezing"]).is_empty());
    }

    #[test]
    fn all_three_can_match() {
        let symptoms = vec!["STRESS".to_string(), "fever".to_string(), "mucus".to_string()];
        assert_eq!(identify_doshas(&symptoms), Dosha::all().to_vec());
    }

    #[test]
    fn multi_word_keywords_can_span_joined_symptoms() {
        // "joint" + "pain" are joined with a space before matching
        assert_eq!(identify_doshas(&["joint", "pain"]), vec![Dosha::Vata]);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Dosha::Pitta).unwrap(), "\"pitta\"");
    }
}
