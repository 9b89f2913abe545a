//! Static herb knowledge base and the fixed keyword tables the dispatcher consults.
//!
//! Everything here is built once at startup (either [`HerbalKnowledge::builtin`] or a JSON
//! file via [`HerbalKnowledge::load_json_path`]) and shared read-only behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Descriptive record for a single herb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerbRecord {
    /// Display name; unique key within the knowledge base.
    pub name: String,
    pub properties: String,
    pub benefits: String,
    pub usage: String,
    /// Lowercased into the symptom index at load time.
    #[serde(default)]
    pub treats_symptoms: Vec<String>,
    #[serde(default)]
    pub treats_conditions: Vec<String>,
    #[serde(default)]
    pub property_tags: Vec<String>,
}

impl HerbRecord {
    fn new(name: &str, properties: &str, benefits: &str, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: properties.to_string(),
            benefits: benefits.to_string(),
            usage: usage.to_string(),
            treats_symptoms: Vec::new(),
            treats_conditions: Vec::new(),
            property_tags: Vec::new(),
        }
    }

    fn with_tags(mut self, symptoms: &[&str], conditions: &[&str], properties: &[&str]) -> Self {
        self.treats_symptoms = to_strings(symptoms);
        self.treats_conditions = to_strings(conditions);
        self.property_tags = to_strings(properties);
        self
    }
}

/// On-disk shape of a knowledge file. Missing keyword tables fall back to the built-in ones.
#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    herbs: Vec<HerbRecord>,
    #[serde(default)]
    greeting_words: Option<Vec<String>>,
    #[serde(default)]
    digestive_keywords: Option<Vec<String>>,
    #[serde(default)]
    symptom_keywords: Option<Vec<String>>,
    #[serde(default)]
    condition_keywords: Option<Vec<String>>,
    #[serde(default)]
    symptom_herbs: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    condition_herbs: Option<BTreeMap<String, Vec<String>>>,
}

/// Immutable herb database plus keyword tables and derived lookup indices.
#[derive(Debug, Clone)]
pub struct HerbalKnowledge {
    herbs: Vec<HerbRecord>,
    greeting_words: Vec<String>,
    digestive_keywords: Vec<String>,
    symptom_keywords: Vec<String>,
    condition_keywords: Vec<String>,
    symptom_herbs: BTreeMap<String, Vec<String>>,
    condition_herbs: BTreeMap<String, Vec<String>>,
    symptom_index: BTreeMap<String, Vec<String>>,
    condition_index: BTreeMap<String, Vec<String>>,
    property_index: BTreeMap<String, Vec<String>>,
}

impl HerbalKnowledge {
    /// The built-in herb set and keyword tables.
    pub fn builtin() -> Self {
        Self::from_parts(builtin_herbs(), builtin_tables())
    }

    /// Loads a knowledge file from `path`. Falls back to [`Self::builtin`] when the file is
    /// missing or cannot be parsed.
    pub fn load_json_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(
                    target: "arogya::knowledge",
                    path = %path.display(),
                    error = %e,
                    "Knowledge file not readable, using built-in herb database"
                );
                return Self::builtin();
            }
        };
        match Self::from_json_str(&raw) {
            Ok(kb) => {
                tracing::info!(
                    target: "arogya::knowledge",
                    path = %path.display(),
                    herbs = kb.herbs.len(),
                    "Loaded herb knowledge file"
                );
                kb
            }
            Err(e) => {
                tracing::warn!(
                    target: "arogya::knowledge",
                    path = %path.display(),
                    error = %e,
                    "Knowledge file invalid, using built-in herb database"
                );
                Self::builtin()
            }
        }
    }

    /// Parses a knowledge file body.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let file: KnowledgeFile = serde_json::from_str(raw)?;
        let defaults = builtin_tables();
        let tables = Tables {
            greeting_words: file.greeting_words.unwrap_or(defaults.greeting_words),
            digestive_keywords: file.digestive_keywords.unwrap_or(defaults.digestive_keywords),
            symptom_keywords: file.symptom_keywords.unwrap_or(defaults.symptom_keywords),
            condition_keywords: file.condition_keywords.unwrap_or(defaults.condition_keywords),
            symptom_herbs: file.symptom_herbs.unwrap_or(defaults.symptom_herbs),
            condition_herbs: file.condition_herbs.unwrap_or(defaults.condition_herbs),
        };
        Ok(Self::from_parts(file.herbs, tables))
    }

    fn from_parts(herbs: Vec<HerbRecord>, tables: Tables) -> Self {
        let mut symptom_index: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut condition_index: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut property_index: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for herb in &herbs {
            for symptom in &herb.treats_symptoms {
                symptom_index.entry(symptom.to_lowercase()).or_default().push(herb.name.clone());
            }
            for condition in &herb.treats_conditions {
                condition_index.entry(condition.to_lowercase()).or_default().push(herb.name.clone());
            }
            for prop in &herb.property_tags {
                property_index.entry(prop.to_lowercase()).or_default().push(herb.name.clone());
            }
        }
        Self {
            herbs,
            greeting_words: lowercase_all(tables.greeting_words),
            digestive_keywords: lowercase_all(tables.digestive_keywords),
            symptom_keywords: lowercase_all(tables.symptom_keywords),
            condition_keywords: lowercase_all(tables.condition_keywords),
            symptom_herbs: tables.symptom_herbs,
            condition_herbs: tables.condition_herbs,
            symptom_index,
            condition_index,
            property_index,
        }
    }

    /// All herbs in knowledge-base order.
    pub fn herbs(&self) -> &[HerbRecord] {
        &self.herbs
    }

    pub fn len(&self) -> usize {
        self.herbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.herbs.is_empty()
    }

    /// Exact-name lookup.
    pub fn herb(&self, name: &str) -> Option<&HerbRecord> {
        self.herbs.iter().find(|h| h.name == name)
    }

    /// Case-insensitive lookup.
    pub fn find_herb(&self, name: &str) -> Option<&HerbRecord> {
        let wanted = name.trim().to_lowercase();
        self.herbs.iter().find(|h| h.name.to_lowercase() == wanted)
    }

    pub fn herb_names(&self) -> Vec<&str> {
        self.herbs.iter().map(|h| h.name.as_str()).collect()
    }

    pub fn greeting_words(&self) -> &[String] {
        &self.greeting_words
    }

    pub fn digestive_keywords(&self) -> &[String] {
        &self.digestive_keywords
    }

    pub fn symptom_keywords(&self) -> &[String] {
        &self.symptom_keywords
    }

    pub fn condition_keywords(&self) -> &[String] {
        &self.condition_keywords
    }

    /// Recommendation table entry for a symptom keyword.
    pub fn symptom_herbs(&self, symptom: &str) -> &[String] {
        self.symptom_herbs.get(symptom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Recommendation table entry for a condition keyword.
    pub fn condition_herbs(&self, condition: &str) -> &[String] {
        self.condition_herbs.get(condition).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Herbs whose record lists `symptom` (derived index, case-insensitive).
    pub fn herbs_for_symptom(&self, symptom: &str) -> &[String] {
        lookup(&self.symptom_index, symptom)
    }

    pub fn herbs_for_condition(&self, condition: &str) -> &[String] {
        lookup(&self.condition_index, condition)
    }

    pub fn herbs_with_property(&self, property: &str) -> &[String] {
        lookup(&self.property_index, property)
    }
}

fn lookup<'a>(index: &'a BTreeMap<String, Vec<String>>, key: &str) -> &'a [String] {
    index
        .get(&key.trim().to_lowercase())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

struct Tables {
    greeting_words: Vec<String>,
    digestive_keywords: Vec<String>,
    symptom_keywords: Vec<String>,
    condition_keywords: Vec<String>,
    symptom_herbs: BTreeMap<String, Vec<String>>,
    condition_herbs: BTreeMap<String, Vec<String>>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|s| s.to_lowercase()).collect()
}

fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), to_strings(v)))
        .collect()
}

fn builtin_tables() -> Tables {
    Tables {
        greeting_words: to_strings(&["hi", "hello", "hey"]),
        digestive_keywords: to_strings(&[
            "digestion",
            "digestive",
            "indigestion",
            "stomach",
            "gut",
            "bloating",
            "gas",
            "constipation",
        ]),
        symptom_keywords: to_strings(&[
            "pain", "ache", "stress", "anxiety", "fatigue", "insomnia", "digestion",
        ]),
        condition_keywords: to_strings(&["diabetes", "arthritis", "hypertension", "asthma"]),
        symptom_herbs: table(&[
            ("stress", &["Ashwagandha", "Brahmi"]),
            ("anxiety", &["Brahmi", "Ashwagandha"]),
            ("pain", &["Turmeric"]),
            ("fatigue", &["Ashwagandha", "Shatavari"]),
            ("insomnia", &["Ashwagandha", "Brahmi"]),
            ("digestion", &["Triphala"]),
        ]),
        condition_herbs: table(&[
            ("diabetes", &["Turmeric", "Triphala"]),
            ("arthritis", &["Turmeric"]),
            ("hypertension", &["Brahmi"]),
            ("asthma", &["Turmeric"]),
        ]),
    }
}

fn builtin_herbs() -> Vec<HerbRecord> {
    vec![
        HerbRecord::new(
            "Ashwagandha",
            "Adaptogenic herb that helps reduce stress and anxiety",
            "Boosts immunity, improves sleep, reduces inflammation",
            "Available as powder, capsules, or liquid extract",
        )
        .with_tags(
            &["stress", "anxiety", "fatigue", "insomnia"],
            &[],
            &["adaptogen", "rejuvenative"],
        ),
        HerbRecord::new(
            "Turmeric",
            "Anti-inflammatory and antioxidant properties",
            "Reduces inflammation, supports joint health, boosts immunity",
            "Can be used in cooking, as supplements, or golden milk",
        )
        .with_tags(
            &["pain", "inflammation"],
            &["diabetes", "arthritis", "asthma"],
            &["anti-inflammatory", "antioxidant"],
        ),
        HerbRecord::new(
            "Brahmi",
            "Brain tonic and memory enhancer",
            "Improves memory, reduces anxiety, supports brain health",
            "Available as powder, tablets, or liquid extract",
        )
        .with_tags(
            &["stress", "anxiety", "insomnia"],
            &["hypertension"],
            &["nervine", "brain tonic"],
        ),
        HerbRecord::new(
            "Shatavari",
            "Rejuvenating herb for reproductive health",
            "Balances hormones, supports immune system, improves vitality",
            "Can be taken as powder, tablets, or liquid extract",
        )
        .with_tags(&["fatigue"], &[], &["rejuvenative"]),
        HerbRecord::new(
            "Triphala",
            "Combination of three fruits with detoxifying properties",
            "Improves digestion, cleanses colon, supports eye health",
            "Usually taken as powder or tablets before bed",
        )
        .with_tags(
            &["digestion", "constipation"],
            &["diabetes"],
            &["detoxifying"],
        ),
        HerbRecord::new(
            "Ginger",
            "Warming digestive stimulant with anti-nausea properties",
            "Relieves nausea and bloating, improves appetite, eases cold symptoms",
            "Fresh in tea or cooking, dried powder, or capsules",
        )
        .with_tags(&["bloating", "nausea", "gas"], &["common cold"], &["warming"]),
        HerbRecord::new(
            "Tulsi",
            "Holy basil, an adaptogen with antimicrobial properties",
            "Supports respiratory health, eases stress, strengthens immunity",
            "Taken as tea, fresh leaves, or liquid extract",
        )
        .with_tags(&["cough", "stress"], &["common cold"], &["adaptogen", "antimicrobial"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_core_herbs_in_order() {
        let kb = HerbalKnowledge::builtin();
        let names = kb.herb_names();
        assert_eq!(&names[..5], &["Ashwagandha", "Turmeric", "Brahmi", "Shatavari", "Triphala"]);
        assert_eq!(
            kb.herb("Brahmi").map(|h| h.benefits.as_str()),
            Some("Improves memory, reduces anxiety, supports brain health")
        );
    }

    #[test]
    fn find_herb_is_case_insensitive() {
        let kb = HerbalKnowledge::builtin();
        assert_eq!(kb.find_herb("  tURMERIC ").map(|h| h.name.as_str()), Some("Turmeric"));
        assert!(kb.herb("turmeric").is_none());
        assert!(kb.find_herb("mandrake").is_none());
    }

    #[test]
    fn indices_are_derived_from_herb_tags() {
        let kb = HerbalKnowledge::builtin();
        assert_eq!(kb.herbs_for_symptom("Stress"), &["Ashwagandha", "Brahmi", "Tulsi"]);
        assert_eq!(kb.herbs_for_condition("common cold"), &["Ginger", "Tulsi"]);
        assert_eq!(kb.herbs_with_property("adaptogen"), &["Ashwagandha", "Tulsi"]);
        assert!(kb.herbs_for_symptom("hiccups").is_empty());
    }

    #[test]
    fn recommendation_tables_match_keywords() {
        let kb = HerbalKnowledge::builtin();
        assert_eq!(kb.symptom_herbs("stress"), &["Ashwagandha", "Brahmi"]);
        assert_eq!(kb.symptom_herbs("anxiety"), &["Brahmi", "Ashwagandha"]);
        assert_eq!(kb.condition_herbs("diabetes"), &["Turmeric", "Triphala"]);
        assert!(kb.symptom_herbs("ache").is_empty());
    }

    #[test]
    fn json_file_overrides_herbs_and_keeps_default_tables() {
        let raw = r#"{
            "herbs": [
                { "name": "Neem", "properties": "Bitter", "benefits": "Clears skin", "usage": "Paste",
                  "treats_symptoms": ["Rash"] }
            ],
            "greeting_words": ["Vanakkam"]
        }"#;
        let kb = HerbalKnowledge::from_json_str(raw).unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.greeting_words(), &["vanakkam"]);
        assert_eq!(kb.herbs_for_symptom("rash"), &["Neem"]);
        assert_eq!(kb.condition_keywords().len(), 4);
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let kb = HerbalKnowledge::load_json_path(dir.path().join("absent.json"));
        assert_eq!(kb.len(), HerbalKnowledge::builtin().len());
    }

    #[test]
    fn invalid_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(&path, "{ not json").unwrap();
        let kb = HerbalKnowledge::load_json_path(&path);
        assert!(kb.herb("Ashwagandha").is_some());
    }
}
