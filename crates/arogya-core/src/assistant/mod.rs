//! Rule-based message dispatcher.
//!
//! A message is run through an ordered chain of rules; the first rule that produces a
//! response wins and nothing after it runs:
//!
//! | # | Rule        | Guard                                             |
//! |---|-------------|---------------------------------------------------|
//! | 1 | greeting    | a greeting word is a substring                    |
//! | 2 | digestive   | a digestive keyword is a substring (remedy lookup) |
//! | 3 | herb        | a known herb name is a substring                  |
//! | 4 | remedy      | remedies whose condition/symptoms contain the text |
//! | 5 | symptoms    | symptom/condition keywords map to herbs           |
//! | 6 | fallback    | always                                            |
//!
//! Rules 2–4 read the remedy store. A store failure ends the chain with
//! [`ERROR_RESPONSE`]; it never reaches the caller as an error.

mod dosha;
mod format;
mod fuzzy;
mod lexical;
mod recommend;

pub use dosha::{identify_doshas, Dosha};
pub use fuzzy::{fuzzy_match, similarity_ratio, DEFAULT_FUZZY_THRESHOLD};
pub use lexical::preprocess_text;
pub use recommend::{extract_symptoms_conditions, format_recommendations, recommended_herbs};

use std::sync::Arc;

use crate::error::StoreError;
use crate::knowledge::{HerbRecord, HerbalKnowledge, RemedySource};
use format::{format_digestive_remedy, format_herb_info, format_remedy_matches, UNKNOWN_HERB_RESPONSE};

pub const GREETING_RESPONSE: &str =
    "Hello! I'm your Ayurvedic health assistant. How can I help you today?";

pub const ERROR_RESPONSE: &str = "I apologize, but I encountered an error. Please try again.";

pub const NO_MESSAGE_RESPONSE: &str = "No message provided";

pub const FALLBACK_RESPONSE: &str = "I understand you're asking about health concerns. \
Could you please be more specific? You can ask about:\n\n\
1. Specific conditions (e.g., digestive issues, stress, headaches)\n\
2. Specific symptoms (e.g., bloating, anxiety, pain)\n\
3. Specific herbs (e.g., Ashwagandha, Triphala, Brahmi)\n\
4. General health advice";

const DIGESTIVE_CONDITION: &str = "Digestive Issues";

/// Outcome of a single rule: a response ends the chain, `None` falls through.
type RuleResult = Result<Option<String>, StoreError>;

struct Rule {
    name: &'static str,
    apply: fn(&Assistant, &str) -> RuleResult,
}

const RULES: [Rule; 5] = [
    Rule { name: "greeting", apply: Assistant::greeting_rule },
    Rule { name: "digestive", apply: Assistant::digestive_rule },
    Rule { name: "herb", apply: Assistant::herb_mention_rule },
    Rule { name: "remedy", apply: Assistant::remedy_search_rule },
    Rule { name: "symptoms", apply: Assistant::symptom_rule },
];

/// Answers chat messages from the herb knowledge base and a remedy source.
/// Stateless per call; cheap to clone and share across request handlers.
#[derive(Clone)]
pub struct Assistant {
    knowledge: Arc<HerbalKnowledge>,
    remedies: Arc<dyn RemedySource>,
}

impl Assistant {
    pub fn new(knowledge: Arc<HerbalKnowledge>, remedies: Arc<dyn RemedySource>) -> Self {
        Self { knowledge, remedies }
    }

    pub fn knowledge(&self) -> &HerbalKnowledge {
        &self.knowledge
    }

    /// Produces the response for one user message. Never fails.
    pub fn handle_message(&self, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return NO_MESSAGE_RESPONSE.to_string();
        }
        let message = text.to_lowercase();
        for rule in &RULES {
            match (rule.apply)(self, &message) {
                Ok(Some(response)) => {
                    tracing::debug!(target: "arogya::assistant", rule = rule.name, "Rule matched");
                    return response;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        target: "arogya::assistant",
                        rule = rule.name,
                        error = %e,
                        "Error processing message"
                    );
                    return ERROR_RESPONSE.to_string();
                }
            }
        }
        tracing::debug!(target: "arogya::assistant", rule = "fallback", "No rule matched");
        FALLBACK_RESPONSE.to_string()
    }

    /// Herbs whose names are within `threshold` of `query`, best first.
    pub fn suggest_herbs(&self, query: &str, threshold: u8) -> Vec<(&HerbRecord, u8)> {
        let names = self.knowledge.herb_names();
        fuzzy_match(query, &names, threshold)
            .into_iter()
            .filter_map(|(name, score)| self.knowledge.herb(&name).map(|h| (h, score)))
            .collect()
    }

    fn greeting_rule(&self, message: &str) -> RuleResult {
        let greeted = self
            .knowledge
            .greeting_words()
            .iter()
            .any(|g| message.contains(g.as_str()));
        Ok(greeted.then(|| GREETING_RESPONSE.to_string()))
    }

    fn digestive_rule(&self, message: &str) -> RuleResult {
        let digestive = self
            .knowledge
            .digestive_keywords()
            .iter()
            .any(|k| message.contains(k.as_str()));
        if !digestive {
            return Ok(None);
        }
        Ok(self
            .remedies
            .find_remedy_by_condition(DIGESTIVE_CONDITION)?
            .map(|remedy| format_digestive_remedy(&remedy)))
    }

    fn herb_mention_rule(&self, message: &str) -> RuleResult {
        if let Some(herb) = self
            .knowledge
            .herbs()
            .iter()
            .find(|h| message.contains(&h.name.to_lowercase()))
        {
            return Ok(Some(format_herb_info(herb)));
        }
        let stored = self.remedies.list_distinct_herb_names()?;
        let mentioned = stored
            .iter()
            .find(|name| !name.is_empty() && message.contains(&name.to_lowercase()));
        Ok(mentioned.map(|name| match self.knowledge.find_herb(name) {
            Some(herb) => format_herb_info(herb),
            None => UNKNOWN_HERB_RESPONSE.to_string(),
        }))
    }

    fn remedy_search_rule(&self, message: &str) -> RuleResult {
        let remedies = self.remedies.search_remedies(message)?;
        if remedies.is_empty() {
            return Ok(None);
        }
        Ok(Some(format_remedy_matches(&remedies)))
    }

    fn symptom_rule(&self, message: &str) -> RuleResult {
        let (symptoms, conditions) = extract_symptoms_conditions(message, &self.knowledge);
        if symptoms.is_empty() && conditions.is_empty() {
            return Ok(None);
        }
        let herbs = recommended_herbs(&symptoms, &conditions, &self.knowledge);
        Ok(format_recommendations(&herbs, &self.knowledge))
    }
}
