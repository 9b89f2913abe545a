//! Response templates for herb and remedy blocks.

use crate::knowledge::{HerbRecord, RemedyRecord};

pub const UNKNOWN_HERB_RESPONSE: &str =
    "I apologize, but I don't have detailed information about that herb.";

/// Every field of a herb record, one per line.
pub fn format_herb_info(herb: &HerbRecord) -> String {
    let mut out = format!("Here's what I know about {}:\n\n", herb.name);
    out.push_str(&format!("Properties: {}\n", herb.properties));
    out.push_str(&format!("Benefits: {}\n", herb.benefits));
    out.push_str(&format!("Usage: {}\n", herb.usage));
    if !herb.treats_symptoms.is_empty() {
        out.push_str(&format!("Helps with: {}\n", herb.treats_symptoms.join(", ")));
    }
    if !herb.treats_conditions.is_empty() {
        out.push_str(&format!("Conditions: {}\n", herb.treats_conditions.join(", ")));
    }
    out
}

/// Detailed block for the digestive rule.
pub fn format_digestive_remedy(remedy: &RemedyRecord) -> String {
    let mut out = format!("🌿 For {}:\n\n", remedy.condition_name);
    out.push_str(&format!("Common symptoms: {}\n\n", remedy.symptoms));
    out.push_str(&format!("Recommended herbs: {}\n\n", remedy.herbs_display()));
    out.push_str("Treatment recommendations:\n");
    out.push_str(&format!("{}\n\n", remedy.recommendations));
    if let Some(precautions) = remedy.precautions() {
        out.push_str(&format!("⚠️ Precautions: {}\n\n", precautions));
    }
    out.push_str("Would you like to know more about any specific herb mentioned above?");
    out
}

/// One block per remedy, each closed by a `---` line.
pub fn format_remedy_matches(remedies: &[RemedyRecord]) -> String {
    let mut out = String::new();
    for remedy in remedies {
        out.push_str(&format!("For {}:\n", remedy.condition_name));
        out.push_str(&format!("Recommended herbs: {}\n", remedy.herbs_display()));
        out.push_str("Treatment recommendations:\n");
        out.push_str(&format!("{}\n", remedy.recommendations));
        if let Some(precautions) = remedy.precautions() {
            out.push_str(&format!("Precautions: {}\n", precautions));
        }
        out.push_str("---\n");
    }
    out
}
