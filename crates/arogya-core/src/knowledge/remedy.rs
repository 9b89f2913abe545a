//! Remedy records: condition, symptoms, herbs, and treatment text.

use serde::{Deserialize, Serialize};

/// A condition and its recommended treatment, as held in the remedy store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemedyRecord {
    pub condition_name: String,
    /// Free-text symptom description, searched by substring.
    pub symptoms: String,
    /// Herb names in recommendation order.
    #[serde(default)]
    pub herbs: Vec<String>,
    pub recommendations: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precautions: Option<String>,
}

impl RemedyRecord {
    pub fn new(
        condition_name: impl Into<String>,
        symptoms: impl Into<String>,
        herbs: &[&str],
        recommendations: impl Into<String>,
    ) -> Self {
        Self {
            condition_name: condition_name.into(),
            symptoms: symptoms.into(),
            herbs: herbs.iter().map(|h| h.to_string()).collect(),
            recommendations: recommendations.into(),
            precautions: None,
        }
    }

    pub fn with_precautions(mut self, precautions: impl Into<String>) -> Self {
        self.precautions = Some(precautions.into());
        self
    }

    /// Herbs rendered as a comma-separated list.
    pub fn herbs_display(&self) -> String {
        self.herbs.join(", ")
    }

    /// Precautions, treating blank text as absent.
    pub fn precautions(&self) -> Option<&str> {
        self.precautions.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// Store key: lowercased, trimmed condition name.
    pub fn key(&self) -> String {
        self.condition_name.trim().to_lowercase()
    }

    /// True if the lowercased condition name or symptom text contains `needle_lower`.
    pub fn mentions(&self, needle_lower: &str) -> bool {
        self.condition_name.to_lowercase().contains(needle_lower)
            || self.symptoms.to_lowercase().contains(needle_lower)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
