//! arogya-core: Ayurvedic assistant core (herb knowledge base, remedy store, chat history,
//! and the rule-based message dispatcher).
//!
//! The gateway add-on wires these together; everything here is synchronous and usable
//! from tests without a runtime.

mod assistant;
mod error;
mod history;
mod knowledge;
mod shared;

// Shared
pub use shared::{now_ms, CoreConfig};

// Errors
pub use error::StoreError;

// Knowledge base and remedy store
pub use knowledge::{
    default_remedies, import_remedies_json, seed_default_remedies, HerbRecord, HerbalKnowledge, RemedyRecord,
    RemedySource, RemedyStore,
};

// Chat history
pub use history::{session_title, ChatMessage, ChatSession, ChatStore, SessionSummary};

// Assistant (dispatcher and helpers)
pub use assistant::{
    extract_symptoms_conditions, format_recommendations, fuzzy_match, identify_doshas,
    preprocess_text, recommended_herbs, similarity_ratio, Assistant, Dosha, DEFAULT_FUZZY_THRESHOLD,
    ERROR_RESPONSE, FALLBACK_RESPONSE, GREETING_RESPONSE, NO_MESSAGE_RESPONSE,
};
