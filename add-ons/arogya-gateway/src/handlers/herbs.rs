//! Herb lookup, fuzzy herb search, and dosha classification.

use axum::extract::{Json, Path, Query, State};
use arogya_core::{identify_doshas, preprocess_text};

use crate::AppState;

/// GET /api/v1/herbs – every herb in the knowledge base.
pub(crate) async fn list_herbs(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "herbs": state.assistant.knowledge().herbs() }))
}

#[derive(serde::Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    threshold: Option<u8>,
}

/// GET /api/v1/herbs/search?q=&threshold= – herbs whose names fuzzily match `q`.
pub(crate) async fn search_herbs(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<serde_json::Value> {
    let threshold = query.threshold.unwrap_or(state.config.fuzzy_threshold).min(100);
    let matches: Vec<serde_json::Value> = state
        .assistant
        .suggest_herbs(query.q.trim(), threshold)
        .into_iter()
        .map(|(herb, score)| serde_json::json!({ "score": score, "herb": herb }))
        .collect();
    Json(serde_json::json!({
        "query": query.q,
        "threshold": threshold,
        "matches": matches,
    }))
}

/// GET /api/v1/herbs/by-symptom/:symptom – herbs whose records list the symptom.
pub(crate) async fn herbs_by_symptom(
    State(state): State<AppState>,
    Path(symptom): Path<String>,
) -> Json<serde_json::Value> {
    let kb = state.assistant.knowledge();
    let herbs: Vec<_> = kb
        .herbs_for_symptom(&symptom)
        .iter()
        .filter_map(|name| kb.herb(name))
        .collect();
    Json(serde_json::json!({ "symptom": symptom, "herbs": herbs }))
}

#[derive(serde::Deserialize)]
pub(crate) struct DoshaRequest {
    #[serde(default)]
    symptoms: Vec<String>,
    /// Free text; tokenized and lemmatized, then added to `symptoms`.
    #[serde(default)]
    text: Option<String>,
}

/// POST /api/v1/dosha – doshas suggested by the given symptoms.
pub(crate) async fn classify_dosha(Json(req): Json<DoshaRequest>) -> Json<serde_json::Value> {
    let mut symptoms = req.symptoms;
    if let Some(text) = req.text.as_deref() {
        symptoms.extend(preprocess_text(text));
    }
    let doshas = identify_doshas(&symptoms);
    tracing::debug!(
        target: "arogya::assistant",
        symptoms = symptoms.len(),
        doshas = ?doshas,
        "Dosha classification"
    );
    Json(serde_json::json!({
        "symptoms": symptoms,
        "doshas": doshas,
    }))
}
