//! Axum-based gateway for the Arogya assistant. Config-driven via CoreConfig.

mod handlers;

use axum::{
    extract::State,
    http::Method,
    routing::{get, post},
    Router,
};
use arogya_core::{
    import_remedies_json, seed_default_remedies, Assistant, ChatStore, CoreConfig, HerbalKnowledge,
    RemedySource, RemedyStore,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pre-flight check: config loads, both stores open, and the port is free.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking remedy store... ");
    let remedies = RemedyStore::open_path(config.remedies_db_path())
        .map_err(|e| format!("arogya_remedies LOCKED or inaccessible: {}", e))?;
    let count = remedies.count().map_err(|e| format!("remedy tree unreadable: {}", e))?;
    drop(remedies);
    println!("OK ({} remedies)", count);

    print!("Checking chat history... ");
    let history = ChatStore::open_path(config.history_db_path())
        .map_err(|e| format!("arogya_history LOCKED or inaccessible: {}", e))?;
    drop(history);
    println!("OK");

    print!("Checking herb knowledge... ");
    let knowledge = match config.knowledge_path.as_deref() {
        Some(path) => HerbalKnowledge::load_json_path(path),
        None => HerbalKnowledge::builtin(),
    };
    if knowledge.is_empty() {
        return Err("herb knowledge base has no herbs".to_string());
    }
    println!("OK ({} herbs)", knowledge.len());

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => return Err(format!("Port {} BLOCKED: {}", port, e)),
    }

    println!("\nAll checks passed. Ready to start gateway.");
    Ok(())
}

/// Loads the herb knowledge base and opens, seeds, and imports into the remedy store.
fn build_knowledge(
    config: &CoreConfig,
) -> Result<(Arc<HerbalKnowledge>, Arc<RemedyStore>), Box<dyn std::error::Error + Send + Sync>> {
    let knowledge = Arc::new(match config.knowledge_path.as_deref() {
        Some(path) => HerbalKnowledge::load_json_path(path),
        None => HerbalKnowledge::builtin(),
    });
    if knowledge.is_empty() {
        tracing::warn!(target: "arogya::knowledge", "Herb knowledge base is empty; herb lookups will not match");
    }

    let remedies = Arc::new(RemedyStore::open_path(config.remedies_db_path())?);
    match seed_default_remedies(&remedies) {
        Ok(true) => tracing::info!("Remedy store seeded with default remedies"),
        Ok(false) => tracing::debug!("Remedy store already populated"),
        Err(e) => tracing::warn!("Failed to seed remedy store: {}", e),
    }
    if let Some(path) = config.remedies_path.as_deref() {
        if let Err(e) = import_remedies_json(&remedies, path) {
            tracing::warn!("Failed to import remedies from {}: {}", path, e);
        }
    }
    Ok((knowledge, remedies))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[arogya-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(CoreConfig::load().map_err(|e| {
        tracing::error!("Failed to load config: {}", e);
        e
    })?);

    let (knowledge, remedies) = build_knowledge(&config)?;
    let history = Arc::new(ChatStore::open_path(config.history_db_path())?);
    tracing::info!(
        herbs = knowledge.len(),
        remedies = remedies.count().unwrap_or(0),
        "Knowledge base ready"
    );

    let remedy_source: Arc<dyn RemedySource> = remedies.clone();
    let app = build_app(AppState {
        config: Arc::clone(&config),
        assistant: Assistant::new(knowledge, remedy_source),
        remedies,
        history,
    });

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("{} listening on {}", config.app_name, addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/v1/status", get(status))
        .route("/api/v1/health", get(health))
        .route("/api/v1/chat", post(handlers::chat::chat))
        .route("/api/v1/sessions", get(handlers::chat::list_sessions))
        .route(
            "/api/v1/sessions/:session_id/messages",
            get(handlers::chat::session_messages),
        )
        .route("/api/v1/herbs", get(handlers::herbs::list_herbs))
        .route("/api/v1/herbs/search", get(handlers::herbs::search_herbs))
        .route(
            "/api/v1/herbs/by-symptom/:symptom",
            get(handlers::herbs::herbs_by_symptom),
        )
        .route("/api/v1/dosha", post(handlers::herbs::classify_dosha))
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) assistant: Assistant,
    pub(crate) remedies: Arc<RemedyStore>,
    pub(crate) history: Arc<ChatStore>,
}

/// GET /api/v1/health – liveness check for UI and scripts.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/status – app identity and knowledge base sizes.
async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let remedies = match state.remedies.count() {
        Ok(n) => serde_json::json!(n),
        Err(e) => {
            tracing::warn!("Remedy count unavailable: {}", e);
            serde_json::Value::Null
        }
    };
    axum::Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "herbs": state.assistant.knowledge().len(),
        "remedies": remedies,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arogya_core::{ERROR_RESPONSE, FALLBACK_RESPONSE, GREETING_RESPONSE, NO_MESSAGE_RESPONSE};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_config(storage_path: &std::path::Path) -> CoreConfig {
        CoreConfig {
            app_name: "Test Assistant".to_string(),
            port: 8001,
            storage_path: storage_path.to_string_lossy().into_owned(),
            knowledge_path: None,
            remedies_path: None,
            fuzzy_threshold: 80,
        }
    }

    fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let (knowledge, remedies) = build_knowledge(&config).unwrap();
        let history = Arc::new(ChatStore::open_path(config.history_db_path()).unwrap());
        let remedy_source: Arc<dyn RemedySource> = remedies.clone();
        let app = build_app(AppState {
            config: Arc::new(config),
            assistant: Assistant::new(knowledge, remedy_source),
            remedies,
            history,
        });
        (dir, app)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_status() {
        let (_dir, app) = test_app();
        let (code, json) = send(&app, get_req("/api/v1/health")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(json["status"], "ok");

        let (code, json) = send(&app, get_req("/v1/status")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(json["app_name"], "Test Assistant");
        assert_eq!(json["herbs"], HerbalKnowledge::builtin().len());
        assert_eq!(json["remedies"], arogya_core::default_remedies().len());
    }

    #[tokio::test]
    async fn test_chat_greeting_creates_session() {
        let (_dir, app) = test_app();
        let body = serde_json::json!({ "message": "Hello", "user_email": "p@example.com" });
        let (code, json) = send(&app, post_json("/api/v1/chat", body)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(json["response"], GREETING_RESPONSE);
        let session_id = json["session_id"].as_u64().unwrap();

        let (code, json) =
            send(&app, get_req(&format!("/api/v1/sessions/{}/messages", session_id))).await;
        assert_eq!(code, StatusCode::OK);
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["message"], "Hello");
        assert_eq!(messages[0]["is_bot"], false);
        assert_eq!(messages[1]["message"], GREETING_RESPONSE);
        assert_eq!(json["session"]["title"], "Hello");
    }

    #[tokio::test]
    async fn test_chat_continues_existing_session() {
        let (_dir, app) = test_app();
        let first = serde_json::json!({ "message": "I have stress and anxiety", "user_email": "p@example.com" });
        let (_, json) = send(&app, post_json("/api/v1/chat", first)).await;
        let response = json["response"].as_str().unwrap();
        assert!(response.contains("- Ashwagandha: "));
        assert_eq!(response.matches("- Brahmi: ").count(), 1);
        let session_id = json["session_id"].as_u64().unwrap();

        let next = serde_json::json!({
            "message": "xyzabc123",
            "user_email": "p@example.com",
            "session_id": session_id,
        });
        let (_, json) = send(&app, post_json("/api/v1/chat", next)).await;
        assert_eq!(json["response"], FALLBACK_RESPONSE);
        assert_eq!(json["session_id"].as_u64(), Some(session_id));

        let (_, json) = send(&app, get_req("/api/v1/sessions?user_email=p@example.com")).await;
        let sessions = json["sessions"].as_array().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0]["last_message"], FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message_and_anonymous_user() {
        let (_dir, app) = test_app();
        let (_, json) = send(
            &app,
            post_json("/api/v1/chat", serde_json::json!({ "message": "  ", "user_email": "p@example.com" })),
        )
        .await;
        assert_eq!(json["error"], NO_MESSAGE_RESPONSE);

        let (_, json) = send(&app, post_json("/api/v1/chat", serde_json::json!({ "message": "hi" }))).await;
        assert_eq!(json["error"], "User not logged in");
    }

    #[tokio::test]
    async fn test_chat_refuses_foreign_session() {
        let (_dir, app) = test_app();
        let (_, json) = send(
            &app,
            post_json("/api/v1/chat", serde_json::json!({ "message": "hi", "user_email": "a@example.com" })),
        )
        .await;
        let session_id = json["session_id"].as_u64().unwrap();
        let (_, json) = send(
            &app,
            post_json(
                "/api/v1/chat",
                serde_json::json!({ "message": "hi", "user_email": "b@example.com", "session_id": session_id }),
            ),
        )
        .await;
        assert_eq!(json["error"], "Chat session not found");
        assert_ne!(json["error"], ERROR_RESPONSE);
    }

    #[tokio::test]
    async fn test_digestive_question_uses_seeded_remedy() {
        let (_dir, app) = test_app();
        let body = serde_json::json!({ "message": "I feel bloating after meals", "user_email": "p@example.com" });
        let (_, json) = send(&app, post_json("/api/v1/chat", body)).await;
        let response = json["response"].as_str().unwrap();
        assert!(response.starts_with("🌿 For Digestive Issues:"));
        assert!(response.contains("Recommended herbs: Triphala, Ginger"));
    }

    #[tokio::test]
    async fn test_sessions_require_user_and_unknown_session_is_404() {
        let (_dir, app) = test_app();
        let (code, _) = send(&app, get_req("/api/v1/sessions")).await;
        assert_eq!(code, StatusCode::UNAUTHORIZED);
        let (code, _) = send(&app, get_req("/api/v1/sessions/999999/messages")).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_herb_search_is_fuzzy() {
        let (_dir, app) = test_app();
        let (code, json) = send(&app, get_req("/api/v1/herbs/search?q=turmerik")).await;
        assert_eq!(code, StatusCode::OK);
        let matches = json["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["herb"]["name"], "Turmeric");
        assert_eq!(matches[0]["score"], 88);

        let (_, json) = send(&app, get_req("/api/v1/herbs/search?q=xyzabc123")).await;
        assert!(json["matches"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_herbs_listing_and_symptom_index() {
        let (_dir, app) = test_app();
        let (_, json) = send(&app, get_req("/api/v1/herbs")).await;
        assert_eq!(json["herbs"][0]["name"], "Ashwagandha");

        let (_, json) = send(&app, get_req("/api/v1/herbs/by-symptom/insomnia")).await;
        let names: Vec<&str> = json["herbs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ashwagandha", "Brahmi"]);
    }

    #[tokio::test]
    async fn test_dosha_classification() {
        let (_dir, app) = test_app();
        let (_, json) = send(
            &app,
            post_json("/api/v1/dosha", serde_json::json!({ "symptoms": ["joint pain", "burning"] })),
        )
        .await;
        assert_eq!(json["doshas"], serde_json::json!(["vata", "pitta"]));

        let (_, json) = send(
            &app,
            post_json("/api/v1/dosha", serde_json::json!({ "text": "I feel heaviness and lots of mucus" })),
        )
        .await;
        assert_eq!(json["doshas"], serde_json::json!(["kapha"]));
    }
}
