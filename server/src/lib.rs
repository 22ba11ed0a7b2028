use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::get, Json, Router};
use faqbot_core::persist::FaqStore;
use faqbot_core::{Engine, EngineConfig, Listing, ReplySource, RuleKind, Sentiment};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct AskParams {
    pub q: String,
    #[serde(default)]
    pub diagnostics: bool,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub query: String,
    pub reply: String,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    pub clear_transcript: bool,
    pub took_s: f64,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub faqs: Vec<Listing>,
}

#[derive(Deserialize)]
pub struct TeachRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    /// Serializes teach-and-save so the file always reflects the latest snapshot.
    pub store: Arc<Mutex<FaqStore>>,
    pub admin_token: Option<String>,
}

pub struct ServerConfig {
    pub faqs: PathBuf,
    pub engine_config: Option<PathBuf>,
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let engine_config = match &config.engine_config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let store = FaqStore::new(&config.faqs);
    let entries = store.load_or_seed()?;
    let engine = Engine::new(&engine_config, entries);
    let admin_token = std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());
    Ok(router(AppState { engine: Arc::new(engine), store: Arc::new(Mutex::new(store)), admin_token }))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/ask", get(ask_handler))
        .route("/faqs", get(list_handler).post(teach_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn ask_handler(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    if params.q.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "query must not be empty".into()));
    }
    let start = std::time::Instant::now();
    let reply = state.engine.reply(&params.q, params.diagnostics);
    let clear_transcript = reply.clears_transcript();

    let mut resp = AskResponse {
        query: params.q,
        reply: reply.text,
        source: "",
        rule: None,
        position: None,
        similarity: None,
        sentiment: None,
        clear_transcript,
        took_s: 0.0,
    };
    match reply.source {
        ReplySource::Rule { rule } => {
            resp.source = "rule";
            resp.rule = Some(rule);
        }
        ReplySource::Faq { position, similarity } => {
            resp.source = "faq";
            resp.position = Some(position);
            resp.similarity = Some(similarity);
        }
        ReplySource::Fallback { sentiment } => {
            resp.source = "fallback";
            resp.sentiment = Some(sentiment);
        }
    }
    resp.took_s = start.elapsed().as_secs_f64();
    Ok(Json(resp))
}

pub async fn list_handler(State(state): State<AppState>) -> Json<ListResponse> {
    let faqs = state.engine.entries();
    Json(ListResponse { total: faqs.len(), faqs })
}

pub async fn teach_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TeachRequest>,
) -> Result<(StatusCode, Json<Listing>), (StatusCode, String)> {
    authorize(&state, &headers)?;
    let store = state.store.lock();
    let snapshot = state
        .engine
        .add_entry(&req.question, &req.answer)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    if let Err(e) = store.save(snapshot.entries()) {
        tracing::warn!(error = %e, path = %store.path().display(), "failed to persist faqs");
    }
    drop(store);

    let position = snapshot.entries().len();
    let entry = &snapshot.entries()[position - 1];
    tracing::info!(position, "learned new faq");
    Ok((
        StatusCode::CREATED,
        Json(Listing { position, question: entry.question.clone(), answer: entry.answer.clone() }),
    ))
}

/// Teaching is open unless ADMIN_TOKEN is configured.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Ok(()),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
