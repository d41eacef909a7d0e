use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use textlens_core::stemmer::{inflections, stem};
use textlens_core::{
    classify_input, decode_bytes, AnalysisRecord, Analyzer, Classification, InvalidInputError, QueryTerm, SearchMatch,
    StopWordSets,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Shared in-memory corpus. Records are appended in upload order, which is
/// also the order search results come back in.
#[derive(Clone, Default)]
pub struct AppState {
    corpus: Arc<RwLock<Vec<AnalysisRecord>>>,
    stop_words: Arc<StopWordSets>,
}

impl AppState {
    pub fn new(stop_words: StopWordSets) -> Self {
        Self { corpus: Arc::default(), stop_words: Arc::new(stop_words) }
    }

    /// Analyse `content` and add it to the corpus.
    pub fn add_document(&self, name: &str, content: &str) -> Result<AnalysisRecord, InvalidInputError> {
        let record = Analyzer::new(&self.stop_words).analyze(name, content)?;
        self.corpus.write().push(record.clone());
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.corpus.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.read().is_empty()
    }
}

/// Analyse every `*.txt` file under `dir` into the corpus. Rejected files are
/// logged and skipped; returns how many were added.
pub fn seed_from_dir(state: &AppState, dir: &std::path::Path) -> Result<usize> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    files.sort();

    let mut added = 0;
    for file in files {
        let bytes = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        match state.add_document(&name, &decode_bytes(&bytes)) {
            Ok(_) => added += 1,
            Err(err) => warn!(file = %file.display(), reason = err.reason(), "seed file rejected"),
        }
    }
    info!(dir = %dir.display(), added, "corpus seeded");
    Ok(added)
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
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
        .route("/documents", get(list_documents).post(upload_document))
        .route("/documents/:id", get(get_document).delete(delete_document))
        .route("/search", get(search_handler))
        .route("/classify", post(classify_handler))
        .route("/stem/:word", get(stem_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Failures a handler can answer with. Rejected input keeps its own status
/// and `kind` so clients can show the reason as is.
#[derive(Debug)]
pub enum ApiError {
    InvalidInput(InvalidInputError),
    NotFound(String),
    BadRequest(String),
}

impl From<InvalidInputError> for ApiError {
    fn from(err: InvalidInputError) -> Self {
        ApiError::InvalidInput(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::InvalidInput(err) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", err.reason().to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };
        (status, Json(serde_json::json!({ "error": message, "kind": kind }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub name: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub language: String,
    pub word_count: usize,
}

impl From<&AnalysisRecord> for DocumentSummary {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            created_at: record.created_at().to_string(),
            language: record.language().to_string(),
            word_count: record.word_count(),
        }
    }
}

async fn upload_document(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Result<(StatusCode, Json<AnalysisRecord>), ApiError> {
    match state.add_document(&req.name, &req.content) {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(err) => {
            warn!(name = %req.name, reason = err.reason(), "upload rejected");
            Err(err.into())
        }
    }
}

async fn list_documents(State(state): State<AppState>) -> Json<Vec<DocumentSummary>> {
    let corpus = state.corpus.read();
    Json(corpus.iter().map(DocumentSummary::from).collect())
}

async fn get_document(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<AnalysisRecord>, ApiError> {
    let corpus = state.corpus.read();
    corpus
        .iter()
        .find(|r| r.id() == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no document {id}")))
}

async fn delete_document(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let mut corpus = state.corpus.write();
    match corpus.iter().position(|r| r.id() == id) {
        Some(i) => {
            corpus.remove(i);
            info!(%id, "document removed");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(format!("no document {id}"))),
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub terms: Vec<QueryTerm>,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub match_count: usize,
    pub matches: Vec<SearchMatch>,
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    if params.q.trim().is_empty() {
        return Err(ApiError::BadRequest("query parameter q is empty".into()));
    }
    let query = textlens_core::Query::parse(&params.q);
    let terms: Vec<QueryTerm> = query.terms().cloned().collect();

    let corpus = state.corpus.read();
    let results: Vec<SearchHit> = query
        .run(&corpus)
        .into_iter()
        .map(|res| SearchHit {
            id: res.record.id().to_string(),
            name: res.record.name().to_string(),
            match_count: res.matches.len(),
            matches: res.matches,
        })
        .collect();
    drop(corpus);

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse {
        query: params.q,
        terms,
        took_s: elapsed.as_secs_f64(),
        total_hits: results.len(),
        results,
    }))
}

#[derive(Deserialize)]
pub struct ClassifyRequest {
    pub content: String,
}

async fn classify_handler(Json(req): Json<ClassifyRequest>) -> Json<Classification> {
    Json(classify_input(&req.content))
}

#[derive(Serialize)]
pub struct StemResponse {
    pub word: String,
    pub stem: String,
    pub inflections: Vec<String>,
}

async fn stem_handler(Path(word): Path<String>) -> Json<StemResponse> {
    let root = stem(&word);
    let forms = inflections(&root);
    Json(StemResponse { word, stem: root, inflections: forms })
}
