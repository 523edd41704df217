use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordrank_engine::{
    load_or_default, ClosestWord, EngineConfig, FileVocabulary, GameEngine, GuessResponse,
    InMemoryVectors, MeaningResponse, RoundInfo, SqliteMeaningCache, TdkDictionary, Vocabulary,
    WordGameError,
};

#[derive(Clone)]
struct AppState {
    engine: Arc<GameEngine>,
}

/// Settings read from the environment
struct ServerConfig {
    vectors_path: String,
    vocab_path: Option<String>,
    config_path: Option<String>,
    db_path: String,
    port: u16,
    vector_limit: Option<usize>,
    hidden_word: Option<String>,
}

impl ServerConfig {
    fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            vectors_path: var("VECTORS_PATH").unwrap_or_else(|| "cc.tr.300.vec".to_string()),
            vocab_path: var("VOCAB_PATH"),
            config_path: var("CONFIG_PATH"),
            db_path: var("DB_PATH").unwrap_or_else(|| "wordrank.db".to_string()),
            port: var("PORT").and_then(|p| p.parse::<u16>().ok()).unwrap_or(8090),
            vector_limit: var("VECTOR_LIMIT").and_then(|l| l.parse::<usize>().ok()),
            hidden_word: var("HIDDEN_WORD"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GuessRequest {
    word: String,
}

#[derive(Debug, Deserialize)]
struct HintRequest {
    rank: usize,
}

#[derive(Debug, Deserialize)]
struct MeaningRequest {
    word: String,
}

#[derive(Debug, Deserialize)]
struct ClosestParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

#[derive(Debug, Default, Deserialize)]
struct RoundRequest {
    #[serde(default)]
    hidden_word: Option<String>,
}

fn default_limit() -> usize { 100 }

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    ready: bool,
}

#[derive(Debug, Serialize)]
struct HintResponse {
    rank: usize,
    word: String,
}

#[derive(Debug, Serialize)]
struct RevealResponse {
    word: String,
}

#[derive(Debug, Serialize)]
struct ClosestResponse {
    words: Vec<ClosestWord>,
    /// Server-side cap on `limit`
    max_closest: usize,
}

#[derive(Debug, Serialize)]
struct RoundStartedResponse {
    status: String,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    round: Option<RoundInfo>,
    cache: CacheStatsDto,
}

#[derive(Debug, Serialize)]
struct CacheStatsDto {
    total_entries: u64,
    total_hits: u64,
    avg_hit_count: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordrank_server=debug,wordrank_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ServerConfig::from_env();

    tracing::info!("🚀 Starting WordRank Server");
    tracing::info!("🧮 Vectors: {}", settings.vectors_path);
    tracing::info!("📦 Database: {}", settings.db_path);
    tracing::info!("🔌 Port: {}", settings.port);

    let config = match &settings.config_path {
        Some(path) => EngineConfig::from_yaml_file(path)?,
        None => EngineConfig::default(),
    };

    let vectors = InMemoryVectors::load_text_file(&settings.vectors_path, settings.vector_limit)?;
    let vocabulary = match &settings.vocab_path {
        Some(path) => load_or_default(&FileVocabulary::new(path)),
        None => Vocabulary::new(vectors.words().iter().cloned()),
    };

    let cache = Arc::new(SqliteMeaningCache::new(&settings.db_path).await?);
    let engine = GameEngine::new(Arc::new(vectors), vocabulary, config)
        .with_meaning_lookup(Arc::new(TdkDictionary::new()?))
        .with_meaning_cache(cache);

    let state = AppState {
        engine: Arc::new(engine),
    };

    // Ranking build runs in the background; routes answer 503 until ready
    state.engine.spawn_round(settings.hidden_word.clone());

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/guess", post(guess_handler))
        .route("/v1/hint", post(hint_handler))
        .route("/v1/reveal", get(reveal_handler))
        .route("/v1/closest", get(closest_handler))
        .route("/v1/meaning", post(meaning_handler))
        .route("/v1/round", post(round_handler))
        .route("/v1/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", settings.port);
    tracing::info!("🎮 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: wordrank_engine::VERSION.to_string(),
        ready: state.engine.is_ready().await,
    })
}

async fn guess_handler(
    State(state): State<AppState>,
    Json(req): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, AppError> {
    let result = state.engine.submit_guess(&req.word).await?;

    tracing::info!("✅ {}", result.display());

    Ok(Json(result))
}

async fn hint_handler(
    State(state): State<AppState>,
    Json(req): Json<HintRequest>,
) -> Result<Json<HintResponse>, AppError> {
    let word = state.engine.hint(req.rank).await?;
    Ok(Json(HintResponse { rank: req.rank, word }))
}

async fn reveal_handler(State(state): State<AppState>) -> Result<Json<RevealResponse>, AppError> {
    let word = state.engine.reveal().await?;
    tracing::info!("🔓 Hidden word revealed");
    Ok(Json(RevealResponse { word }))
}

async fn closest_handler(
    State(state): State<AppState>,
    Query(params): Query<ClosestParams>,
) -> Result<Json<ClosestResponse>, AppError> {
    let words = state.engine.closest_words(params.limit).await?;
    Ok(Json(ClosestResponse {
        words,
        max_closest: state.engine.config().max_closest,
    }))
}

async fn meaning_handler(
    State(state): State<AppState>,
    Json(req): Json<MeaningRequest>,
) -> Json<MeaningResponse> {
    Json(state.engine.meanings(&req.word).await)
}

async fn round_handler(
    State(state): State<AppState>,
    body: Option<Json<RoundRequest>>,
) -> (StatusCode, Json<RoundStartedResponse>) {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    state.engine.spawn_round(req.hidden_word);

    tracing::info!("🔄 New round requested");
    (
        StatusCode::ACCEPTED,
        Json(RoundStartedResponse {
            status: "pending".to_string(),
        }),
    )
}

async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let cache_stats = state.engine.cache_stats().await?;

    Ok(Json(StatsResponse {
        round: state.engine.round_info().await.ok(),
        cache: CacheStatsDto {
            total_entries: cache_stats.total_entries,
            total_hits: cache_stats.total_hits,
            avg_hit_count: cache_stats.avg_hit_count,
        },
    }))
}

// Error handling
struct AppError(WordGameError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, suggestions) = match self.0 {
            WordGameError::WordNotFound { word, suggestions } => (
                StatusCode::BAD_REQUEST,
                format!("Word not found: {}", word),
                suggestions,
            ),
            e @ WordGameError::InvalidRange { .. } => {
                (StatusCode::BAD_REQUEST, e.to_string(), Vec::new())
            }
            e @ (WordGameError::NotReady | WordGameError::SetupFailed(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string(), Vec::new())
            }
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), Vec::new()),
        };

        if status.is_server_error() {
            tracing::error!("❌ Error: {} - {}", status, message);
        } else {
            tracing::debug!("Rejected: {} - {}", status, message);
        }

        (status, Json(ErrorResponse { error: message, suggestions })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<WordGameError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
