//! # MindWork
//!
//! A research search front-end that pairs an optional Google Gemini summary with
//! generated placeholder results, served over HTTP with axum.
//!
//! ## Features
//!
//! - **Search**: Renders a ranked result list for any free-text query
//! - **AI Enrichment**: One best-effort Gemini research summary per search
//! - **Article Detail**: Result links resolve through an in-memory cache with TTL
//! - **Mock Accounts**: Login, registration and OAuth routes that redirect only
//! - **JSON API**: Machine-readable search and article endpoints plus a health check
//!
//! ## Architecture
//!
//! - [`ResultCache`]: Thread-safe slug → record store backing the detail view
//! - [`MockResultGenerator`]: Randomized, deduplicated placeholder results
//! - [`AiSummaryFetcher`]: Optional Gemini call with a strict response parser
//! - [`Config`]: Application configuration management
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mindwork::{create_router, AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let app_state = AppState::from_config(config)?;
//!
//!     let app = create_router(app_state);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5001").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use clap::Parser;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub mod ai;
pub mod cache;
mod config;
pub mod generator;
pub mod pages;
pub mod record;
pub mod slug;

pub use ai::AiSummaryFetcher;
pub use cache::ResultCache;
pub use config::{AiConfig, CacheConfig, Config, SearchConfig};
pub use generator::MockResultGenerator;
pub use record::ResultRecord;

use slug::unique_slug;

/// Command-line arguments for the MindWork server.
#[derive(Parser)]
#[command(name = "mindwork")]
#[command(about = "MindWork research search front-end")]
pub struct Args {
    /// Port number to run the HTTP server on
    #[arg(short, long, default_value = "5001")]
    pub port: u16,

    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

/// Application state shared by every handler.
///
/// Holds Arc-wrapped services so the state can be cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Slug → record cache backing the article pages
    pub cache: Arc<ResultCache>,
    /// Placeholder result generator
    pub generator: Arc<MockResultGenerator>,
    /// Optional Gemini enrichment
    pub ai_fetcher: Arc<AiSummaryFetcher>,
}

impl AppState {
    /// Builds all services from configuration.
    ///
    /// # Errors
    /// Returns an error only if the Gemini client cannot be constructed; a
    /// missing API key yields an inactive fetcher instead.
    pub fn from_config(config: Config) -> Result<Self> {
        let ai_fetcher = AiSummaryFetcher::from_config(&config.ai)?;
        Ok(Self::with_fetcher(config, ai_fetcher))
    }

    /// Builds the state around an existing fetcher.
    pub fn with_fetcher(config: Config, ai_fetcher: AiSummaryFetcher) -> Self {
        let cache = ResultCache::new(config.cache.ttl(), config.cache.max_entries);
        Self {
            config: Arc::new(config),
            cache: Arc::new(cache),
            generator: Arc::new(MockResultGenerator::new()),
            ai_fetcher: Arc::new(ai_fetcher),
        }
    }
}

/// Query parameters for search requests.
#[derive(Deserialize)]
pub struct SearchParams {
    /// Free-text search query
    #[serde(default)]
    query: Option<String>,
}

/// Query parameters for article detail requests.
#[derive(Deserialize)]
pub struct ArticleParams {
    /// Query that produced the result, used for the back link
    #[serde(default)]
    query: Option<String>,
}

/// Login form submission.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    #[allow(dead_code)]
    password: String,
}

/// Registration form submission.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    #[allow(dead_code)]
    password: String,
}

/// Response structure for the JSON search endpoint.
#[derive(Serialize, Deserialize)]
pub struct SearchResponse {
    /// The trimmed search query
    pub query: String,
    /// Whether the first result came from Gemini
    pub ai_enriched: bool,
    /// Number of results returned
    pub total_count: usize,
    /// Time taken to build the result list in milliseconds
    pub took_ms: u64,
    /// AI result first (when present), then generated results
    pub results: Vec<ResultRecord>,
}

/// Response structure for the JSON article endpoint.
#[derive(Serialize, Deserialize)]
pub struct ArticleResponse {
    /// `false` when `record` is the not-found placeholder
    pub found: bool,
    pub record: ResultRecord,
}

/// Outcome of one pass through the search pipeline.
struct SearchOutcome {
    results: Vec<ResultRecord>,
    ai_enriched: bool,
    took_ms: u64,
}

/// Returns the trimmed query, or `None` if it is missing or blank.
fn normalized_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}

/// Runs the full search pipeline for a non-empty query.
///
/// AI enrichment (optional) → mock generation → optional shuffle of the mock
/// portion → cache population. The AI record, when present, is always first.
async fn run_search(state: &AppState, query: &str) -> SearchOutcome {
    let start = Instant::now();

    // Also drops records an overlapping search is still inserting
    if state.config.search.clear_cache_per_search {
        state.cache.clear();
        debug!("Result cache cleared for new search");
    }

    let ai_record = state.ai_fetcher.fetch(query).await;
    let ai_enriched = ai_record.is_some();
    let results = assemble_results(state, query, ai_record);

    SearchOutcome {
        results,
        ai_enriched,
        took_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}

fn assemble_results(
    state: &AppState,
    query: &str,
    ai_record: Option<ResultRecord>,
) -> Vec<ResultRecord> {
    let mut mock = state.generator.generate(
        query,
        state.config.search.results_per_search,
        &state.cache,
    );

    if state.config.search.shuffle_results {
        mock.shuffle(&mut rand::thread_rng());
    }

    let mut results = Vec::with_capacity(mock.len() + 1);
    if let Some(mut record) = ai_record {
        if state.cache.contains(&record.slug) {
            record.slug = unique_slug(
                &record.title,
                |s| state.cache.contains(s),
                &mut rand::thread_rng(),
            );
        }
        state.cache.insert(record.clone());
        results.push(record);
    }
    results.extend(mock);
    results
}

/// HTTP handler for the landing page.
pub async fn home_handler(State(state): State<AppState>) -> Html<String> {
    Html(pages::home_page(state.ai_fetcher.is_active()))
}

/// HTTP handler for the login form.
pub async fn login_page_handler() -> Html<String> {
    Html(pages::login_page())
}

/// HTTP handler for login submissions.
///
/// No credentials are checked or stored; the attempt is logged and the user
/// is sent to the home page.
pub async fn login_submit_handler(Form(form): Form<LoginForm>) -> Redirect {
    info!("🔐 LOGIN: Attempting to log in with: {}", form.email);
    Redirect::to("/")
}

/// HTTP handler for the registration form.
pub async fn register_page_handler() -> Html<String> {
    Html(pages::register_page())
}

/// HTTP handler for registration submissions.
///
/// Nothing is persisted; the attempt is logged and the user is sent to the
/// login page.
pub async fn register_submit_handler(Form(form): Form<RegisterForm>) -> Redirect {
    info!(
        "📝 REGISTER: Attempting to register new user: {} ({})",
        form.name, form.email
    );
    Redirect::to("/login")
}

/// HTTP handler for the Google OAuth entry point.
///
/// Performs no handshake and redirects home.
pub async fn google_oauth_handler() -> Redirect {
    info!("OAuth stub invoked, redirecting home");
    Redirect::to("/")
}

/// HTTP handler for the HTML search page.
///
/// # Query Parameters
/// - `query`: Search query string; missing or blank redirects to `/`
///
/// # Example
/// ```text
/// GET /search?query=renewable+energy
/// ```
pub async fn search_handler(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Response {
    let Some(query) = normalized_query(params.query.as_deref()) else {
        debug!("Empty search query, redirecting home");
        return Redirect::to("/").into_response();
    };

    info!("🔍 SEARCH: Searching for '{}'", query);
    let outcome = run_search(&state, query).await;
    info!(
        "✅ SEARCH: {} results for '{}' in {}ms (AI enriched: {})",
        outcome.results.len(),
        query,
        outcome.took_ms,
        outcome.ai_enriched
    );

    Html(pages::results_page(query, &outcome.results, outcome.took_ms)).into_response()
}

/// Looks up `slug`, substituting the not-found placeholder on a miss.
fn lookup_article(state: &AppState, slug: &str, query: Option<&str>) -> (ResultRecord, bool) {
    match state.cache.get(slug) {
        Some(record) => (record, true),
        None => {
            info!("❓ ARTICLE: '{}' not in cache, serving fallback record", slug);
            (ResultRecord::not_found(slug, query), false)
        }
    }
}

/// HTTP handler for the article detail page.
///
/// A cache miss renders a clearly-labeled placeholder with `200 OK` rather
/// than an error page.
///
/// # Example
/// ```text
/// GET /article/the-essential-guide-to-rust-3fa9?query=rust
/// ```
pub async fn article_handler(
    Path(slug): Path<String>,
    Query(params): Query<ArticleParams>,
    State(state): State<AppState>,
) -> Html<String> {
    let query = params.query.as_deref();
    let (record, found) = lookup_article(&state, &slug, query);
    Html(pages::article_page(&record, query, found))
}

/// HTTP handler for the JSON search endpoint.
///
/// # Returns
/// - `200 OK`: JSON response with the combined result list
/// - `400 Bad Request`: If the query is missing or blank
pub async fn api_search_handler(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<serde_json::Value>)> {
    let Some(query) = normalized_query(params.query.as_deref()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "query parameter is required" })),
        ));
    };

    info!("🔍 API SEARCH: Searching for '{}'", query);
    let outcome = run_search(&state, query).await;

    Ok(Json(SearchResponse {
        query: query.to_string(),
        ai_enriched: outcome.ai_enriched,
        total_count: outcome.results.len(),
        took_ms: outcome.took_ms,
        results: outcome.results,
    }))
}

/// HTTP handler for the JSON article endpoint. Always `200 OK`.
pub async fn api_article_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Json<ArticleResponse> {
    let (record, found) = lookup_article(&state, &slug, None);
    Json(ArticleResponse { found, record })
}

/// HTTP handler for health check operations.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "service": "mindwork",
        "environment": state.config.environment,
        "ai_enabled": state.ai_fetcher.is_active(),
        "cached_results": state.cache.len(),
    }))
}

/// Creates the main application router with all endpoints configured.
///
/// - `GET /` - Landing page with search form
/// - `GET|POST /login` - Mock login
/// - `GET|POST /register` - Mock registration
/// - `GET /oauth/google` - OAuth stub
/// - `GET /search` - HTML result list
/// - `GET /article/:slug` - HTML article detail
/// - `GET /api/search` - JSON result list
/// - `GET /api/article/:slug` - JSON article detail
/// - `GET /health` - Health check
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/login", get(login_page_handler).post(login_submit_handler))
        .route(
            "/register",
            get(register_page_handler).post(register_submit_handler),
        )
        .route("/oauth/google", get(google_oauth_handler))
        .route("/search", get(search_handler))
        .route("/article/:slug", get(article_handler))
        .route("/api/search", get(api_search_handler))
        .route("/api/article/:slug", get(api_article_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
