use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::classify::{classify, ClassificationResult, ClassifiedEntry};
use crate::config::{Config, PageConfig};
use crate::fetcher::Fetcher;

pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Fetcher,
}

// Template structs
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: PageConfig,
    pub watch_keywords: Vec<String>,
    pub region_token: String,
    pub reload_seconds: u64,
    pub highlighted: Vec<ClassifiedEntry>,
    pub region: Vec<ClassifiedEntry>,
    pub other: Vec<ClassifiedEntry>,
}

impl IndexTemplate {
    pub fn new(config: &Config, result: ClassificationResult) -> Self {
        Self {
            page: config.page.clone(),
            watch_keywords: config.filter.watch_keywords.clone(),
            region_token: config.filter.region_token.clone(),
            reload_seconds: config.refresh_interval * 60,
            highlighted: result.highlighted,
            region: result.region,
            other: result.other,
        }
    }
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/refresh", post(refresh))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// One full fetch, classify and truncate pass.
pub async fn run_pass(state: &AppState) -> ClassificationResult {
    let entries = state.fetcher.fetch_all(&state.config.feeds).await;
    let result = classify(&entries, &state.config.classification()).truncate_for_display();

    info!(
        "Classified {} entries: {} highlighted, {} region, {} other",
        entries.len(),
        result.highlighted.len(),
        result.region.len(),
        result.other.len()
    );

    result
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = run_pass(&state).await;
    HtmlTemplate(IndexTemplate::new(&state.config, result))
}

pub async fn refresh() -> Redirect {
    info!("Manual refresh requested");
    Redirect::to("/")
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
