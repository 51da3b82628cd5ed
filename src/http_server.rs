//! HTTP API serving page views as JSON.
//!
//! Read-only: every route loads through the `Catalog`, so store outages show
//! up as empty views. The only error responses are a missing project (404)
//! and malformed query parameters (400).

use crate::catalog::{AboutQuery, AboutView, ArchiveView, Catalog, HomeView, ProjectDetailView, ProjectsView};
use crate::error::CatalogError;
use crate::grouping::CategoryTab;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

// ============================================================================
// AppState
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// "supabase" or "memory"
    pub store_kind: &'static str,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(catalog: Catalog, store_kind: &'static str) -> Self {
        Self { catalog: Arc::new(catalog), store_kind, start_time: Instant::now() }
    }
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug)]
pub struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({"error": self.1}))).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => not_found(e.to_string()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        bad_request(e.body_text())
    }
}

fn not_found(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::NOT_FOUND, msg.into())
}

fn bad_request(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::BAD_REQUEST, msg.into())
}

// ============================================================================
// Request / Response types
// ============================================================================

#[derive(Deserialize)]
struct ProjectsParams {
    tab: Option<String>,
    page: Option<usize>,
}

#[derive(Deserialize)]
struct ArchiveParams {
    q: Option<String>,
    page: Option<usize>,
}

#[derive(Deserialize)]
struct DetailParams {
    page: Option<usize>,
}

#[derive(Deserialize)]
struct AboutParams {
    skill: Option<String>,
    skill_page: Option<usize>,
    year: Option<String>,
    page: Option<usize>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    store: String,
    uptime_secs: u64,
}

// ============================================================================
// Handlers
// ============================================================================

async fn home_handler(State(state): State<AppState>) -> Json<HomeView> {
    Json(state.catalog.home().await)
}

async fn projects_handler(
    State(state): State<AppState>,
    params: Result<Query<ProjectsParams>, QueryRejection>,
) -> Result<Json<ProjectsView>, AppError> {
    let Query(params) = params?;
    let tab = CategoryTab::parse(params.tab.as_deref());
    Ok(Json(state.catalog.projects(tab, params.page.unwrap_or(0)).await))
}

async fn archive_handler(
    State(state): State<AppState>,
    params: Result<Query<ArchiveParams>, QueryRejection>,
) -> Result<Json<ArchiveView>, AppError> {
    let Query(params) = params?;
    let query = params.q.unwrap_or_default();
    Ok(Json(state.catalog.archive(&query, params.page.unwrap_or(0)).await))
}

async fn project_detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    params: Result<Query<DetailParams>, QueryRejection>,
) -> Result<Json<ProjectDetailView>, AppError> {
    let Query(params) = params?;
    let view = state.catalog.project_detail(&slug, params.page.unwrap_or(0)).await?;
    Ok(Json(view))
}

async fn about_handler(
    State(state): State<AppState>,
    params: Result<Query<AboutParams>, QueryRejection>,
) -> Result<Json<AboutView>, AppError> {
    let Query(params) = params?;
    let query = AboutQuery {
        skill_group: params.skill.as_deref(),
        skill_page: params.skill_page.unwrap_or(0),
        year: params.year.as_deref(),
        achievement_page: params.page.unwrap_or(0),
    };
    Ok(Json(state.catalog.about(query).await))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store_kind.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]);

    Router::new()
        .route("/", get(home_handler))
        .route("/projects", get(projects_handler))
        .route("/projects/archive", get(archive_handler))
        .route("/projects/{slug}", get(project_detail_handler))
        .route("/about", get(about_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use crate::settings::PageSizes;
    use crate::store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = MemoryStore {
            projects: vec![
                Project { id: 1, slug: "shop".into(), title: "Shop".into(), category: Some("web-dev".into()), year: "2023".into(), ..Project::default() },
                Project { id: 2, slug: "churn".into(), title: "Churn".into(), category: Some("data-science".into()), year: "2024".into(), ..Project::default() },
            ],
            ..MemoryStore::default()
        };
        let catalog = Catalog::new(Arc::new(store), PageSizes::default(), 5000);
        router(AppState::new(catalog, "memory"))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_projects_tab() {
        let (status, body) = get_json("/projects?tab=data-science").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_tab"], "data-ai");
        assert_eq!(body["projects"][0]["slug"], "churn");
        assert_eq!(body["projects"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_archive_is_not_a_slug() {
        let (status, body) = get_json("/projects/archive?q=shop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_matches"], 1);
        assert_eq!(body["query"], "shop");
    }

    #[tokio::test]
    async fn test_project_detail() {
        let (status, body) = get_json("/projects/shop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["project"]["title"], "Shop");
        assert_eq!(body["category_label"], "Web Development");
    }

    #[tokio::test]
    async fn test_missing_project_is_404() {
        let (status, body) = get_json("/projects/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Project 'nope' not found");
    }

    #[tokio::test]
    async fn test_bad_page_is_400() {
        let (status, body) = get_json("/projects?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_about_with_empty_store() {
        let (status, body) = get_json("/about?year=2020").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_year"], "All");
        assert_eq!(body["autoslide_interval_ms"], 5000);
    }
}
