// 🌐 Web Interface
// Form -> audit -> results page, plus a small JSON API

pub mod pages;

use crate::audit::{audit_model, AuditReport};
use crate::config::AuditConfig;
use crate::dataset::auditable_columns;
use crate::error::AuditError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const INVALID_ATTRIBUTE_MESSAGE: &str = "Error: Invalid attribute selected.";

/// Shared application state, read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AuditConfig>,
    /// Dropdown contents, fixed at startup
    pub columns: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(config: AuditConfig, columns: Vec<String>) -> Self {
        AppState {
            config: Arc::new(config),
            columns: Arc::new(columns),
        }
    }

    /// Read the dataset header once; a missing file leaves the dropdown empty
    pub fn discover(config: AuditConfig) -> Self {
        let columns = match auditable_columns(&config.data_path, &config.candidate_columns) {
            Ok(columns) => {
                info!(?columns, "auditable columns");
                columns
            }
            Err(e) => {
                warn!(error = %e, "dataset unavailable, run `fairness-audit prepare` first");
                Vec::new()
            }
        };
        Self::new(config, columns)
    }

    fn is_auditable(&self, attribute: &str) -> bool {
        self.columns.iter().any(|c| c == attribute)
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuditForm {
    pub attribute: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    pub attribute: String,
}

fn status_for(err: &AuditError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Audits are CPU-bound, keep them off the async workers
async fn run_audit(state: &AppState, attribute: String) -> Result<AuditReport, (StatusCode, String)> {
    let config = Arc::clone(&state.config);
    let attr = attribute.clone();

    match tokio::task::spawn_blocking(move || audit_model(&config, &attr)).await {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(e)) => {
            error!(%attribute, error = %e, "audit failed");
            Err((status_for(&e), format!("Error: {}", e)))
        }
        Err(e) => {
            error!(%attribute, error = %e, "audit task panicked");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error: audit did not complete".to_string(),
            ))
        }
    }
}

// ============================================================================
// HTML Handlers
// ============================================================================

/// GET / - Attribute form
async fn serve_index(State(state): State<AppState>) -> Html<String> {
    Html(pages::index_page(&state.columns))
}

/// POST /audit - Run the audit and render results
async fn submit_audit(State(state): State<AppState>, Form(form): Form<AuditForm>) -> Response {
    let attribute = match form.attribute {
        Some(a) if state.is_auditable(&a) => a,
        other => {
            warn!(attribute = ?other, "rejected attribute");
            return (StatusCode::BAD_REQUEST, INVALID_ATTRIBUTE_MESSAGE).into_response();
        }
    };

    match run_audit(&state, attribute).await {
        Ok(report) => Html(pages::results_page(&report)).into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/columns - Auditable columns
async fn get_columns(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.columns.as_ref().clone()))
}

/// POST /api/audit - Audit report as JSON
async fn api_audit(
    State(state): State<AppState>,
    payload: Result<Json<AuditRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed audit request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<AuditReport>::err(format!(
                    "Error: {}",
                    rejection.body_text()
                ))),
            )
                .into_response();
        }
    };

    if !state.is_auditable(&request.attribute) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<AuditReport>::err(INVALID_ATTRIBUTE_MESSAGE)),
        )
            .into_response();
    }

    match run_audit(&state, request.attribute).await {
        Ok(report) => (StatusCode::OK, Json(ApiResponse::ok(report))).into_response(),
        Err((status, message)) => {
            (status, Json(ApiResponse::<AuditReport>::err(message))).into_response()
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/columns", get(get_columns))
        .route("/audit", post(api_audit))
        .with_state(state.clone());

    Router::new()
        .route("/", get(serve_index))
        .route("/audit", post(submit_audit))
        .with_state(state)
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
