use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::html;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::views::Page;

pub fn create_page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/bookings", get(bookings))
        .route("/health", get(health_check))
}

async fn dashboard(State(state): State<AppState>) -> AppResult<Response> {
    let body = state.templates.render_static(Page::Dashboard, Page::Dashboard.path())?;
    html(StatusCode::OK, body)
}

async fn bookings(State(state): State<AppState>) -> AppResult<Response> {
    let body = state.templates.render_static(Page::Bookings, Page::Bookings.path())?;
    html(StatusCode::OK, body)
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "environment": state.config.environment,
        "sessions": state.session_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback para rutas desconocidas
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> AppResult<Response> {
    tracing::debug!("🔎 Ruta no encontrada: {}", uri.path());
    let body = state.templates.render_not_found(uri.path())?;
    html(StatusCode::NOT_FOUND, body)
}
