//! Rutas HTTP
//!
//! Cada página tiene su propio router; aquí se combinan y se aplican las
//! capas comunes (trazas, compresión y sesión).

pub mod page_routes;
pub mod search_book_routes;
pub mod vehicle_routes;

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    middleware::from_fn,
    response::{Html, IntoResponse, Response},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::session_middleware;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(page_routes::create_page_router())
        .merge(vehicle_routes::create_vehicle_router())
        .merge(search_book_routes::create_search_book_router())
        .fallback(page_routes::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(from_fn(session_middleware)),
        )
        .with_state(state)
}

/// Respuesta HTML con status
pub(crate) fn html(status: StatusCode, body: String) -> AppResult<Response> {
    Ok((status, Html(body)).into_response())
}

/// `?field=` de los endpoints de validación
#[derive(Debug, Deserialize)]
pub struct FieldQuery {
    pub field: String,
}

/// Errores del formulario tras validar un campo al perder el foco
#[derive(Debug, Serialize)]
pub struct FieldValidation {
    pub field: &'static str,
    pub errors: HashMap<&'static str, String>,
}
