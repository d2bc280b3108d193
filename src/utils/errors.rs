//! Sistema de manejo de errores
//!
//! Este módulo define los errores a nivel de página y su conversión a
//! respuestas HTML. Los fallos del backend no pasan por aquí: se convierten en
//! notificaciones dentro del formulario.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::viewmodels::BookingBlocked;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<BookingBlocked> for AppError {
    fn from(blocked: BookingBlocked) -> Self {
        match blocked {
            BookingBlocked::NoSearch => AppError::BadRequest(blocked.to_string()),
            BookingBlocked::UnknownVehicle => AppError::NotFound(blocked.to_string()),
            BookingBlocked::InFlight => AppError::Conflict(blocked.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Texto que se muestra al usuario (los internos no se filtran)
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Template(_) => "An unexpected error occurred",
            AppError::NotFound(_) => "The page or item you asked for does not exist",
            AppError::BadRequest(_) => "The request could not be processed",
            AppError::Conflict(_) => "That action is already in progress",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::warn!("⚠️ {}", self);
        }

        let body = format!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>FleetLink - {code}</title></head>\
             <body><main><h1>{code} {reason}</h1><p>{message}</p><p><a href=\"/\">Back to dashboard</a></p></main></body></html>",
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("Error"),
            message = self.public_message(),
        );

        (status, Html(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;
