//! Cliente HTTP para el backend de flota
//!
//! Este módulo contiene el cliente HTTP que reenvía las operaciones de los
//! formularios al backend (alta de vehículos, búsqueda de disponibilidad y
//! reservas), registra cada request/response y clasifica los fallos en
//! `ApiError` para poder convertirlos en un mensaje legible.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::dto::{AddVehicleRequest, ApiResponse, CreateBookingRequest, SearchVehiclesRequest};
use crate::models::{AvailableVehicle, Booking, Vehicle};

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Check your connection.";
pub const BAD_REQUEST_MESSAGE: &str = "Invalid request. Please check your input.";
pub const NOT_FOUND_MESSAGE: &str = "Not found.";
pub const CONFLICT_MESSAGE: &str = "Conflict. Please try again.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// Fallo de una llamada al backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Hubo respuesta HTTP pero no fue un éxito
    #[error("HTTP {status}")]
    Response {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// No llegó ninguna respuesta (conexión, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Cualquier otro fallo que no es de transporte
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return ApiError::Response {
                status: status.as_u16(),
                body: None,
            };
        }
        if error.is_connect() || error.is_timeout() || error.is_request() {
            return ApiError::Network(error.to_string());
        }
        ApiError::Unexpected(error.to_string())
    }
}

/// Convertir un fallo del backend en el mensaje que ve el usuario
///
/// Prioridad: fallo no-HTTP, `message` del cuerpo, sin respuesta, código de estado.
pub fn api_error_message(error: &ApiError) -> String {
    let (status, body) = match error {
        ApiError::Unexpected(_) => return GENERIC_ERROR_MESSAGE.to_string(),
        ApiError::Network(_) => (None, None),
        ApiError::Response { status, body } => (Some(*status), body.as_ref()),
    };

    if let Some(message) = body
        .and_then(|body| body.as_object())
        .and_then(|object| object.get("message"))
        .and_then(|message| message.as_str())
    {
        return message.to_string();
    }

    let Some(status) = status else {
        return NETWORK_ERROR_MESSAGE.to_string();
    };

    match status {
        400 => BAD_REQUEST_MESSAGE,
        404 => NOT_FOUND_MESSAGE,
        409 => CONFLICT_MESSAGE,
        s if s >= 500 => SERVER_ERROR_MESSAGE,
        _ => GENERIC_ERROR_MESSAGE,
    }
    .to_string()
}

/// Operaciones que los formularios necesitan del backend
#[async_trait]
pub trait FleetApi: Send + Sync {
    async fn add_vehicle(&self, request: &AddVehicleRequest) -> Result<Vehicle, ApiError>;

    async fn search_available_vehicles(
        &self,
        params: &SearchVehiclesRequest,
    ) -> Result<Vec<AvailableVehicle>, ApiError>;

    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, ApiError>;
}

/// Cliente HTTP para la API de flota
#[derive(Clone)]
pub struct FleetApiClient {
    client: Client,
    base_url: String,
}

impl FleetApiClient {
    /// Crear nuevo cliente con URL base y timeout configurables
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json")
    }

    /// Enviar la request, registrar request/response y desenvolver `data`
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        log::info!("API Request: {} {}", method, path);

        let response = builder.send().await.map_err(|e| {
            log::error!("API Response Error: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        log::info!("API Response: {} {}", status.as_u16(), path);

        let bytes = response.bytes().await.map_err(ApiError::from)?;
        let body: Option<serde_json::Value> = serde_json::from_slice(&bytes).ok();

        if !status.is_success() {
            log::error!(
                "API Response Error: {}",
                body.as_ref()
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| format!("HTTP {}", status))
            );
            return Err(ApiError::Response {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes).map_err(|e| {
            log::error!("❌ Respuesta no decodificable de {}: {}", path, e);
            ApiError::Unexpected(format!("invalid response body: {}", e))
        })?;

        if !envelope.success {
            log::warn!("⚠️ El backend respondió success=false en {}", path);
            return Err(ApiError::Response {
                status: status.as_u16(),
                body,
            });
        }

        envelope
            .data
            .ok_or_else(|| ApiError::Unexpected(format!("response from {} has no data", path)))
    }
}

#[async_trait]
impl FleetApi for FleetApiClient {
    async fn add_vehicle(&self, request: &AddVehicleRequest) -> Result<Vehicle, ApiError> {
        let builder = self.request(Method::POST, "/vehicles").json(request);
        self.execute(Method::POST, "/vehicles", builder).await
    }

    async fn search_available_vehicles(
        &self,
        params: &SearchVehiclesRequest,
    ) -> Result<Vec<AvailableVehicle>, ApiError> {
        let builder = self.request(Method::GET, "/vehicles/available").query(params);
        self.execute(Method::GET, "/vehicles/available", builder).await
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, ApiError> {
        let builder = self.request(Method::POST, "/bookings").json(request);
        self.execute(Method::POST, "/bookings", builder).await
    }
}
