//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use thiserror::Error;
use tracing::Level;

/// Errores de configuración
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// URL base del backend de flota
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub session_ttl: Duration,
    /// Máximo de sesiones en memoria
    pub max_sessions: usize,
    /// Offset fijo para los inputs datetime-local; `None` = zona local del servidor
    pub utc_offset: Option<FixedOffset>,
    pub log_level: Level,
}

impl EnvironmentConfig {
    /// Cargar desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Cargar usando una función de búsqueda (tests, fuentes alternativas)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("API_BASE_URL"))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "API_BASE_URL",
                value: api_base_url,
            });
        }

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let utc_offset = match lookup("UTC_OFFSET_MINUTES") {
            Some(raw) => {
                let minutes: i32 = parse_value("UTC_OFFSET_MINUTES", &raw)?;
                let offset = FixedOffset::east_opt(minutes * 60).ok_or(ConfigError::Invalid {
                    name: "UTC_OFFSET_MINUTES",
                    value: raw,
                })?;
                Some(offset)
            }
            None => None,
        };

        let default_level = if environment == "development" { "debug" } else { "info" };
        let log_level = parse_value::<Level>(
            "LOG_LEVEL",
            &lookup("LOG_LEVEL").unwrap_or_else(|| default_level.to_string()),
        )?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", lookup("PORT"), 3000)?,
            api_base_url,
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                lookup("REQUEST_TIMEOUT_SECS"),
                30,
            )?),
            session_ttl: Duration::from_secs(parse_or(
                "SESSION_TTL_SECS",
                lookup("SESSION_TTL_SECS"),
                1800,
            )?),
            max_sessions: parse_or("MAX_SESSIONS", lookup("MAX_SESSIONS"), 10_000)?,
            utc_offset,
            log_level,
            environment,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Offset vigente en `at`. Sin `UTC_OFFSET_MINUTES` se resuelve con la zona
    /// local en cada llamada, así los cambios de horario se respetan.
    pub fn utc_offset_at(&self, at: DateTime<Utc>) -> FixedOffset {
        self.utc_offset
            .unwrap_or_else(|| at.with_timezone(&Local).offset().fix())
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

fn parse_or<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}
