//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: configuración, cliente del backend, plantillas
//! y el almacén de sesiones con los ViewModels de cada navegador.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

use crate::clients::FleetApi;
use crate::config::environment::EnvironmentConfig;
use crate::viewmodels::{AddVehicleViewModel, SearchBookViewModel};
use crate::views::Templates;

/// Estado de UI de un navegador
#[derive(Debug)]
pub struct PageSession {
    pub add_vehicle: AddVehicleViewModel,
    pub search_book: SearchBookViewModel,
}

impl PageSession {
    pub fn new(now: NaiveDateTime, utc_offset: FixedOffset) -> Self {
        Self {
            add_vehicle: AddVehicleViewModel::new(),
            search_book: SearchBookViewModel::mount(now, utc_offset),
        }
    }
}

/// Entrada del almacén de sesiones
struct SessionEntry {
    session: Arc<Mutex<PageSession>>,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub api: Arc<dyn FleetApi>,
    pub templates: Arc<Templates>,
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, api: Arc<dyn FleetApi>) -> Result<Self, tera::Error> {
        Ok(Self {
            config,
            api,
            templates: Arc::new(Templates::new()?),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Offset vigente ahora mismo
    pub fn utc_offset(&self) -> FixedOffset {
        self.config.utc_offset_at(Utc::now())
    }

    /// Hora local actual en la zona horaria configurada
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.utc_offset()).naive_local()
    }

    /// Obtener (o crear) la sesión de un navegador
    ///
    /// Con el almacén lleno, una sesión nueva desplaza a la menos reciente.
    pub async fn session(&self, id: Uuid) -> Arc<Mutex<PageSession>> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&id) && sessions.len() >= self.config.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(oldest, _)| *oldest);
            if let Some(oldest) = oldest {
                log::warn!("⚠️ Límite de {} sesiones alcanzado, se descarta {}", self.config.max_sessions, oldest);
                sessions.remove(&oldest);
            }
        }
        let now = self.local_now();
        let utc_offset = self.utc_offset();
        let entry = sessions.entry(id).or_insert_with(|| {
            log::debug!("🆕 Nueva sesión {}", id);
            SessionEntry {
                session: Arc::new(Mutex::new(PageSession::new(now, utc_offset))),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();
        entry.session.clone()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Limpiar sesiones inactivas. Devuelve cuántas se eliminaron.
    pub async fn cleanup_expired_sessions(&self) -> usize {
        let ttl = self.config.session_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < ttl);
        let removed = before - sessions.len();
        if removed > 0 {
            log::info!("🧹 {} sesiones expiradas eliminadas, quedan {}", removed, sessions.len());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ApiError;
    use crate::dto::{AddVehicleRequest, CreateBookingRequest, SearchVehiclesRequest};
    use crate::models::{AvailableVehicle, Booking, Vehicle};
    use async_trait::async_trait;
    use std::time::Duration;

    struct UnreachableApi;

    #[async_trait]
    impl FleetApi for UnreachableApi {
        async fn add_vehicle(&self, _: &AddVehicleRequest) -> Result<Vehicle, ApiError> {
            Err(ApiError::Network("unreachable".to_string()))
        }

        async fn search_available_vehicles(
            &self,
            _: &SearchVehiclesRequest,
        ) -> Result<Vec<AvailableVehicle>, ApiError> {
            Err(ApiError::Network("unreachable".to_string()))
        }

        async fn create_booking(&self, _: &CreateBookingRequest) -> Result<Booking, ApiError> {
            Err(ApiError::Network("unreachable".to_string()))
        }
    }

    fn test_state(ttl: Duration) -> AppState {
        test_state_with_limit(ttl, 10_000)
    }

    fn test_state_with_limit(ttl: Duration, max_sessions: usize) -> AppState {
        let mut config = EnvironmentConfig::from_lookup(|name| match name {
            "API_BASE_URL" => Some("http://localhost:5000".to_string()),
            "UTC_OFFSET_MINUTES" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        config.session_ttl = ttl;
        config.max_sessions = max_sessions;
        AppState::new(config, Arc::new(UnreachableApi)).unwrap()
    }

    #[tokio::test]
    async fn test_session_is_reused() {
        let state = test_state(Duration::from_secs(60));
        let id = Uuid::new_v4();

        let first = state.session(id).await;
        let second = state.session(id).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(state.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_cleanup_expired_sessions() {
        let state = test_state(Duration::ZERO);
        state.session(Uuid::new_v4()).await;
        state.session(Uuid::new_v4()).await;

        assert_eq!(state.cleanup_expired_sessions().await, 2);
        assert_eq!(state.session_count().await, 0);

        let state = test_state(Duration::from_secs(1800));
        state.session(Uuid::new_v4()).await;
        assert_eq!(state.cleanup_expired_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_session_limit_evicts_least_recent() {
        let state = test_state_with_limit(Duration::from_secs(1800), 2);
        let (first, second, third) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let first_session = state.session(first).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        state.session(second).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        state.session(third).await;

        assert_eq!(state.session_count().await, 2);
        // `first` se descartó: vuelve como sesión nueva
        assert!(!Arc::ptr_eq(&first_session, &state.session(first).await));
        assert_eq!(state.session_count().await, 2);
    }
}
