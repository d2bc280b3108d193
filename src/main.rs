use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use fleetlink_web::clients::FleetApiClient;
use fleetlink_web::config::EnvironmentConfig;
use fleetlink_web::routes::create_router;
use fleetlink_web::state::AppState;

/// Cada cuánto se buscan sesiones inactivas
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 FleetLink Web - Gestión de flota");
    info!("================================================");
    if config.is_production() {
        info!("🏭 Modo producción");
    } else if config.is_development() {
        warn!("🛠️ Modo desarrollo (ENVIRONMENT={})", config.environment);
    }

    let api = FleetApiClient::new(&config.api_base_url, config.request_timeout)?;
    info!("🔗 Backend de flota: {}", api.base_url());

    let addr = config.server_url();
    let app_state = AppState::new(config, Arc::new(api))?;

    // Limpieza periódica de sesiones
    let sweeper_state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper_state.cleanup_expired_sessions().await;
        }
    });

    let app = create_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Páginas disponibles:");
    info!("   GET  / - Dashboard");
    info!("   GET  /add-vehicle - Alta de vehículo");
    info!("   POST /add-vehicle - Enviar alta");
    info!("   GET  /search-book - Buscar y reservar");
    info!("   POST /search-book - Buscar disponibilidad");
    info!("   POST /search-book/book - Reservar vehículo");
    info!("   GET  /bookings - Mis reservas");
    info!("   GET  /health - Health check");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
