use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_backoffice::cache::{CacheConfig, RedisClient};
use fleet_backoffice::config::EnvironmentConfig;
use fleet_backoffice::database::DatabaseConnection;
use fleet_backoffice::routes::create_router;
use fleet_backoffice::services::auth_service::ensure_admin;
use fleet_backoffice::services::note_store::{MemoryNoteStore, NoteStore};
use fleet_backoffice::state::AppState;

/// Intervalo de limpieza de tokens revocados y notas caducadas
const CLEANUP_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG o info por defecto)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn")),
        )
        .init();

    info!("🚚 Fleet Back Office - API");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {}", config.environment);
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío en producción: se acepta cualquier origen");
    }

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::connect(&config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    if config.run_migrations {
        db_connection.run_migrations().await?;
    }

    let pool = db_connection.pool().clone();

    if let Err(e) = ensure_admin(&pool, &config).await {
        warn!("⚠️ No se pudo crear el administrador inicial: {}", e);
    }

    // Notas autoguardadas: Redis si está configurado, si no en memoria
    let notes_ttl = Duration::from_secs(config.notes_ttl);
    let notes: Arc<dyn NoteStore> = match CacheConfig::from_environment(&config) {
        Some(cache_config) => match RedisClient::new(cache_config).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!("⚠️ Redis no disponible ({}), notas en memoria", e);
                Arc::new(MemoryNoteStore::new(notes_ttl))
            }
        },
        None => {
            info!("📝 REDIS_URL no definido, notas en memoria");
            Arc::new(MemoryNoteStore::new(notes_ttl))
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let state = AppState::new(pool, config, notes);

    // Limpieza periódica de tokens revocados y notas caducadas
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            cleanup_state.cleanup_revoked_tokens().await;
            let purged = cleanup_state.notes.purge_expired().await;
            if purged > 0 {
                debug!("🧹 Notas caducadas eliminadas: {}", purged);
            }
        }
    });

    let app = create_router(state);

    info!("🌐 Servidor iniciando en http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

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
