use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::CacheConfig;
use crate::database::connection::mask_database_url;
use crate::models::note::Note;
use crate::services::note_store::NoteStore;
use crate::utils::errors::AppError;

/// Cliente Redis con connection manager y operaciones async
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: CacheConfig,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(config: CacheConfig) -> anyhow::Result<Self> {
        info!("🔗 Conectando a Redis: {}", mask_database_url(&config.redis_url));

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager, config })
    }

    /// Generar clave de cache con prefijo
    fn make_key(&self, prefix: &str, identifier: &str) -> String {
        format!("{}:{}:{}", self.config.key_prefix, prefix, identifier)
    }

    /// Generar clave de nota
    pub fn note_key(&self, owner: Uuid, key: &str) -> String {
        self.make_key("notes", &format!("{}:{}", owner, key))
    }
}

#[async_trait]
impl NoteStore for RedisClient {
    async fn get(&self, owner: Uuid, key: &str) -> Result<Option<Note>, AppError> {
        let mut conn = self.manager.clone();
        let redis_key = self.note_key(owner, key);

        let value: Option<String> = conn.get(&redis_key).await.map_err(|e| {
            warn!("⚠️ Error leyendo nota {}: {}", redis_key, e);
            AppError::Cache(format!("Error leyendo nota: {}", e))
        })?;

        match value {
            Some(raw) => {
                debug!("📥 Nota encontrada: {}", redis_key);
                let note = serde_json::from_str(&raw)
                    .map_err(|e| AppError::Cache(format!("Nota corrupta: {}", e)))?;
                Ok(Some(note))
            }
            None => {
                debug!("❌ Nota no encontrada: {}", redis_key);
                Ok(None)
            }
        }
    }

    async fn put(&self, owner: Uuid, key: &str, content: String) -> Result<Note, AppError> {
        let mut conn = self.manager.clone();
        let redis_key = self.note_key(owner, key);

        let note = Note {
            key: key.to_string(),
            content,
            updated_at: chrono::Utc::now(),
        };
        let serialized = serde_json::to_string(&note)
            .map_err(|e| AppError::Internal(format!("Error serializando nota: {}", e)))?;

        let result: RedisResult<()> = conn.set_ex(&redis_key, serialized, self.config.notes_ttl).await;

        match result {
            Ok(()) => {
                debug!("💾 Nota guardada: {} (TTL: {}s)", redis_key, self.config.notes_ttl);
                Ok(note)
            }
            Err(e) => {
                error!("❌ Error guardando nota {}: {}", redis_key, e);
                Err(AppError::Cache(format!("Error guardando nota: {}", e)))
            }
        }
    }

    async fn delete(&self, owner: Uuid, key: &str) -> Result<bool, AppError> {
        let mut conn = self.manager.clone();
        let redis_key = self.note_key(owner, key);

        let removed: i64 = conn.del(&redis_key).await.map_err(|e| {
            warn!("⚠️ Error eliminando nota {}: {}", redis_key, e);
            AppError::Cache(format!("Error eliminando nota: {}", e))
        })?;

        debug!("🗑️ Nota eliminada: {} (eliminados: {})", redis_key, removed);
        Ok(removed > 0)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
