//! Configuración de cache
//!
//! Este módulo contiene la configuración de Redis para las notas
//! autoguardadas.

use serde::{Deserialize, Serialize};

use crate::config::environment::EnvironmentConfig;

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub redis_url: String,
    pub notes_ttl: u64,
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            notes_ttl: 7 * 24 * 3600, // 1 semana
            key_prefix: "fleet_backoffice".to_string(),
        }
    }
}

impl CacheConfig {
    /// Configuración a partir del entorno; `None` si no hay REDIS_URL
    pub fn from_environment(config: &EnvironmentConfig) -> Option<Self> {
        config.redis_url.as_ref().map(|url| Self {
            redis_url: url.clone(),
            notes_ttl: config.notes_ttl,
            ..Self::default()
        })
    }
}
