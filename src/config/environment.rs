//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Errores al leer la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid value, got '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    pub redis_url: Option<String>,
    pub notes_ttl: u64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub run_migrations: bool,
}

impl EnvironmentConfig {
    /// Cargar configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Cargar configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        fn parsed<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
            match value {
                Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
                None => Ok(default),
            }
        }

        let cors_origins = optional("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment: optional("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed("PORT", optional("PORT"), 3000)?,
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", optional("DATABASE_MAX_CONNECTIONS"), 10)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration: parsed("JWT_EXPIRATION", optional("JWT_EXPIRATION"), 86_400)?,
            cors_origins,
            rate_limit_requests: parsed("RATE_LIMIT_REQUESTS", optional("RATE_LIMIT_REQUESTS"), 120)?,
            rate_limit_window: parsed("RATE_LIMIT_WINDOW", optional("RATE_LIMIT_WINDOW"), 60)?,
            redis_url: optional("REDIS_URL"),
            notes_ttl: parsed("NOTES_TTL", optional("NOTES_TTL"), 7 * 24 * 3600)?,
            admin_email: optional("ADMIN_EMAIL"),
            admin_password: optional("ADMIN_PASSWORD"),
            run_migrations: parsed("RUN_MIGRATIONS", optional("RUN_MIGRATIONS"), true)?,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_required_vars() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/fleet"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.jwt_expiration, 86_400);
        assert!(config.cors_origins.is_empty());
        assert!(config.redis_url.is_none());
        assert!(config.run_migrations);
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_required_var() {
        let err = EnvironmentConfig::from_lookup(lookup(&[("JWT_SECRET", "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_number() {
        let err = EnvironmentConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/fleet"),
            ("JWT_SECRET", "secret"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_cors_origins_are_split() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/fleet"),
            ("JWT_SECRET", "secret"),
            ("CORS_ORIGINS", "http://localhost:3001, https://admin.example.it,"),
            ("ENVIRONMENT", "production"),
            ("RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3001".to_string(), "https://admin.example.it".to_string()]
        );
        assert!(config.is_production());
        assert!(!config.run_migrations);
    }
}
