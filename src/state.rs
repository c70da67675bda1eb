//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::services::note_store::NoteStore;
use crate::utils::jwt::{JwtClaims, JwtConfig};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub notes: Arc<dyn NoteStore>,
    pub rate_limit: RateLimitState,
    /// `jti` de los tokens cerrados con logout, hasta su expiración
    pub revoked_tokens: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
    /// Usuarios desactivados, borrados o con contraseña cambiada: se rechazan
    /// los tokens emitidos hasta ese instante
    pub revoked_users: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, notes: Arc<dyn NoteStore>) -> Self {
        Self {
            jwt: JwtConfig::from(&config),
            rate_limit: RateLimitState::new(&config),
            pool,
            config,
            notes,
            revoked_tokens: Arc::new(RwLock::new(HashMap::new())),
            revoked_users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Revocar un token hasta su expiración
    pub async fn revoke_token(&self, jti: &str, expires_at: DateTime<Utc>) {
        let mut tokens = self.revoked_tokens.write().await;
        tokens.insert(jti.to_string(), expires_at);
        debug!("🔒 Token revocado. Revocados activos: {}", tokens.len());
    }

    pub async fn is_token_revoked(&self, jti: &str) -> bool {
        self.revoked_tokens.read().await.contains_key(jti)
    }

    /// Invalidar todas las sesiones abiertas de un usuario
    pub async fn revoke_user_sessions(&self, user_id: Uuid) {
        self.revoked_users.write().await.insert(user_id, Utc::now());
        debug!("🔒 Sesiones revocadas para usuario {}", user_id);
    }

    /// Comprobar si un token ya no es válido por logout o baja del usuario
    pub async fn is_session_revoked(&self, claims: &JwtClaims) -> bool {
        if self.is_token_revoked(&claims.jti).await {
            return true;
        }
        let Ok(user_id) = claims.user_id() else {
            return true;
        };
        // En microsegundos: un login justo después de la revocación sigue valiendo
        match self.revoked_users.read().await.get(&user_id) {
            Some(revoked_at) => claims.iat_micros <= revoked_at.timestamp_micros(),
            None => false,
        }
    }

    /// Limpiar revocaciones de tokens ya expirados
    pub async fn cleanup_revoked_tokens(&self) {
        let now = Utc::now();
        let mut tokens = self.revoked_tokens.write().await;
        tokens.retain(|_, expires_at| *expires_at > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::database::DatabaseConfig;
    use crate::models::user::UserRole;
    use crate::services::note_store::MemoryNoteStore;
    use crate::utils::jwt::generate_token;
    use chrono::Duration;

    fn state() -> AppState {
        let config = EnvironmentConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/fleet_test".to_string()),
            "JWT_SECRET" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = DatabaseConfig::from(&config).create_lazy_pool().unwrap();
        AppState::new(pool, config, Arc::new(MemoryNoteStore::new(std::time::Duration::from_secs(3600))))
    }

    #[tokio::test]
    async fn test_revoke_and_cleanup() {
        let state = state();
        state.revoke_token("live", Utc::now() + Duration::hours(1)).await;
        state.revoke_token("stale", Utc::now() - Duration::hours(1)).await;

        assert!(state.is_token_revoked("live").await);
        assert!(state.is_token_revoked("stale").await);

        state.cleanup_revoked_tokens().await;
        assert!(state.is_token_revoked("live").await);
        assert!(!state.is_token_revoked("stale").await);
    }

    #[tokio::test]
    async fn test_user_sessions_revoked() {
        let state = state();
        let user_id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let (_, claims) = generate_token(user_id, "ops@example.com", UserRole::Operator, &state.jwt).unwrap();
        let (_, other_claims) = generate_token(other, "adm@example.com", UserRole::Admin, &state.jwt).unwrap();

        assert!(!state.is_session_revoked(&claims).await);

        state.revoke_user_sessions(user_id).await;
        assert!(state.is_session_revoked(&claims).await);
        assert!(!state.is_session_revoked(&other_claims).await);
    }

    #[tokio::test]
    async fn test_token_issued_after_revocation_in_same_second_is_valid() {
        let state = state();
        let user_id = Uuid::new_v4();
        let (_, before) = generate_token(user_id, "ops@example.com", UserRole::Operator, &state.jwt).unwrap();

        state.revoke_user_sessions(user_id).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let (_, fresh) = generate_token(user_id, "ops@example.com", UserRole::Operator, &state.jwt).unwrap();

        assert!(state.is_session_revoked(&before).await);
        assert!(!state.is_session_revoked(&fresh).await);
    }

    #[tokio::test]
    async fn test_logout_revokes_only_that_token() {
        let state = state();
        let user_id = Uuid::new_v4();
        let (_, first) = generate_token(user_id, "ops@example.com", UserRole::Operator, &state.jwt).unwrap();
        let (_, second) = generate_token(user_id, "ops@example.com", UserRole::Operator, &state.jwt).unwrap();

        state.revoke_token(&first.jti, first.expires_at()).await;
        assert!(state.is_session_revoked(&first).await);
        assert!(!state.is_session_revoked(&second).await);
    }
}
