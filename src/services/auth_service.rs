//! Servicio de autenticación
//!
//! Hash de contraseñas con bcrypt y creación del administrador inicial.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::environment::EnvironmentConfig;
use crate::models::user::UserRole;
use crate::repositories::user_repository::{UserData, UserRepository};
use crate::utils::errors::AppError;

/// Hashear contraseña fuera del runtime async (bcrypt es costoso)
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Error en tarea de hash: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

/// Verificar contraseña contra su hash
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Error en tarea de hash: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

/// Crear el administrador inicial si ADMIN_EMAIL/ADMIN_PASSWORD están
/// definidos y no existe ya un usuario con ese email
pub async fn ensure_admin(pool: &PgPool, config: &EnvironmentConfig) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    let repository = UserRepository::new(pool.clone());
    if repository.find_by_email(email).await?.is_some() {
        info!("👤 Administrador {} ya existe", email);
        return Ok(());
    }

    if password.len() < 8 {
        warn!("⚠️ ADMIN_PASSWORD demasiado corta, no se crea el administrador");
        return Ok(());
    }

    let password_hash = hash_password(password.clone()).await?;
    let admin = repository
        .create(
            UserData {
                name: "Administrador",
                email,
                role: UserRole::Admin,
                is_active: true,
            },
            &password_hash,
        )
        .await?;

    info!("👤 Administrador inicial creado: {} ({})", admin.email, admin.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hashed = hash_password("correcthorse".to_string()).await.unwrap();
        assert_ne!(hashed, "correcthorse");
        assert!(verify_password("correcthorse".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_against_malformed_hash_fails() {
        let result = verify_password("x".to_string(), "not-a-hash".to_string()).await;
        assert!(matches!(result, Err(AppError::Hash(_))));
    }
}
