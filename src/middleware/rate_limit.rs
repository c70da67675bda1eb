//! Middleware de Rate Limiting
//!
//! Este módulo maneja la limitación de velocidad de requests
//! para prevenir abuso de la API.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Estructura para almacenar información de rate limiting por IP
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado global del rate limiting
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    /// Crear nuevo estado de rate limiting
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_limits(config.rate_limit_requests, Duration::from_secs(config.rate_limit_window))
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
        }
    }

    /// Verificar si una clave ha excedido `max_requests` en la ventana
    async fn check(&self, key: &str, max_requests: u32) -> Result<(), RateLimitError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(key.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= max_requests {
            return Err(RateLimitError::LimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }

    /// Límite general por IP
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), RateLimitError> {
        self.check(ip, self.max_requests).await
    }

    /// Límite para endpoints sensibles (login): la mitad del presupuesto,
    /// contado aparte
    pub async fn check_strict_rate_limit(&self, ip: &str) -> Result<(), RateLimitError> {
        self.check(&format!("strict:{}", ip), (self.max_requests / 2).max(1)).await
    }
}

/// Errores de rate limiting
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limit exceeded")]
    LimitExceeded,
}

impl From<RateLimitError> for AppError {
    fn from(_: RateLimitError) -> Self {
        AppError::RateLimitExceeded
    }
}

/// Extraer IP del cliente desde X-Forwarded-For
fn client_ip(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    if let Err(e) = state.rate_limit.check_rate_limit(&ip).await {
        warn!("🚫 Rate limit excedido para {}", ip);
        return Err(e.into());
    }

    Ok(next.run(request).await)
}

/// Middleware de rate limiting más estricto para endpoints sensibles
pub async fn strict_rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    if let Err(e) = state.rate_limit.check_strict_rate_limit(&ip).await {
        warn!("🚫 Rate limit estricto excedido para {}", ip);
        return Err(e.into());
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_ip() {
        let state = RateLimitState::with_limits(2, Duration::from_secs(60));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_err());
        assert!(state.check_rate_limit("10.0.0.2").await.is_ok());
    }

    #[tokio::test]
    async fn test_strict_limit_is_half() {
        let state = RateLimitState::with_limits(4, Duration::from_secs(60));

        assert!(state.check_strict_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_strict_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_strict_rate_limit("10.0.0.1").await.is_err());
        // El contador general es independiente
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_expiry_resets_counter() {
        let state = RateLimitState::with_limits(1, Duration::from_millis(20));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_err());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
    }
}
