//! Cache
//!
//! Este módulo contiene el cliente Redis usado para las notas autoguardadas.

pub mod cache_config;
pub mod redis_client;

pub use cache_config::CacheConfig;
pub use redis_client::RedisClient;
