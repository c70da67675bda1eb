//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL (ver `migrations/`).

pub mod activity;
pub mod client;
pub mod document;
pub mod driver;
pub mod note;
pub mod site;
pub mod user;
pub mod vehicle;
pub mod vehicle_deadline;

use chrono::{DateTime, Utc};

/// Calcular `completed_at` a partir del nuevo estado.
///
/// Al pasar a completado se conserva la fecha previa si existía, si no se
/// usa `now`. Cualquier otro estado la borra.
pub fn resolve_completed_at(
    completed: bool,
    previous: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if completed {
        Some(previous.unwrap_or(now))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_completed_sets_timestamp() {
        let now = Utc::now();
        assert_eq!(resolve_completed_at(true, None, now), Some(now));
    }

    #[test]
    fn test_completed_keeps_previous_timestamp() {
        let now = Utc::now();
        let earlier = now - Duration::days(2);
        assert_eq!(resolve_completed_at(true, Some(earlier), now), Some(earlier));
    }

    #[test]
    fn test_leaving_completed_clears_timestamp() {
        let now = Utc::now();
        assert_eq!(resolve_completed_at(false, Some(now), now), None);
        assert_eq!(resolve_completed_at(false, None, now), None);
    }
}
