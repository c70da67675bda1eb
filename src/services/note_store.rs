//! Almacén de notas autoguardadas
//!
//! Las notas son borradores por usuario identificados por una clave corta.
//! En producción se guardan en Redis con TTL (ver `cache::redis_client`);
//! sin Redis se usa un mapa en memoria del proceso.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::note::Note;
use crate::utils::errors::AppError;

/// Operaciones sobre las notas de un usuario
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn get(&self, owner: Uuid, key: &str) -> Result<Option<Note>, AppError>;

    async fn put(&self, owner: Uuid, key: &str, content: String) -> Result<Note, AppError>;

    /// Devuelve `true` si la nota existía
    async fn delete(&self, owner: Uuid, key: &str) -> Result<bool, AppError>;

    /// Eliminar notas caducadas; Redis las expira por sí mismo
    async fn purge_expired(&self) -> usize {
        0
    }

    fn backend(&self) -> &'static str;
}

#[derive(Clone)]
struct StoredNote {
    note: Note,
    expires_at: Instant,
}

impl StoredNote {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Notas en memoria con el mismo TTL que en Redis; se pierden al reiniciar
#[derive(Clone)]
pub struct MemoryNoteStore {
    notes: Arc<RwLock<HashMap<(Uuid, String), StoredNote>>>,
    ttl: Duration,
}

impl MemoryNoteStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            notes: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn get(&self, owner: Uuid, key: &str) -> Result<Option<Note>, AppError> {
        let notes = self.notes.read().await;
        Ok(notes
            .get(&(owner, key.to_string()))
            .filter(|stored| stored.is_live(Instant::now()))
            .map(|stored| stored.note.clone()))
    }

    async fn put(&self, owner: Uuid, key: &str, content: String) -> Result<Note, AppError> {
        let note = Note {
            key: key.to_string(),
            content,
            updated_at: Utc::now(),
        };
        let stored = StoredNote {
            note: note.clone(),
            expires_at: Instant::now() + self.ttl,
        };
        self.notes.write().await.insert((owner, key.to_string()), stored);
        Ok(note)
    }

    async fn delete(&self, owner: Uuid, key: &str) -> Result<bool, AppError> {
        let removed = self.notes.write().await.remove(&(owner, key.to_string()));
        Ok(removed.is_some_and(|stored| stored.is_live(Instant::now())))
    }

    async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|_, stored| stored.is_live(now));
        before - notes.len()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 3600);

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryNoteStore::new(WEEK);
        let owner = Uuid::new_v4();

        assert!(store.get(owner, "activity:draft").await.unwrap().is_none());

        let saved = store.put(owner, "activity:draft", "Portare DPI".into()).await.unwrap();
        assert_eq!(saved.key, "activity:draft");

        let loaded = store.get(owner, "activity:draft").await.unwrap().unwrap();
        assert_eq!(loaded.content, "Portare DPI");

        assert!(store.delete(owner, "activity:draft").await.unwrap());
        assert!(!store.delete(owner, "activity:draft").await.unwrap());
        assert!(store.get(owner, "activity:draft").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_notes_are_per_user() {
        let store = MemoryNoteStore::new(WEEK);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.put(alice, "calendar", "di Alice".into()).await.unwrap();
        assert!(store.get(bob, "calendar").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryNoteStore::new(WEEK);
        let owner = Uuid::new_v4();
        store.put(owner, "k", "uno".into()).await.unwrap();
        store.put(owner, "k", "due".into()).await.unwrap();
        assert_eq!(store.get(owner, "k").await.unwrap().unwrap().content, "due");
    }

    #[tokio::test]
    async fn test_notes_expire_after_ttl() {
        let store = MemoryNoteStore::new(Duration::from_millis(20));
        let owner = Uuid::new_v4();

        store.put(owner, "draft", "breve".into()).await.unwrap();
        store.put(owner, "other", "breve".into()).await.unwrap();
        assert!(store.get(owner, "draft").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(store.get(owner, "draft").await.unwrap().is_none());
        assert!(!store.delete(owner, "draft").await.unwrap());
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_put_refreshes_expiry() {
        let store = MemoryNoteStore::new(Duration::from_millis(60));
        let owner = Uuid::new_v4();

        store.put(owner, "k", "uno".into()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        store.put(owner, "k", "due".into()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.get(owner, "k").await.unwrap().unwrap().content, "due");
        assert_eq!(store.purge_expired().await, 0);
    }
}
