use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::dto::note_dto::NoteRequest;
use crate::models::note::Note;
use crate::services::note_store::NoteStore;
use crate::utils::errors::{unprocessable_error, AppError};
use crate::utils::validation::validate_note_key;

pub struct NoteController {
    store: Arc<dyn NoteStore>,
}

impl NoteController {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    fn check_key(key: &str) -> Result<(), AppError> {
        validate_note_key(key).map_err(|_| unprocessable_error(format!("Clave de nota no válida: '{}'", key)))
    }

    pub async fn get(&self, owner: Uuid, key: &str) -> Result<Note, AppError> {
        Self::check_key(key)?;

        self.store
            .get(owner, key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Nota '{}' no encontrada", key)))
    }

    pub async fn save(&self, owner: Uuid, key: &str, request: NoteRequest) -> Result<Note, AppError> {
        Self::check_key(key)?;
        request.validate()?;

        let note = self.store.put(owner, key, request.content).await?;
        debug!("📝 Nota guardada: {} ({}, {})", key, owner, self.store.backend());
        Ok(note)
    }

    pub async fn delete(&self, owner: Uuid, key: &str) -> Result<(), AppError> {
        Self::check_key(key)?;

        if !self.store.delete(owner, key).await? {
            return Err(AppError::NotFound(format!("Nota '{}' no encontrada", key)));
        }
        Ok(())
    }
}
