//! Nota autoguardada de un usuario

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Borrador de texto guardado por clave y usuario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub key: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}
