use serde::Deserialize;
use validator::Validate;

// Request de autoguardado
#[derive(Debug, Deserialize, Validate)]
pub struct NoteRequest {
    #[validate(length(max = 20000))]
    pub content: String,
}
