use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Note {
    pub id: i64,
    pub studio_id: i64,
    pub instructor_id: i64,
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub body: String,
    pub formatted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    #[schema(example = "Worked on pirouette spotting, needs follow-up next week")]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteQuery {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranscribeNoteRequest {
    /// URL of the recorded voice memo to transcribe
    pub audio_url: String,
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
}
