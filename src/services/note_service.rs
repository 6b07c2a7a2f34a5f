use super::studio_of;
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::external::LlmService;
use crate::models::{CreateNoteRequest, Note, NoteQuery, Profile, TranscribeNoteRequest,
    UpdateNoteRequest};
use crate::utils::{PaginatedResponse, PaginationParams};

const NOTE_COLUMNS: &str =
    "id, studio_id, instructor_id, student_id, class_id, body, formatted, created_at, updated_at";

#[derive(Clone)]
pub struct NoteService {
    pool: DbPool,
    llm_service: LlmService,
}

impl NoteService {
    pub fn new(pool: DbPool, llm_service: LlmService) -> Self {
        Self { pool, llm_service }
    }

    pub async fn list_notes(
        &self,
        profile: &Profile,
        query: &NoteQuery,
    ) -> AppResult<PaginatedResponse<Note>> {
        let studio_id = studio_of(profile)?;
        let params = PaginationParams::new(query.page, query.per_page);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notes \
             WHERE studio_id = $1 \
             AND ($2::bigint IS NULL OR student_id = $2) \
             AND ($3::bigint IS NULL OR class_id = $3)",
        )
        .bind(studio_id)
        .bind(query.student_id)
        .bind(query.class_id)
        .fetch_one(&self.pool)
        .await?;

        let notes = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes \
             WHERE studio_id = $1 \
             AND ($2::bigint IS NULL OR student_id = $2) \
             AND ($3::bigint IS NULL OR class_id = $3) \
             ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(studio_id)
        .bind(query.student_id)
        .bind(query.class_id)
        .bind(params.get_limit())
        .bind(params.get_offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedResponse::new(notes, &params, total))
    }

    pub async fn create_note(
        &self,
        profile: &Profile,
        request: CreateNoteRequest,
    ) -> AppResult<Note> {
        let studio_id = studio_of(profile)?;

        if request.body.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Note body is required".to_string(),
            ));
        }

        let note = sqlx::query_as::<_, Note>(&format!(
            "INSERT INTO notes (studio_id, instructor_id, student_id, class_id, body) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {NOTE_COLUMNS}"
        ))
        .bind(studio_id)
        .bind(profile.id)
        .bind(request.student_id)
        .bind(request.class_id)
        .bind(request.body.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    pub async fn get_note(&self, profile: &Profile, note_id: i64) -> AppResult<Note> {
        let studio_id = studio_of(profile)?;

        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND studio_id = $2"
        ))
        .bind(note_id)
        .bind(studio_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Note not found".to_string()))
    }

    pub async fn update_note(
        &self,
        profile: &Profile,
        note_id: i64,
        request: UpdateNoteRequest,
    ) -> AppResult<Note> {
        let studio_id = studio_of(profile)?;

        if request.body.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Note body is required".to_string(),
            ));
        }

        // a manual edit resets the formatted flag
        sqlx::query_as::<_, Note>(&format!(
            "UPDATE notes SET body = $3, formatted = FALSE, updated_at = now() \
             WHERE id = $1 AND studio_id = $2 RETURNING {NOTE_COLUMNS}"
        ))
        .bind(note_id)
        .bind(studio_id)
        .bind(request.body.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Note not found".to_string()))
    }

    pub async fn delete_note(&self, profile: &Profile, note_id: i64) -> AppResult<()> {
        let studio_id = studio_of(profile)?;

        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND studio_id = $2")
            .bind(note_id)
            .bind(studio_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Note not found".to_string()));
        }
        Ok(())
    }

    /// Rewrites the note body through the LLM and persists the result.
    pub async fn format_note(&self, profile: &Profile, note_id: i64) -> AppResult<Note> {
        let note = self.get_note(profile, note_id).await?;

        let formatted = self.llm_service.format_note(&note.body).await?;
        if formatted.is_empty() {
            return Err(AppError::ExternalApiError(
                "Formatter returned an empty note".to_string(),
            ));
        }

        let note = sqlx::query_as::<_, Note>(&format!(
            "UPDATE notes SET body = $2, formatted = TRUE, updated_at = now() \
             WHERE id = $1 RETURNING {NOTE_COLUMNS}"
        ))
        .bind(note_id)
        .bind(&formatted)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    /// Transcribes a voice memo and stores the transcript as a new note.
    pub async fn transcribe_note(
        &self,
        profile: &Profile,
        request: TranscribeNoteRequest,
    ) -> AppResult<Note> {
        if request.audio_url.trim().is_empty() {
            return Err(AppError::ValidationError(
                "audio_url is required".to_string(),
            ));
        }

        let transcript = self.llm_service.transcribe(&request.audio_url).await?;
        if transcript.trim().is_empty() {
            return Err(AppError::ExternalApiError(
                "Transcription returned no text".to_string(),
            ));
        }

        self.create_note(
            profile,
            CreateNoteRequest {
                student_id: request.student_id,
                class_id: request.class_id,
                body: transcript,
            },
        )
        .await
    }
}
