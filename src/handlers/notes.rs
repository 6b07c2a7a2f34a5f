use crate::middlewares::CurrentProfile;
use crate::models::*;
use crate::services::NoteService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/notes",
    tag = "notes",
    params(
        ("student_id" = Option<i64>, Query, description = "Filter by student"),
        ("class_id" = Option<i64>, Query, description = "Filter by class"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated notes"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_notes(
    note_service: web::Data<NoteService>,
    profile: CurrentProfile,
    query: web::Query<NoteQuery>,
) -> Result<HttpResponse> {
    match note_service.list_notes(&profile.0, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/notes",
    tag = "notes",
    request_body = CreateNoteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Note created", body = Note),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_note(
    note_service: web::Data<NoteService>,
    profile: CurrentProfile,
    request: web::Json<CreateNoteRequest>,
) -> Result<HttpResponse> {
    match note_service
        .create_note(&profile.0, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = i64, Path, description = "Note id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Note", body = Note),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_note(
    note_service: web::Data<NoteService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match note_service.get_note(&profile.0, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = i64, Path, description = "Note id")),
    request_body = UpdateNoteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Note updated", body = Note),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_note(
    note_service: web::Data<NoteService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
    request: web::Json<UpdateNoteRequest>,
) -> Result<HttpResponse> {
    match note_service
        .update_note(&profile.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = i64, Path, description = "Note id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Note deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_note(
    note_service: web::Data<NoteService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match note_service.delete_note(&profile.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Note deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/notes/{id}/format",
    tag = "notes",
    params(("id" = i64, Path, description = "Note id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Note cleaned up and persisted", body = Note),
        (status = 404, description = "Not found"),
        (status = 502, description = "Formatter unavailable")
    )
)]
pub async fn format_note(
    note_service: web::Data<NoteService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match note_service.format_note(&profile.0, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/notes/transcribe",
    tag = "notes",
    request_body = TranscribeNoteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transcript stored as a new note", body = Note),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Transcription unavailable")
    )
)]
pub async fn transcribe_note(
    note_service: web::Data<NoteService>,
    profile: CurrentProfile,
    request: web::Json<TranscribeNoteRequest>,
) -> Result<HttpResponse> {
    match note_service
        .transcribe_note(&profile.0, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notes_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            .route("/transcribe", web::post().to(transcribe_note))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::delete().to(delete_note))
            .route("/{id}/format", web::post().to(format_note)),
    );
}
