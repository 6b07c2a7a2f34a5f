use crate::middlewares::CurrentProfile;
use crate::models::*;
use crate::services::LessonRequestService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/lesson-requests",
    tag = "lesson-requests",
    request_body = CreateLessonRequestRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request created", body = LessonRequest),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Instructor not found")
    )
)]
pub async fn create_request(
    lesson_request_service: web::Data<LessonRequestService>,
    profile: CurrentProfile,
    request: web::Json<CreateLessonRequestRequest>,
) -> Result<HttpResponse> {
    match lesson_request_service
        .create_request(&profile.0, request.into_inner())
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
    path = "/lesson-requests",
    tag = "lesson-requests",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated lesson requests scoped to the caller"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_requests(
    lesson_request_service: web::Data<LessonRequestService>,
    profile: CurrentProfile,
    query: web::Query<LessonRequestQuery>,
) -> Result<HttpResponse> {
    match lesson_request_service.list_requests(&profile.0, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/lesson-requests/{id}/accept",
    tag = "lesson-requests",
    params(("id" = i64, Path, description = "Lesson request id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request accepted", body = LessonRequest),
        (status = 403, description = "Not the addressed instructor"),
        (status = 404, description = "Not found")
    )
)]
pub async fn accept_request(
    lesson_request_service: web::Data<LessonRequestService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match lesson_request_service
        .accept(&profile.0, path.into_inner())
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
    post,
    path = "/lesson-requests/{id}/decline",
    tag = "lesson-requests",
    params(("id" = i64, Path, description = "Lesson request id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request declined", body = LessonRequest),
        (status = 403, description = "Not the addressed instructor"),
        (status = 404, description = "Not found")
    )
)]
pub async fn decline_request(
    lesson_request_service: web::Data<LessonRequestService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match lesson_request_service
        .decline(&profile.0, path.into_inner())
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
    post,
    path = "/lesson-requests/{id}/complete",
    tag = "lesson-requests",
    params(("id" = i64, Path, description = "Lesson request id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request completed", body = LessonRequest),
        (status = 400, description = "Request was not accepted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn complete_request(
    lesson_request_service: web::Data<LessonRequestService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match lesson_request_service
        .complete(&profile.0, path.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn lesson_requests_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lesson-requests")
            .route("", web::post().to(create_request))
            .route("", web::get().to(list_requests))
            .route("/{id}/accept", web::post().to(accept_request))
            .route("/{id}/decline", web::post().to(decline_request))
            .route("/{id}/complete", web::post().to(complete_request)),
    );
}
