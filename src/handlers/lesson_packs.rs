use crate::middlewares::CurrentProfile;
use crate::models::*;
use crate::services::LessonPackService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/lesson-packs",
    tag = "lesson-packs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active packs for the caller's studio"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_packs(
    lesson_pack_service: web::Data<LessonPackService>,
    profile: CurrentProfile,
) -> Result<HttpResponse> {
    match lesson_pack_service.list_packs(&profile.0).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/lesson-packs",
    tag = "lesson-packs",
    request_body = CreateLessonPackRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pack created", body = LessonPack),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_pack(
    lesson_pack_service: web::Data<LessonPackService>,
    profile: CurrentProfile,
    request: web::Json<CreateLessonPackRequest>,
) -> Result<HttpResponse> {
    match lesson_pack_service
        .create_pack(&profile.0, request.into_inner())
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
    put,
    path = "/lesson-packs/{id}",
    tag = "lesson-packs",
    params(("id" = i64, Path, description = "Pack id")),
    request_body = UpdateLessonPackRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pack updated", body = LessonPack),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_pack(
    lesson_pack_service: web::Data<LessonPackService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
    request: web::Json<UpdateLessonPackRequest>,
) -> Result<HttpResponse> {
    match lesson_pack_service
        .update_pack(&profile.0, path.into_inner(), request.into_inner())
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
    path = "/lesson-packs/{id}/checkout",
    tag = "lesson-packs",
    params(("id" = i64, Path, description = "Pack id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Hosted checkout session", body = CheckoutSessionResponse),
        (status = 404, description = "Pack not found"),
        (status = 502, description = "Payment provider unavailable")
    )
)]
pub async fn checkout(
    lesson_pack_service: web::Data<LessonPackService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match lesson_pack_service
        .create_checkout(&profile.0, path.into_inner())
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
    path = "/lesson-packs/purchases",
    tag = "lesson-packs",
    request_body = DirectPurchaseRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Purchase recorded", body = LessonPackPurchase),
        (status = 404, description = "Pack or student not found")
    )
)]
pub async fn direct_purchase(
    lesson_pack_service: web::Data<LessonPackService>,
    profile: CurrentProfile,
    request: web::Json<DirectPurchaseRequest>,
) -> Result<HttpResponse> {
    match lesson_pack_service
        .direct_purchase(&profile.0, request.into_inner())
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
    path = "/lesson-packs/purchases/{id}/spend",
    tag = "lesson-packs",
    params(("id" = i64, Path, description = "Purchase id")),
    request_body = SpendLessonRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Lesson spent", body = SpendLessonResponse),
        (status = 400, description = "No lessons remaining"),
        (status = 403, description = "Purchase belongs to another student"),
        (status = 404, description = "Purchase not found")
    )
)]
pub async fn spend_lesson(
    lesson_pack_service: web::Data<LessonPackService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
    request: web::Json<SpendLessonRequest>,
) -> Result<HttpResponse> {
    match lesson_pack_service
        .spend_lesson(&profile.0, path.into_inner(), request.into_inner())
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
    path = "/lesson-packs/history",
    tag = "lesson-packs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's purchases with usage", body = LessonPackHistoryResponse),
        (status = 404, description = "No linked student record")
    )
)]
pub async fn history(
    lesson_pack_service: web::Data<LessonPackService>,
    profile: CurrentProfile,
) -> Result<HttpResponse> {
    match lesson_pack_service.history(&profile.0).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lesson-packs/students/{id}/history",
    tag = "lesson-packs",
    params(("id" = i64, Path, description = "Student id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student's purchases with usage", body = LessonPackHistoryResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn student_history(
    lesson_pack_service: web::Data<LessonPackService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match lesson_pack_service
        .history_for_student(&profile.0, path.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn lesson_packs_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lesson-packs")
            .route("", web::get().to(list_packs))
            .route("", web::post().to(create_pack))
            .route("/history", web::get().to(history))
            .route("/purchases", web::post().to(direct_purchase))
            .route("/purchases/{id}/spend", web::post().to(spend_lesson))
            .route("/students/{id}/history", web::get().to(student_history))
            .route("/{id}", web::put().to(update_pack))
            .route("/{id}/checkout", web::post().to(checkout)),
    );
}
