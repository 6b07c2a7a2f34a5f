use crate::middlewares::CurrentProfile;
use crate::models::*;
use crate::services::ClassService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/classes",
    tag = "classes",
    params(
        ("from" = Option<String>, Query, description = "Only classes starting on or after (RFC 3339)"),
        ("to" = Option<String>, Query, description = "Only classes starting before (RFC 3339)"),
        ("include_canceled" = Option<bool>, Query, description = "Include canceled classes"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated class schedule"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_classes(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    query: web::Query<ClassQuery>,
) -> Result<HttpResponse> {
    match class_service.list_classes(&profile.0, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/classes",
    tag = "classes",
    request_body = CreateClassRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Class created", body = ClassResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_class(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    request: web::Json<CreateClassRequest>,
) -> Result<HttpResponse> {
    match class_service
        .create_class(&profile.0, request.into_inner())
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
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Class detail", body = ClassResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_class(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match class_service.get_class(&profile.0, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    request_body = UpdateClassRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Class updated", body = ClassResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_class(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
    request: web::Json<UpdateClassRequest>,
) -> Result<HttpResponse> {
    match class_service
        .update_class(&profile.0, path.into_inner(), request.into_inner())
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
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Class canceled"),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_class(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match class_service
        .cancel_class(&profile.0, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Class canceled"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/classes/{id}/cost",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Computed class cost", body = ClassCostResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn class_cost(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match class_service.class_cost(&profile.0, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/classes/{id}/enrollments",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Enrollment roster"),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_enrollments(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match class_service
        .list_enrollments(&profile.0, path.into_inner())
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
    path = "/classes/{id}/enroll",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Enrolled (or waitlisted when full)", body = Enrollment),
        (status = 400, description = "Class canceled"),
        (status = 404, description = "Not found")
    )
)]
pub async fn enroll(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match class_service.enroll(&profile.0, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/classes/{id}/drop",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Enrollment dropped"),
        (status = 404, description = "Not enrolled")
    )
)]
pub async fn drop_enrollment(
    class_service: web::Data<ClassService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match ClassService::drop(&class_service, &profile.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Enrollment dropped"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn classes_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/classes")
            .route("", web::get().to(list_classes))
            .route("", web::post().to(create_class))
            .route("/{id}", web::get().to(get_class))
            .route("/{id}", web::put().to(update_class))
            .route("/{id}", web::delete().to(cancel_class))
            .route("/{id}/cost", web::get().to(class_cost))
            .route("/{id}/enrollments", web::get().to(list_enrollments))
            .route("/{id}/enroll", web::post().to(enroll))
            .route("/{id}/drop", web::post().to(drop_enrollment)),
    );
}
