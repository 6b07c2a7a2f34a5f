use crate::middlewares::CurrentProfile;
use crate::models::*;
use crate::services::StudentService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    params(
        ("search" = Option<String>, Query, description = "Name substring filter"),
        ("level" = Option<String>, Query, description = "Level filter"),
        ("include_archived" = Option<bool>, Query, description = "Include archived students"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated roster"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_students(
    student_service: web::Data<StudentService>,
    profile: CurrentProfile,
    query: web::Query<StudentQuery>,
) -> Result<HttpResponse> {
    match student_service.list_students(&profile.0, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = CreateStudentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student created", body = Student),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_student(
    student_service: web::Data<StudentService>,
    profile: CurrentProfile,
    request: web::Json<CreateStudentRequest>,
) -> Result<HttpResponse> {
    match student_service
        .create_student(&profile.0, request.into_inner())
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
    path = "/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_student(
    student_service: web::Data<StudentService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match student_service
        .get_student(&profile.0, path.into_inner())
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
    path = "/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student id")),
    request_body = UpdateStudentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_student(
    student_service: web::Data<StudentService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
    request: web::Json<UpdateStudentRequest>,
) -> Result<HttpResponse> {
    match student_service
        .update_student(&profile.0, path.into_inner(), request.into_inner())
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
    path = "/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student archived"),
        (status = 404, description = "Not found")
    )
)]
pub async fn archive_student(
    student_service: web::Data<StudentService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match student_service
        .archive_student(&profile.0, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Student archived"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn students_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students")
            .route("", web::get().to(list_students))
            .route("", web::post().to(create_student))
            .route("/{id}", web::get().to(get_student))
            .route("/{id}", web::put().to(update_student))
            .route("/{id}", web::delete().to(archive_student)),
    );
}
