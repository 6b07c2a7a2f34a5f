use crate::middlewares::CurrentProfile;
use crate::models::*;
use crate::services::WaiverService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/waivers/templates",
    tag = "waivers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active templates for the caller's studio"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_templates(
    waiver_service: web::Data<WaiverService>,
    profile: CurrentProfile,
) -> Result<HttpResponse> {
    match waiver_service.list_templates(&profile.0).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/waivers/templates",
    tag = "waivers",
    request_body = CreateWaiverTemplateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Template created", body = WaiverTemplate),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_template(
    waiver_service: web::Data<WaiverService>,
    profile: CurrentProfile,
    request: web::Json<CreateWaiverTemplateRequest>,
) -> Result<HttpResponse> {
    match waiver_service
        .create_template(&profile.0, request.into_inner())
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
    path = "/waivers/templates/{id}",
    tag = "waivers",
    params(("id" = i64, Path, description = "Template id")),
    request_body = UpdateWaiverTemplateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Template updated", body = WaiverTemplate),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_template(
    waiver_service: web::Data<WaiverService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
    request: web::Json<UpdateWaiverTemplateRequest>,
) -> Result<HttpResponse> {
    match waiver_service
        .update_template(&profile.0, path.into_inner(), request.into_inner())
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
    path = "/waivers/templates/{id}/signatures",
    tag = "waivers",
    params(("id" = i64, Path, description = "Template id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Signatures on the template"),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_signatures(
    waiver_service: web::Data<WaiverService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match waiver_service
        .list_signatures(&profile.0, path.into_inner())
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
    path = "/waivers/sign",
    tag = "waivers",
    request_body = SignWaiverRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Waiver signed", body = Waiver),
        (status = 400, description = "Already signed"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn sign_waiver(
    waiver_service: web::Data<WaiverService>,
    profile: CurrentProfile,
    request: web::Json<SignWaiverRequest>,
) -> Result<HttpResponse> {
    match waiver_service.sign(&profile.0, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn waivers_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/waivers")
            .route("/templates", web::get().to(list_templates))
            .route("/templates", web::post().to(create_template))
            .route("/templates/{id}", web::put().to(update_template))
            .route("/templates/{id}/signatures", web::get().to(list_signatures))
            .route("/sign", web::post().to(sign_waiver)),
    );
}
