use crate::middlewares::{AuthIdentity, CurrentProfile};
use crate::models::{ProfileResponse, RegisterProfileRequest, UpdateProfileRequest};
use crate::services::AuthService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Invalid input or profile already exists"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    identity: AuthIdentity,
    request: web::Json<RegisterProfileRequest>,
) -> Result<HttpResponse> {
    match auth_service
        .register_profile(&identity, request.into_inner())
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
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(profile: CurrentProfile) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": ProfileResponse::from(profile.0)
    })))
}

#[utoipa::path(
    put,
    path = "/auth/me",
    tag = "auth",
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_me(
    auth_service: web::Data<AuthService>,
    profile: CurrentProfile,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    match auth_service
        .update_profile(profile.0.id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/me", web::get().to(me))
            .route("/me", web::put().to(update_me)),
    );
}
