use crate::middlewares::CurrentProfile;
use crate::models::*;
use crate::services::StudioService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/studios/current",
    tag = "studios",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's studio", body = Studio),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_current(
    studio_service: web::Data<StudioService>,
    profile: CurrentProfile,
) -> Result<HttpResponse> {
    match studio_service.get_current(&profile.0).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/studios/current",
    tag = "studios",
    request_body = UpdateStudioRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Studio updated", body = Studio),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn update_current(
    studio_service: web::Data<StudioService>,
    profile: CurrentProfile,
    request: web::Json<UpdateStudioRequest>,
) -> Result<HttpResponse> {
    match studio_service
        .update_current(&profile.0, request.into_inner())
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
    path = "/studios/address-autocomplete",
    tag = "studios",
    params(("query" = String, Query, description = "Partial address")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Address predictions"),
        (status = 502, description = "Autocomplete provider unavailable")
    )
)]
pub async fn address_autocomplete(
    studio_service: web::Data<StudioService>,
    _profile: CurrentProfile,
    query: web::Query<AddressAutocompleteQuery>,
) -> Result<HttpResponse> {
    match studio_service.address_autocomplete(&query.query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/studios/inquiries/sync",
    tag = "studios",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inbox threads pulled into inquiries", body = InquirySyncResponse),
        (status = 502, description = "Email provider unavailable")
    )
)]
pub async fn sync_inquiries(
    studio_service: web::Data<StudioService>,
    profile: CurrentProfile,
) -> Result<HttpResponse> {
    match studio_service.sync_inquiries(&profile.0).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/studios/inquiries",
    tag = "studios",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated inquiries"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_inquiries(
    studio_service: web::Data<StudioService>,
    profile: CurrentProfile,
    query: web::Query<InquiryQuery>,
) -> Result<HttpResponse> {
    match studio_service.list_inquiries(&profile.0, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/studios/inquiries/{id}/reply",
    tag = "studios",
    params(("id" = i64, Path, description = "Inquiry id")),
    request_body = ReplyInquiryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reply sent", body = StudioInquiry),
        (status = 404, description = "Not found"),
        (status = 502, description = "Email provider unavailable")
    )
)]
pub async fn reply_to_inquiry(
    studio_service: web::Data<StudioService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
    request: web::Json<ReplyInquiryRequest>,
) -> Result<HttpResponse> {
    match studio_service
        .reply_to_inquiry(&profile.0, path.into_inner(), request.into_inner())
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
    path = "/studios/inquiries/{id}/close",
    tag = "studios",
    params(("id" = i64, Path, description = "Inquiry id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inquiry closed", body = StudioInquiry),
        (status = 404, description = "Not found")
    )
)]
pub async fn close_inquiry(
    studio_service: web::Data<StudioService>,
    profile: CurrentProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match studio_service
        .close_inquiry(&profile.0, path.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn studios_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/studios")
            .route("/current", web::get().to(get_current))
            .route("/current", web::put().to(update_current))
            .route("/address-autocomplete", web::get().to(address_autocomplete))
            .route("/inquiries/sync", web::post().to(sync_inquiries))
            .route("/inquiries", web::get().to(list_inquiries))
            .route("/inquiries/{id}/reply", web::post().to(reply_to_inquiry))
            .route("/inquiries/{id}/close", web::post().to(close_inquiry)),
    );
}
