use crate::middlewares::CurrentProfile;
use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body = RecordPaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment recorded", body = Payment),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn record_payment(
    payment_service: web::Data<PaymentService>,
    profile: CurrentProfile,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .record_payment(&profile.0, request.into_inner())
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
    path = "/payments",
    tag = "payments",
    params(
        ("student_id" = Option<i64>, Query, description = "Filter by student (staff only)"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated payments"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
    profile: CurrentProfile,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    match payment_service.list_payments(&profile.0, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payments_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(record_payment))
            .route("", web::get().to(list_payments)),
    );
}
