use crate::error::AppResult;
use crate::external::StripeService;
use crate::external::stripe::{CheckoutSession, WebhookEvent};
use crate::services::LessonPackService;
use actix_web::{HttpRequest, HttpResponse, Result, web};
use log::{error, info, warn};

/// Stripe webhook endpoint. Payment status updates arrive here; the only
/// event acted on today is checkout completion, which creates the lesson
/// pack purchase.
pub async fn stripe_webhook(
    req: HttpRequest,
    body: web::Bytes,
    stripe_service: web::Data<StripeService>,
    lesson_pack_service: web::Data<LessonPackService>,
) -> Result<HttpResponse> {
    let signature = match req.headers().get("stripe-signature") {
        Some(sig) => sig.to_str().unwrap_or(""),
        None => {
            warn!("Missing Stripe-Signature header");
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Missing Stripe-Signature header"
            })));
        }
    };

    let payload = std::str::from_utf8(&body).map_err(|_| {
        error!("Invalid UTF-8 in webhook payload");
        actix_web::error::ErrorBadRequest("Invalid payload encoding")
    })?;

    let event = match stripe_service.parse_webhook_event(payload, signature) {
        Ok(event) => event,
        Err(e) => {
            error!("Webhook signature verification failed: {e}");
            return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid signature"
            })));
        }
    };

    info!(
        "Received Stripe webhook event: {} ({})",
        event.event_type, event.id
    );

    match handle_stripe_event(event, &lesson_pack_service).await {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "received": true
        }))),
        Err(e) => {
            error!("Failed to process webhook event: {e}");
            // acknowledge with 200 so Stripe does not retry; the failure is
            // in the log
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "received": true,
                "error": format!("Processing failed: {}", e)
            })))
        }
    }
}

async fn handle_stripe_event(
    event: WebhookEvent,
    lesson_pack_service: &LessonPackService,
) -> AppResult<()> {
    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: CheckoutSession = serde_json::from_value(event.data.object)?;
            lesson_pack_service.handle_checkout_completed(&session).await
        }
        "checkout.session.expired" => {
            if let Some(id) = event.data.object.get("id").and_then(|v| v.as_str()) {
                info!("Checkout session {id} expired without payment");
            }
            Ok(())
        }
        _ => {
            info!("Unhandled event type: {}", event.event_type);
            Ok(())
        }
    }
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhook").route("/stripe", web::post().to(stripe_webhook)));
}
