use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

const API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub payment_status: Option<String>,
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

#[derive(Clone)]
pub struct StripeService {
    client: Client,
    config: StripeConfig,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Creates a hosted checkout session for a one-time lesson pack sale.
    /// `metadata` is echoed back on the completion webhook and drives
    /// purchase creation there.
    pub async fn create_checkout_session(
        &self,
        product_name: &str,
        amount: i64,
        client_reference_id: &str,
        metadata: &[(&str, String)],
    ) -> AppResult<CheckoutSession> {
        let url = format!("{API_BASE}/checkout/sessions");

        let success_url = self
            .config
            .success_url
            .clone()
            .unwrap_or_else(|| "https://dancedesk.app/checkout/success".to_string());
        let cancel_url = self
            .config
            .cancel_url
            .clone()
            .unwrap_or_else(|| "https://dancedesk.app/checkout/cancel".to_string());

        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), success_url),
            ("cancel_url".to_string(), cancel_url),
            (
                "client_reference_id".to_string(),
                client_reference_id.to_string(),
            ),
            (
                "line_items[0][price_data][currency]".to_string(),
                "usd".to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                product_name.to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                amount.to_string(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];
        for (key, value) in metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await?;

        if response.status().is_success() {
            let session: CheckoutSession = response.json().await?;
            Ok(session)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to create checkout session: {error_text}"
            )))
        }
    }

    pub async fn retrieve_checkout_session(&self, session_id: &str) -> AppResult<CheckoutSession> {
        let url = format!("{API_BASE}/checkout/sessions/{session_id}");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        if response.status().is_success() {
            let session: CheckoutSession = response.json().await?;
            Ok(session)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to retrieve checkout session: {error_text}"
            )))
        }
    }

    /// Parses the `Stripe-Signature` header and the event payload.
    ///
    /// TODO: verify the v1 signature HMAC against `webhook_secret` instead of
    /// only requiring the header to be well-formed.
    pub fn parse_webhook_event(&self, payload: &str, signature: &str) -> AppResult<WebhookEvent> {
        let (timestamp, v1) = parse_signature_header(signature)
            .ok_or_else(|| AppError::AuthError("Malformed Stripe-Signature header".to_string()))?;

        if timestamp.is_empty() || v1.is_empty() {
            return Err(AppError::AuthError("Invalid webhook signature".to_string()));
        }
        if self.config.webhook_secret.is_empty() {
            return Err(AppError::AuthError(
                "Webhook secret is not configured".to_string(),
            ));
        }

        let event: WebhookEvent = serde_json::from_str(payload)?;
        Ok(event)
    }
}

/// Splits `t=...,v1=...` into its timestamp and signature parts.
fn parse_signature_header(header: &str) -> Option<(String, String)> {
    let mut timestamp = None;
    let mut v1 = None;
    for part in header.split(',') {
        let (key, value) = part.trim().split_once('=')?;
        match key {
            "t" => timestamp = Some(value.to_string()),
            "v1" => v1 = Some(value.to_string()),
            _ => {}
        }
    }
    Some((timestamp?, v1?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signature_header() {
        let (t, v1) = parse_signature_header("t=1712800000,v1=abc123def").unwrap();
        assert_eq!(t, "1712800000");
        assert_eq!(v1, "abc123def");

        assert!(parse_signature_header("garbage").is_none());
        assert!(parse_signature_header("t=123").is_none());
    }

    #[test]
    fn test_webhook_event_deserialization() {
        let payload = r#"{
            "id": "evt_123",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_456",
                    "payment_status": "paid",
                    "metadata": { "category": "lesson_pack", "pack_id": "7" }
                }
            }
        }"#;
        let event: WebhookEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.data.object["id"], "cs_test_456");
    }

    #[test]
    fn test_checkout_session_deserialization() {
        let body = r#"{
            "id": "cs_test_789",
            "url": "https://checkout.stripe.com/c/pay/cs_test_789",
            "payment_status": "unpaid",
            "amount_total": 32500,
            "metadata": { "student_id": "12" }
        }"#;
        let session: CheckoutSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.id, "cs_test_789");
        assert_eq!(session.amount_total, Some(32500));
        assert_eq!(session.metadata["student_id"], "12");
    }
}
