use crate::config::MailthreadConfig;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadSummary {
    pub id: String,
    pub subject: String,
    pub sender_name: Option<String>,
    pub sender_email: String,
    pub snippet: Option<String>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ThreadListResponse {
    threads: Vec<ThreadSummary>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    body: &'a str,
}

/// Client for the email-thread provider backing studio inquiry inboxes.
#[derive(Clone)]
pub struct MailthreadService {
    client: Client,
    config: MailthreadConfig,
}

impl MailthreadService {
    pub fn new(config: MailthreadConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn base_url(&self) -> &str {
        if self.config.base_url.is_empty() {
            "https://api.mailthread.io"
        } else {
            &self.config.base_url
        }
    }

    /// Lists inbox threads received after `since` (all threads when `None`).
    pub async fn list_threads(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<ThreadSummary>> {
        let mut url = format!(
            "{}/v1/inboxes/{}/threads",
            self.base_url(),
            self.config.inbox
        );
        if let Some(since) = since {
            url.push_str(&format!("?since={}", since.to_rfc3339()));
        }

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            let list: ThreadListResponse = response.json().await?;
            Ok(list.threads)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            log::error!("Failed to list inbox threads: {error_text}");
            Err(AppError::ExternalApiError(format!(
                "Failed to list inbox threads: {error_text}"
            )))
        }
    }

    pub async fn send_reply(&self, thread_id: &str, body: &str) -> AppResult<()> {
        let url = format!("{}/v1/threads/{}/messages", self.base_url(), thread_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&SendMessageRequest { body })
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Reply sent on thread {thread_id}");
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            log::error!("Failed to send reply on thread {thread_id}: {error_text}");
            Err(AppError::ExternalApiError(format!(
                "Failed to send reply: {error_text}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_list_deserialization() {
        let body = r#"{
            "threads": [
                {
                    "id": "thr_01",
                    "subject": "Trial class for my daughter",
                    "sender_name": "Pat Nguyen",
                    "sender_email": "pat@example.com",
                    "snippet": "Hi, do you offer trial classes for 8 year olds?",
                    "received_at": "2025-07-14T15:02:00Z"
                }
            ]
        }"#;
        let list: ThreadListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(list.threads.len(), 1);
        assert_eq!(list.threads[0].sender_email, "pat@example.com");
    }
}
