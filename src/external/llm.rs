use crate::config::LlmConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

const FORMAT_PROMPT: &str = "You clean up dance instructors' shorthand lesson notes. \
Fix spelling and punctuation, expand abbreviations, and keep the original meaning. \
Reply with the cleaned note only.";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Clone)]
pub struct LlmService {
    client: Client,
    config: LlmConfig,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn base_url(&self) -> &str {
        if self.config.base_url.is_empty() {
            "https://api.openai.com/v1"
        } else {
            &self.config.base_url
        }
    }

    fn model(&self) -> &str {
        if self.config.model.is_empty() {
            "gpt-4o-mini"
        } else {
            &self.config.model
        }
    }

    /// Cleans up a raw lesson note and returns the rewritten text.
    pub async fn format_note(&self, raw: &str) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.base_url());

        let body = json!({
            "model": self.model(),
            "messages": [
                { "role": "system", "content": FORMAT_PROMPT },
                { "role": "user", "content": raw }
            ]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            let completion: ChatCompletionResponse = response.json().await?;
            let content = completion
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| {
                    AppError::ExternalApiError("Completion returned no choices".to_string())
                })?;
            Ok(content.trim().to_string())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Note formatting failed: {error_text}"
            )))
        }
    }

    /// Transcribes a voice memo the provider can fetch by URL.
    pub async fn transcribe(&self, audio_url: &str) -> AppResult<String> {
        let url = format!("{}/audio/transcriptions", self.base_url());

        let body = json!({
            "model": self.model(),
            "audio_url": audio_url
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            let transcription: TranscriptionResponse = response.json().await?;
            Ok(transcription.text)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Transcription failed: {error_text}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_completion_deserialization() {
        let body = r#"{
            "choices": [
                { "message": { "role": "assistant", "content": "Worked on spotting during pirouettes." } }
            ]
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content,
            "Worked on spotting during pirouettes."
        );
    }

    #[test]
    fn test_transcription_deserialization() {
        let body = r#"{ "text": "Maya nailed the triple today." }"#;
        let parsed: TranscriptionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text, "Maya nailed the triple today.");
    }
}
