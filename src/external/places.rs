use crate::config::PlacesConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlacePrediction {
    pub description: String,
    pub place_id: String,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    predictions: Vec<PlacePrediction>,
}

#[derive(Clone)]
pub struct PlacesService {
    client: Client,
    config: PlacesConfig,
}

impl PlacesService {
    pub fn new(config: PlacesConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn base_url(&self) -> &str {
        if self.config.base_url.is_empty() {
            "https://places.googleapis.com/v1"
        } else {
            &self.config.base_url
        }
    }

    pub async fn autocomplete(&self, input: &str) -> AppResult<Vec<PlacePrediction>> {
        let url = format!("{}/autocomplete", self.base_url());

        let response = self
            .client
            .get(&url)
            .query(&[("input", input), ("key", &self.config.api_key)])
            .send()
            .await?;

        if response.status().is_success() {
            let body: AutocompleteResponse = response.json().await?;
            Ok(body.predictions)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Address autocomplete failed: {error_text}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autocomplete_deserialization() {
        let body = r#"{
            "predictions": [
                { "description": "312 W 36th St, New York, NY", "place_id": "ChIJd8BlQ2BZwokRAFUEcm_qrcA" },
                { "description": "312 W 36th Ave, Anchorage, AK", "place_id": "ChIJN1t_tDeuEmsRUsoyG83frY4" }
            ]
        }"#;
        let parsed: AutocompleteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.predictions.len(), 2);
        assert_eq!(
            parsed.predictions[0].place_id,
            "ChIJd8BlQ2BZwokRAFUEcm_qrcA"
        );
    }
}
