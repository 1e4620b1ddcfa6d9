use super::{GenerativeProvider, ProviderFault, ProviderReply};
use crate::{config::GeminiConfig, models::GenerateContentRequest};
use async_trait::async_trait;
use reqwest::Client;

/// `generateContent` over HTTPS. The credential travels as the `key` query parameter.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<ProviderReply, ProviderFault> {
        let url = self.endpoint(model);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderFault {
                status: e.status().map(|s| s.as_u16()),
                message: e.without_url().to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ProviderFault {
            status: Some(status),
            message: e.without_url().to_string(),
        })?;

        let body = serde_json::from_str(&text).map_err(|e| ProviderFault {
            status: Some(status),
            message: format!("invalid JSON response body: {}", e),
        })?;

        Ok(ProviderReply { status, body })
    }

    fn name(&self) -> &str {
        "Google Gemini API"
    }
}
