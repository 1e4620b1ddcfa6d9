use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String, // Base64 encoded
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_k: 32,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }
}

impl GenerateContentRequest {
    pub fn with_image(
        prompt: &str,
        mime_type: &str,
        data: &str,
        generation_config: GenerationConfig,
    ) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text {
                        text: prompt.to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: data.to_string(),
                        },
                    },
                ],
            }],
            generation_config,
        }
    }
}

// Response side. Every field is optional: the relay only trusts what it checks.

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl Candidate {
    pub fn first_text(&self) -> Option<&str> {
        self.content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderErrorEnvelope {
    #[serde(default)]
    pub error: Option<ProviderErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ProviderErrorEnvelope {
    /// `error` of a failed provider body; empty when the body has none.
    pub fn detail_of(body: &serde_json::Value) -> ProviderErrorDetail {
        let mut detail = serde_json::from_value::<ProviderErrorEnvelope>(body.clone())
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_default();
        detail.message = detail.message.filter(|message| !message.is_empty());
        detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request =
            GenerateContentRequest::with_image("solve", "image/png", "AAAA", Default::default());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "solve");
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(value["contents"][0]["parts"][1]["inline_data"]["data"], "AAAA");
        assert_eq!(value["generationConfig"]["topK"], 32);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(value["generationConfig"]["topP"], 1.0);
    }

    #[test]
    fn test_provider_error_message() {
        let body = json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}});
        assert_eq!(
            ProviderErrorEnvelope::detail_of(&body).message.as_deref(),
            Some("Quota exceeded")
        );
        assert_eq!(ProviderErrorEnvelope::detail_of(&json!({"oops": true})).message, None);
        assert_eq!(ProviderErrorEnvelope::detail_of(&json!("text")).message, None);
        assert_eq!(
            ProviderErrorEnvelope::detail_of(&json!({"error": {"message": ""}})).message,
            None
        );
    }

    #[test]
    fn test_provider_error_status() {
        let body = json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}});
        let detail = ProviderErrorEnvelope::detail_of(&body);
        assert_eq!(detail.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
        assert_eq!(detail.message.as_deref(), Some("Quota exceeded"));

        let detail = ProviderErrorEnvelope::detail_of(&json!({"error": "flat string"}));
        assert!(detail.status.is_none());
        assert!(detail.message.is_none());
    }

    #[test]
    fn test_first_text() {
        let candidate: Candidate =
            serde_json::from_value(json!({"content": {"parts": [{"text": "x = 5"}]}})).unwrap();
        assert_eq!(candidate.first_text(), Some("x = 5"));

        let candidate: Candidate =
            serde_json::from_value(json!({"finishReason": "SAFETY"})).unwrap();
        assert_eq!(candidate.first_text(), None);
    }
}
