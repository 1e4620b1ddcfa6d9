pub mod client;
pub mod fallback;
pub mod normalizer;

use crate::models::GenerateContentRequest;
use async_trait::async_trait;
use std::fmt;

pub use client::GeminiClient;
pub use fallback::{FallbackOutcome, ModelFallback};
pub use normalizer::normalize;

/// A response the provider actually sent back, successful or not.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ProviderReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An attempt that never produced a readable reply: connection failures, or a
/// body that was not JSON. `status` is set when the provider did answer.
#[derive(Debug, Clone)]
pub struct ProviderFault {
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for ProviderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProviderFault {}

#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Sends one `generateContent` call for `model`.
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> std::result::Result<ProviderReply, ProviderFault>;

    fn name(&self) -> &str {
        "generative provider"
    }
}
