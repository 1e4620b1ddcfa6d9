use std::sync::Arc;

use crate::{
    config::{Config, GeminiConfig, API_KEY_ENV},
    error::{RelayError, Result},
    gemini::{normalize, GeminiClient, GenerativeProvider, ModelFallback},
    image::ImagePayload,
    logger,
    models::{GenerateContentRequest, SolveRequest, SolveResult},
    rate_gate::{Clock, RateGate, SystemClock},
};

/// Turns one uploaded image into one solution.
///
/// Checks run in a fixed order and each one short-circuits before the provider
/// is contacted: image present, rate gate, credential. Only then is the model
/// fallback sequence run and the winning body normalised.
pub struct SolveRelay {
    gemini: GeminiConfig,
    gate: RateGate,
    fallback: ModelFallback,
    provider: Arc<dyn GenerativeProvider>,
    clock: Arc<dyn Clock>,
}

impl SolveRelay {
    pub fn new(config: &Config, provider: Arc<dyn GenerativeProvider>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            gemini: config.gemini.clone(),
            gate: RateGate::new(config.min_request_interval_ms),
            fallback: ModelFallback::new(config.gemini.models.clone())?,
            provider,
            clock: Arc::new(SystemClock),
        })
    }

    /// Relay backed by the real Gemini HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GeminiClient::from_config(&config.gemini);
        Self::new(config, Arc::new(client))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn models(&self) -> &[String] {
        self.fallback.models()
    }

    pub async fn solve(&self, request: SolveRequest) -> Result<SolveResult> {
        let request_id = uuid::Uuid::new_v4().simple().to_string();
        let request_id = &request_id[..8];

        let image = request
            .image
            .as_deref()
            .filter(|image| !image.is_empty())
            .ok_or(RelayError::MissingImage)?;

        let decision = self.gate.try_acquire(self.clock.now_ms());
        if let Some(wait_secs) = decision.wait_secs() {
            log::warn!("[{}] Rate limited: {:?}", request_id, decision);
            return Err(RelayError::RateLimited { wait_secs });
        }

        let api_key = self.gemini.credential().ok_or_else(|| {
            log::error!("[{}] Google API key is missing!", request_id);
            RelayError::MissingCredential(API_KEY_ENV.to_string())
        })?;

        let payload = ImagePayload::from_upload(image, request.mime_type.as_deref());
        log::debug!(
            "[{}] Image payload: {} base64 chars declared as {}",
            request_id,
            payload.data.len(),
            payload.mime_type
        );

        let generate = GenerateContentRequest::with_image(
            &self.gemini.prompt,
            &payload.mime_type,
            &payload.data,
            self.gemini.generation,
        );

        log::info!("[{}] Sending request to {}...", request_id, self.provider.name());
        let _timer = logger::timer(&format!("[{}] solve", request_id));

        let outcome = self
            .fallback
            .run(self.provider.as_ref(), api_key, &generate, request_id)
            .await?;

        log::debug!(
            "[{}] Response from {} (status {}): {}",
            request_id,
            outcome.model,
            outcome.reply.status,
            outcome.reply.body
        );

        let result = normalize(&outcome.reply.body)?;
        log::info!(
            "[{}] Successfully received solution from {} after {} attempt(s)",
            request_id,
            outcome.model,
            outcome.attempts
        );
        Ok(result)
    }
}
