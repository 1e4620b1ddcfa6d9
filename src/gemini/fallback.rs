use super::{GenerativeProvider, ProviderFault, ProviderReply};
use crate::{
    error::{RelayError, Result},
    models::{GenerateContentRequest, ProviderErrorEnvelope},
};

pub const ALL_MODELS_FAILED: &str = "All API models failed";

/// The reply that ended the sequence and who produced it.
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub model: String,
    pub attempts: usize,
    pub reply: ProviderReply,
}

#[derive(Debug)]
enum AttemptFailure {
    Rejected { message: Option<String> },
    Fault(ProviderFault),
}

/// Tries each model in order and stops at the first successful status.
#[derive(Debug, Clone)]
pub struct ModelFallback {
    models: Vec<String>,
}

impl ModelFallback {
    pub fn new(models: Vec<String>) -> Result<Self> {
        if models.is_empty() {
            return Err(RelayError::ConfigError(
                "Model fallback list must not be empty".into(),
            ));
        }
        Ok(Self { models })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub async fn run(
        &self,
        provider: &dyn GenerativeProvider,
        api_key: &str,
        request: &GenerateContentRequest,
        request_id: &str,
    ) -> Result<FallbackOutcome> {
        let mut last_failure: Option<AttemptFailure> = None;
        let mut last_status: Option<u16> = None;

        for (index, model) in self.models.iter().enumerate() {
            log::info!("[{}] Trying model: {}", request_id, model);

            match provider.generate_content(api_key, model, request).await {
                Ok(reply) if reply.is_success() => {
                    log::info!("[{}] Success with model: {}", request_id, model);
                    return Ok(FallbackOutcome {
                        model: model.clone(),
                        attempts: index + 1,
                        reply,
                    });
                }
                Ok(reply) => {
                    let detail = ProviderErrorEnvelope::detail_of(&reply.body);
                    log::warn!(
                        "[{}] Failed with {} (status {} {}): {}",
                        request_id,
                        model,
                        reply.status,
                        detail.status.as_deref().unwrap_or("-"),
                        detail.message.as_deref().unwrap_or("no error message")
                    );
                    let message = detail.message;
                    last_status = Some(reply.status);
                    last_failure = Some(AttemptFailure::Rejected { message });
                }
                Err(fault) => {
                    log::warn!("[{}] Error with {}: {}", request_id, model, fault);
                    if fault.status.is_some() {
                        last_status = fault.status;
                    }
                    last_failure = Some(AttemptFailure::Fault(fault));
                }
            }
        }

        let message = match last_failure {
            Some(AttemptFailure::Rejected {
                message: Some(message),
            }) => message,
            Some(AttemptFailure::Fault(fault)) if !fault.message.is_empty() => fault.message,
            _ => ALL_MODELS_FAILED.to_string(),
        };

        log::error!(
            "[{}] All {} models failed. Last error: {}",
            request_id,
            self.models.len(),
            message
        );

        Err(RelayError::ModelsExhausted {
            status: last_status,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::testing::{fault, rejected, reply, solved, FakeProvider};
    use crate::models::GenerationConfig;
    use serde_json::json;

    fn models() -> Vec<String> {
        vec!["first".into(), "second".into(), "third".into()]
    }

    fn request() -> GenerateContentRequest {
        GenerateContentRequest::with_image("p", "image/jpeg", "AAAA", GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_first_success_stops_the_sequence() {
        let provider = FakeProvider::new(vec![solved("x = 5"), solved("unused")]);
        let fallback = ModelFallback::new(models()).unwrap();

        let outcome = fallback.run(&provider, "k", &request(), "t").await.unwrap();
        assert_eq!(outcome.model, "first");
        assert_eq!(outcome.attempts, 1);
        assert_eq!(provider.calls(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_success_on_kth_attempt() {
        let provider = FakeProvider::new(vec![
            rejected(404, "not found"),
            Err(fault(None, "connection reset")),
            solved("x = 5"),
        ]);
        let fallback = ModelFallback::new(models()).unwrap();

        let outcome = fallback.run(&provider, "k", &request(), "t").await.unwrap();
        assert_eq!(outcome.model, "third");
        assert_eq!(outcome.attempts, 3);
        assert_eq!(provider.calls(), vec!["first", "second", "third"]);
        assert_eq!(
            outcome.reply.body["candidates"][0]["content"]["parts"][0]["text"],
            "x = 5"
        );
    }

    #[tokio::test]
    async fn test_all_rejected_uses_last_message_and_status() {
        let provider = FakeProvider::new(vec![
            rejected(404, "model one gone"),
            rejected(500, "internal"),
            rejected(429, "quota exhausted"),
        ]);
        let fallback = ModelFallback::new(models()).unwrap();

        let err = fallback.run(&provider, "k", &request(), "t").await.unwrap_err();
        assert_eq!(provider.calls().len(), 3);
        match err {
            RelayError::ModelsExhausted { status, message } => {
                assert_eq!(status, Some(429));
                assert_eq!(message, "quota exhausted");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trailing_fault_keeps_earlier_status() {
        let provider = FakeProvider::new(vec![
            rejected(404, "not found"),
            rejected(403, "forbidden"),
            Err(fault(None, "dns failure")),
        ]);
        let fallback = ModelFallback::new(models()).unwrap();

        match fallback.run(&provider, "k", &request(), "t").await {
            Err(RelayError::ModelsExhausted { status, message }) => {
                assert_eq!(status, Some(403));
                assert_eq!(message, "dns failure");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_only_faults_default_to_server_error() {
        let provider = FakeProvider::new(vec![
            Err(fault(None, "timeout")),
            Err(fault(None, "timeout")),
            Err(fault(None, "refused")),
        ]);
        let fallback = ModelFallback::new(models()).unwrap();

        match fallback.run(&provider, "k", &request(), "t").await {
            Err(RelayError::ModelsExhausted { status, message }) => {
                assert_eq!(status, None);
                assert_eq!(message, "refused");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_generic_text() {
        let provider = FakeProvider::new(vec![reply(503, json!({"unexpected": true}))]);
        let fallback = ModelFallback::new(vec!["only".into()]).unwrap();

        match fallback.run(&provider, "k", &request(), "t").await {
            Err(RelayError::ModelsExhausted { status, message }) => {
                assert_eq!(status, Some(503));
                assert_eq!(message, ALL_MODELS_FAILED);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_same_request_sent_to_every_model() {
        let provider = FakeProvider::new(vec![rejected(404, "a"), solved("ok")]);
        let fallback = ModelFallback::new(models()).unwrap();
        fallback.run(&provider, "k", &request(), "t").await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            serde_json::to_value(&requests[0]).unwrap(),
            serde_json::to_value(&requests[1]).unwrap()
        );
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(ModelFallback::new(Vec::new()).is_err());
    }
}
