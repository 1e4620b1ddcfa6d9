use crate::{
    error::{RelayError, Result},
    models::{GenerateContentResponse, SolveResult},
};

/// Pulls `candidates[0].content.parts[0].text` out of a successful body.
pub fn normalize(body: &serde_json::Value) -> Result<SolveResult> {
    let response: GenerateContentResponse = serde_json::from_value(body.clone())
        .map_err(|e| RelayError::MalformedResponse(e.to_string()))?;

    let candidates = response.candidates.unwrap_or_default();
    let first = candidates.first().ok_or(RelayError::NoCandidates)?;

    match first.first_text() {
        Some(text) if !text.is_empty() => Ok(SolveResult::text(text)),
        _ => {
            log::error!(
                "No text content in response (finish reason: {})",
                first.finish_reason.as_deref().unwrap_or("unknown")
            );
            Err(RelayError::NoSolutionText)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentBlock;
    use serde_json::json;

    #[test]
    fn test_extracts_first_text() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": "x = 5"}, {"text": "ignored"}]}}]});
        let result = normalize(&body).unwrap();
        assert_eq!(
            result.content,
            vec![ContentBlock::Text {
                text: "x = 5".into()
            }]
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"content": [{"type": "text", "text": "x = 5"}]})
        );
    }

    #[test]
    fn test_same_body_same_envelope() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": "2x + 3 = 13, x = 5"}]}}]});
        assert_eq!(normalize(&body).unwrap(), normalize(&body).unwrap());
    }

    #[test]
    fn test_missing_or_empty_candidates() {
        assert!(matches!(normalize(&json!({"candidates": []})), Err(RelayError::NoCandidates)));
        assert!(matches!(
            normalize(&json!({"promptFeedback": {"blockReason": "SAFETY"}})),
            Err(RelayError::NoCandidates)
        ));
        assert!(matches!(normalize(&json!({"candidates": null})), Err(RelayError::NoCandidates)));
    }

    #[test]
    fn test_missing_or_empty_text() {
        assert!(matches!(
            normalize(&json!({"candidates": [{"finishReason": "SAFETY"}]})),
            Err(RelayError::NoSolutionText)
        ));
        assert!(matches!(
            normalize(&json!({"candidates": [{"content": {"parts": []}}]})),
            Err(RelayError::NoSolutionText)
        ));
        assert!(matches!(
            normalize(&json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]})),
            Err(RelayError::NoSolutionText)
        ));
    }

    #[test]
    fn test_unreadable_shape() {
        assert!(matches!(
            normalize(&json!({"candidates": "nope"})),
            Err(RelayError::MalformedResponse(_))
        ));
    }
}
