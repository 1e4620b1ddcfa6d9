use std::env;

use crate::{
    error::{RelayError, Result},
    logger::LoggerConfig,
    models::GenerationConfig,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const MIN_REQUEST_INTERVAL_MS: u64 = 2000;
pub const JSON_BODY_LIMIT: usize = 50 * 1024 * 1024;

pub const API_KEY_ENV: &str = "VITE_GOOGLE_API_KEY";
pub const API_KEY_FALLBACK_ENV: &str = "GOOGLE_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Tried in this order until one answers.
pub const DEFAULT_MODELS: [&str; 3] = [
    "gemini-3-flash",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
];

pub const SOLVE_PROMPT: &str = "Please analyze this image and solve any mathematical problems you find.

Provide your response in the following format:
1. First, clearly state what math problem(s) you identified
2. Then show the step-by-step solution
3. Finally, provide the final answer

Be thorough in your explanations and show all work.";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: Vec<String>,
    pub prompt: String,
    pub generation: GenerationConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            prompt: SOLVE_PROMPT.to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                env::var(API_KEY_FALLBACK_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            });

        GeminiConfig {
            api_key,
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// The configured credential, treating an empty string as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub json_body_limit: usize,
    pub min_request_interval_ms: u64,
    pub gemini: GeminiConfig,
    pub logger: LoggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            json_body_limit: JSON_BODY_LIMIT,
            min_request_interval_ms: MIN_REQUEST_INTERVAL_MS,
            gemini: GeminiConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Config {
            host,
            port,
            gemini: GeminiConfig::from_env(),
            logger: LoggerConfig::from_env(),
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_min_request_interval_ms(mut self, interval_ms: u64) -> Self {
        self.min_request_interval_ms = interval_ms;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_logger(mut self, config: LoggerConfig) -> Self {
        self.logger = config;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gemini.models.is_empty() {
            return Err(RelayError::ConfigError(
                "At least one model identifier is required".into(),
            ));
        }
        if self.gemini.models.iter().any(|model| model.trim().is_empty()) {
            return Err(RelayError::ConfigError(
                "Model identifiers must not be blank".into(),
            ));
        }
        if self.gemini.base_url.is_empty() {
            return Err(RelayError::ConfigError("Provider base URL is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.port, 3001);
        assert_eq!(config.min_request_interval_ms, 2000);
        assert_eq!(
            config.gemini.models,
            vec!["gemini-3-flash", "gemini-2.5-flash", "gemini-2.5-flash-lite"]
        );
        assert!(!config.gemini.has_credential());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let gemini = GeminiConfig::new()
            .with_api_key("secret")
            .with_base_url("http://127.0.0.1:9000/v1beta/")
            .with_models(["only-model"]);
        assert_eq!(gemini.credential(), Some("secret"));
        assert_eq!(gemini.base_url, "http://127.0.0.1:9000/v1beta");
        assert_eq!(gemini.models, vec!["only-model".to_string()]);

        let config = Config::new().with_port(8080).with_host("127.0.0.1");
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_empty_credential_is_absent() {
        let gemini = GeminiConfig::new().with_api_key("");
        assert_eq!(gemini.credential(), None);
    }

    #[test]
    fn test_empty_model_list_rejected() {
        let config = Config::new().with_gemini(GeminiConfig::new().with_models(Vec::<String>::new()));
        assert!(matches!(config.validate(), Err(RelayError::ConfigError(_))));
    }
}
