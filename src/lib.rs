pub mod config;
pub mod error;
pub mod gemini;
pub mod image;
pub mod logger;
pub mod models;
pub mod rate_gate;
pub mod relay;
pub mod server;

pub use config::{Config, GeminiConfig};
pub use error::{RelayError, Result};
pub use gemini::{GeminiClient, GenerativeProvider, ModelFallback, ProviderFault, ProviderReply};
pub use models::*;
pub use rate_gate::{Clock, GateDecision, RateGate, SystemClock};
pub use relay::SolveRelay;
