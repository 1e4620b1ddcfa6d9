use serde::{Deserialize, Serialize};

/// Body of `POST /api/solve`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolveRequest {
    /// Base64 image data. A `data:<mime>;base64,` prefix is tolerated.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// The envelope returned to the UI regardless of which model answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResult {
    pub content: Vec<ContentBlock>,
}

impl SolveResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
