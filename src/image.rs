use base64::{engine::general_purpose::STANDARD, Engine as _};

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

const DATA_URI_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

// Enough base64 characters to cover the longest signature below (12 bytes).
const SNIFF_CHARS: usize = 24;

/// Image data as it will be sent inline to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: String,
    pub mime_type: String,
}

impl ImagePayload {
    /// Builds the payload from what the browser uploaded.
    ///
    /// The declared MIME type comes from a `data:` URI prefix when present, then
    /// from an explicit `image/*` type, then from the leading bytes. Anything
    /// unrecognised is declared as JPEG. The data itself is never validated.
    pub fn from_upload(image: &str, declared: Option<&str>) -> Self {
        if let Some((mime_type, data)) = split_data_uri(image) {
            return Self {
                data: data.to_string(),
                mime_type: mime_type.to_string(),
            };
        }

        let mime_type = declared
            .map(str::trim)
            .filter(|mime| mime.starts_with("image/"))
            .map(str::to_string)
            .or_else(|| sniff_mime_type(image).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        Self {
            data: image.to_string(),
            mime_type,
        }
    }
}

fn split_data_uri(image: &str) -> Option<(&str, &str)> {
    let rest = image.strip_prefix(DATA_URI_PREFIX)?;
    let marker = rest.find(BASE64_MARKER)?;
    let mime_type = &rest[..marker];
    if !mime_type.starts_with("image/") {
        return None;
    }
    Some((mime_type, &rest[marker + BASE64_MARKER.len()..]))
}

/// Guesses the image type from its first bytes.
pub fn sniff_mime_type(base64_data: &str) -> Option<&'static str> {
    let head: String = base64_data
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(SNIFF_CHARS)
        .collect();
    if !head.is_ascii() {
        return None;
    }
    let usable = head.len() - head.len() % 4;
    let bytes = STANDARD.decode(&head[..usable]).ok()?;

    match bytes.as_slice() {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        _ => None,
    }
}
