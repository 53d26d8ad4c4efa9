use super::DecodeMode;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Raw(Vec<u8>),
}

impl Payload {
    /// Decode `body` in the requested mode. JSON mode is strict: an empty body is an error.
    pub fn decode(mode: DecodeMode, body: Vec<u8>) -> Result<Self, serde_json::Error> {
        match mode {
            DecodeMode::Json => serde_json::from_slice(&body).map(Payload::Json),
            DecodeMode::Raw => Ok(Payload::Raw(body)),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Raw(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Raw(b) => Some(b),
            Payload::Json(_) => None,
        }
    }

    /// Human-readable rendering: pretty JSON, or the raw body as lossy UTF-8.
    pub fn to_text(&self) -> String {
        match self {
            Payload::Json(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
            Payload::Raw(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

/// A successful terminal outcome: the payload and the status it arrived with.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub payload: Payload,
}
