use crate::request::Response;

/// Terminal failure delivered to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// No usable response was obtained and the retry budget is spent (or retry was off).
    #[error("Network error")]
    Network,
    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    HttpStatus(u16),
    /// The response was successful but the body did not parse in the requested mode.
    #[error("decode error: {0}")]
    Decode(String),
    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl RequestError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, RequestError::Network)
    }
}

/// The single outcome produced for every submitted request.
pub type TerminalResult = Result<Response, RequestError>;
