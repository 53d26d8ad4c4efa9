//! Classify response status codes for retry decisions.

/// What a received status code means for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx: decode the body and finish.
    Success,
    /// Status 0: the transport produced no real response (aborted, blocked, offline).
    NoStatus,
    /// Any other status: a definite answer that retrying will not change.
    Permanent(u16),
}

/// Classify an HTTP status code.
pub fn classify_status(code: u16) -> StatusClass {
    match code {
        0 => StatusClass::NoStatus,
        200..=299 => StatusClass::Success,
        other => StatusClass::Permanent(other),
    }
}
