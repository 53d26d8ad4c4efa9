//! Transport collaborator: send a request, get back a status and body or nothing.
//!
//! The scheduler never talks to the network directly. It goes through
//! [`Transport`], which performs exactly one exchange per call and never retries.
//! [`CurlTransport`] is the libcurl-backed implementation; [`ScriptedTransport`]
//! replays canned outcomes for tests and demos.

mod libcurl;
mod scripted;

use std::future::Future;

use crate::request::RequestDescriptor;

pub use self::libcurl::{CurlTransport, TransportOptions};
pub use self::scripted::{Scripted, ScriptedTransport};

/// Raw result of one exchange that produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status; 0 means the transport got no real status line.
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure to obtain any response. Always treated as transient.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// libcurl reported an error (connect, resolve, timeout, reset, ...).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// The exchange finished without a status line.
    #[error("no response status")]
    NoStatus,
    /// Connection-level failure reported by a non-curl transport.
    #[error("connection failed: {0}")]
    Connection(String),
    /// The blocking task running the exchange died.
    #[error("transport task failed: {0}")]
    Task(String),
}

/// One request/response exchange.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}
