//! libcurl transport.
//!
//! Each exchange runs on tokio's blocking pool. If the scheduler stops waiting
//! (cancellation), the blocking transfer finishes on its own and its result is
//! dropped with the task handle.

use std::time::Duration;

use super::{RawResponse, Transport, TransportError};
use crate::request::{Method, RequestDescriptor};

/// Timeouts and redirect handling for [`CurlTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    /// Hard wall-clock limit for one exchange.
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirections: u32,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
            follow_redirects: true,
            max_redirections: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: TransportOptions,
}

impl CurlTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }
}

impl Transport for CurlTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let request = request.clone();
        let options = self.options;
        tokio::task::spawn_blocking(move || perform(&request, &options))
            .await
            .map_err(|e| TransportError::Task(e.to_string()))?
    }
}

/// Performs one blocking exchange. A response with any status is `Ok`; only the
/// absence of a response is an error.
fn perform(
    request: &RequestDescriptor,
    options: &TransportOptions,
) -> Result<RawResponse, TransportError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(request.target())?;
    easy.follow_location(options.follow_redirects)?;
    easy.max_redirections(options.max_redirections)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.timeout(options.timeout)?;

    let data = request.body().unwrap_or(&[]);
    match request.method() {
        Method::Get => easy.get(true)?,
        Method::Post => {
            easy.post(true)?;
            easy.post_fields_copy(data)?;
        }
        Method::Put | Method::Delete => {
            easy.custom_request(request.method().as_str())?;
            if !data.is_empty() {
                easy.post_fields_copy(data)?;
            }
        }
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|chunk| {
            body.extend_from_slice(chunk);
            Ok(chunk.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if code == 0 {
        return Err(TransportError::NoStatus);
    }
    let status = u16::try_from(code).map_err(|_| TransportError::NoStatus)?;
    tracing::trace!(
        method = %request.method(),
        target = request.target(),
        status,
        bytes = body.len(),
        "exchange finished"
    );
    Ok(RawResponse { status, body })
}
