//! One attempt: a single transport call, classified.

use std::sync::Arc;

use crate::request::{DecodeMode, Payload, RequestDescriptor, Response};
use crate::retry::{classify_status, ErrorKind, StatusClass};
use crate::transport::{RawResponse, Transport, TransportError};

/// Classified result of one attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(Response),
    /// No usable response; may be retried.
    Transient(TransportError),
    /// Definite non-success status.
    Permanent(u16),
    /// Success status with a body that failed to decode.
    DecodeFailed(String),
}

/// Copyable summary of an [`AttemptOutcome`], kept in attempt history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    Success(u16),
    Transient,
    Permanent(u16),
    DecodeFailed,
}

impl AttemptOutcome {
    pub fn class(&self) -> OutcomeClass {
        match self {
            AttemptOutcome::Success(r) => OutcomeClass::Success(r.status),
            AttemptOutcome::Transient(_) => OutcomeClass::Transient,
            AttemptOutcome::Permanent(code) => OutcomeClass::Permanent(*code),
            AttemptOutcome::DecodeFailed(_) => OutcomeClass::DecodeFailed,
        }
    }

    /// Retry classification; `None` for success.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            AttemptOutcome::Success(_) => None,
            AttemptOutcome::Transient(_) => Some(ErrorKind::Transient),
            AttemptOutcome::Permanent(code) => Some(ErrorKind::Permanent(*code)),
            AttemptOutcome::DecodeFailed(_) => Some(ErrorKind::Decode),
        }
    }
}

/// Map a raw transport result to an outcome, decoding successful bodies in `mode`.
pub fn classify_exchange(
    exchange: Result<RawResponse, TransportError>,
    mode: DecodeMode,
) -> AttemptOutcome {
    let raw = match exchange {
        Ok(raw) => raw,
        Err(e) => return AttemptOutcome::Transient(e),
    };
    match classify_status(raw.status) {
        StatusClass::NoStatus => AttemptOutcome::Transient(TransportError::NoStatus),
        StatusClass::Permanent(code) => AttemptOutcome::Permanent(code),
        StatusClass::Success => match Payload::decode(mode, raw.body) {
            Ok(payload) => AttemptOutcome::Success(Response {
                status: raw.status,
                payload,
            }),
            Err(e) => AttemptOutcome::DecodeFailed(e.to_string()),
        },
    }
}

/// Performs exactly one transport call per [`execute`](Self::execute); never retries.
#[derive(Debug)]
pub struct AttemptExecutor<T> {
    transport: Arc<T>,
}

impl<T> Clone for AttemptExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> AttemptExecutor<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub async fn execute(&self, request: &RequestDescriptor) -> AttemptOutcome {
        let exchange = self.transport.send(request).await;
        classify_exchange(exchange, request.options().decode)
    }
}
