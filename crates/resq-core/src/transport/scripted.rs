//! In-memory transport that replays a fixed script of outcomes.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::{RawResponse, Transport, TransportError};
use crate::request::RequestDescriptor;

/// One scripted exchange.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Answer with `status` and `body` after `delay`.
    Respond {
        status: u16,
        body: Vec<u8>,
        delay: Duration,
    },
    /// Fail with no response after `delay`.
    Fail { delay: Duration },
    /// Never answer.
    Hang,
}

/// Replays [`Scripted`] outcomes in order and records when each call started.
///
/// Calls beyond the end of the script fail with no response. Timestamps use
/// tokio's clock, so they follow a paused test clock.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(self, step: Scripted) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(step);
        self
    }

    pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.respond_after(Duration::ZERO, status, body)
    }

    pub fn respond_after(self, delay: Duration, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(Scripted::Respond {
            status,
            body: body.into(),
            delay,
        })
    }

    pub fn fail(self) -> Self {
        self.push(Scripted::Fail {
            delay: Duration::ZERO,
        })
    }

    pub fn fail_times(mut self, n: usize) -> Self {
        for _ in 0..n {
            self = self.fail();
        }
        self
    }

    pub fn hang(self) -> Self {
        self.push(Scripted::Hang)
    }

    /// Number of exchanges started so far.
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Start instant of every exchange, in order.
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_step(&self) -> Scripted {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Instant::now());
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Scripted::Fail {
                delay: Duration::ZERO,
            })
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, _request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        match self.next_step() {
            Scripted::Respond {
                status,
                body,
                delay,
            } => {
                tokio::time::sleep(delay).await;
                Ok(RawResponse { status, body })
            }
            Scripted::Fail { delay } => {
                tokio::time::sleep(delay).await;
                Err(TransportError::Connection("scripted failure".to_string()))
            }
            Scripted::Hang => std::future::pending().await,
        }
    }
}
