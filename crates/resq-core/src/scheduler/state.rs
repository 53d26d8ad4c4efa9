use std::time::{Duration, SystemTime};

use tokio::time::Instant;

use crate::attempt::OutcomeClass;

/// Lifecycle of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    InFlight {
        attempt: u32,
    },
    AwaitingRetry {
        /// Attempt that will run when the timer fires.
        next_attempt: u32,
        delay: Duration,
    },
    Completed,
}

impl RequestState {
    pub fn is_completed(&self) -> bool {
        matches!(self, RequestState::Completed)
    }
}

/// Diagnostic record of one executed attempt. Kept in memory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    /// 1-based attempt index.
    pub attempt: u32,
    pub outcome: OutcomeClass,
    /// When the attempt started, on tokio's clock.
    pub started: Instant,
    /// Wall-clock time the outcome was classified.
    pub finished_at: SystemTime,
}
