use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::defaults::{default_backoff, default_retry_delay};
use crate::request::RequestOptions;

/// Classification of a failed attempt for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable response (connection failure, abort, missing status).
    Transient,
    /// The server answered with a definite error status.
    Permanent(u16),
    /// Successful status but the body did not decode.
    Decode,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Caller-supplied delay function, indexed by the attempt that just failed.
pub type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// How the delay grows with the attempt number.
#[derive(Clone, Default)]
pub enum Backoff {
    /// Every wait is `base_delay`.
    #[default]
    Constant,
    /// `base_delay * 2^(attempt-1)`, capped at `max_delay`.
    Exponential { max_delay: Duration },
    /// Any function of the attempt number; `base_delay` is not consulted.
    Custom(BackoffFn),
}

impl Backoff {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Backoff::Custom(Arc::new(f))
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backoff::Constant => f.write_str("Constant"),
            Backoff::Exponential { max_delay } => f
                .debug_struct("Exponential")
                .field("max_delay", max_delay)
                .finish(),
            Backoff::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Custom backoffs compare equal only when they share the same function.
impl PartialEq for Backoff {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Backoff::Constant, Backoff::Constant) => true,
            (
                Backoff::Exponential { max_delay: a },
                Backoff::Exponential { max_delay: b },
            ) => a == b,
            (Backoff::Custom(a), Backoff::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Retry budget and backoff for one request.
///
/// A policy with `max_retries = N` permits at most `N + 1` attempts in total.
/// Policies are plain values: the scheduler owns its copy, so nothing changes
/// under a request once it has been submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first.
    pub max_retries: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_defaults(0)
    }
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay,
            backoff: Backoff::Constant,
        }
    }

    /// Policy capturing the current process-wide default delay and backoff.
    pub fn from_defaults(max_retries: u32) -> Self {
        Self::new(default_retry_delay(), max_retries).with_backoff(default_backoff())
    }

    /// Policy for a request's options: no retries unless the request enabled them.
    pub fn for_options(options: &RequestOptions) -> Self {
        Self::from_defaults(options.effective_max_retries())
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total attempts permitted, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before the attempt that follows `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match &self.backoff {
            Backoff::Constant => self.base_delay,
            Backoff::Exponential { max_delay } => {
                let exp = 1u32 << attempt.saturating_sub(1).min(16);
                self.base_delay.saturating_mul(exp).min(*max_delay)
            }
            Backoff::Custom(f) => f(attempt),
        }
    }

    /// Decide whether to retry after `attempt` (1-based) failed with `kind`.
    ///
    /// Only transient failures are ever retried; permanent and decode failures end
    /// the request without touching the budget.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        match kind {
            ErrorKind::Permanent(_) | ErrorKind::Decode => RetryDecision::NoRetry,
            ErrorKind::Transient if attempt >= self.max_attempts() => RetryDecision::NoRetry,
            ErrorKind::Transient => RetryDecision::RetryAfter(self.delay_for(attempt)),
        }
    }
}
