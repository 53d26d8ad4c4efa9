//! Retry and backoff policy.
//!
//! This module owns failure classification (transient, permanent, decode) and
//! the continue-or-stop decision after a transient failure, so the scheduler
//! only has to feed it attempt numbers and act on the answer.

mod classify;
mod defaults;
mod error;
mod policy;

pub use classify::{classify_status, StatusClass};
pub use defaults::{
    default_backoff, default_retry_delay, set_default_backoff, set_default_retry_delay,
    DEFAULT_RETRY_DELAY,
};
pub use error::{RequestError, TerminalResult};
pub use policy::{Backoff, BackoffFn, ErrorKind, RetryDecision, RetryPolicy};
