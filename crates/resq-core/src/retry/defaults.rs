//! Process-wide default inter-attempt delay and backoff.
//!
//! Both are read once when a [`RetryPolicy`](super::RetryPolicy) is built and
//! copied into it; requests already submitted never see later changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::policy::Backoff;

/// Delay used until something overrides it (config or tests).
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

static DEFAULT_DELAY_NANOS: AtomicU64 = AtomicU64::new(DEFAULT_RETRY_DELAY.as_nanos() as u64);

/// Current process-wide default delay.
pub fn default_retry_delay() -> Duration {
    Duration::from_nanos(DEFAULT_DELAY_NANOS.load(Ordering::Relaxed))
}

/// Replace the process-wide default delay. Returns the previous value so callers can restore it.
pub fn set_default_retry_delay(delay: Duration) -> Duration {
    let nanos = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
    Duration::from_nanos(DEFAULT_DELAY_NANOS.swap(nanos, Ordering::Relaxed))
}

static DEFAULT_BACKOFF: Mutex<Backoff> = Mutex::new(Backoff::Constant);

/// Current process-wide default backoff.
pub fn default_backoff() -> Backoff {
    DEFAULT_BACKOFF
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process-wide default backoff. Returns the previous value.
pub fn set_default_backoff(backoff: Backoff) -> Backoff {
    let mut slot = DEFAULT_BACKOFF.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, backoff)
}
