//! Per-request retry state machine.
//!
//! [`RequestMachine`] holds the state and applies transitions; it is synchronous
//! and knows nothing about time. [`RetryScheduler`] drives one machine on the
//! tokio loop: it runs attempts, arms the retry timer, and races both against
//! cancellation. The machine only hands out a terminal result once, so a timer or
//! transport result that shows up after completion is ignored.

mod cancel;
mod driver;
mod machine;
mod state;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use driver::{Finished, RetryScheduler};
pub use machine::{RequestMachine, Step};
pub use state::{AttemptRecord, RequestState};
