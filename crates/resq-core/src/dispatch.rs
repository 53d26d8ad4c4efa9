//! Deliver the terminal result in the caller's chosen convention.
//!
//! [`ResultDispatcher::deliver`] takes `self` by value, so each dispatcher can
//! fire at most once; the scheduler task always calls it, so it fires exactly once.

use tokio::sync::oneshot;

use crate::request::Payload;
use crate::retry::{RequestError, TerminalResult};

type CompletionFn = Box<dyn FnOnce(Option<RequestError>, Option<Payload>) + Send>;
type SuccessFn = Box<dyn FnOnce(Payload) + Send>;
type ErrorFn = Box<dyn FnOnce(RequestError) + Send>;

/// Completion convention selected at submission.
pub enum ResultDispatcher {
    /// `(error, data)`: `error` is `None` on success, `data` is `None` on failure.
    Callback(CompletionFn),
    /// Separate success and error functions; exactly one of them runs.
    Split { success: SuccessFn, error: ErrorFn },
    /// Full terminal result (status included) over a oneshot channel.
    Channel(oneshot::Sender<TerminalResult>),
}

impl std::fmt::Debug for ResultDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ResultDispatcher::Callback(_) => "Callback",
            ResultDispatcher::Split { .. } => "Split",
            ResultDispatcher::Channel(_) => "Channel",
        };
        f.debug_tuple("ResultDispatcher").field(&kind).finish()
    }
}

impl ResultDispatcher {
    pub fn callback<F>(f: F) -> Self
    where
        F: FnOnce(Option<RequestError>, Option<Payload>) + Send + 'static,
    {
        ResultDispatcher::Callback(Box::new(f))
    }

    pub fn split<S, E>(success: S, error: E) -> Self
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(RequestError) + Send + 'static,
    {
        ResultDispatcher::Split {
            success: Box::new(success),
            error: Box::new(error),
        }
    }

    /// Dispatcher plus the receiver the result will arrive on.
    pub fn channel() -> (Self, oneshot::Receiver<TerminalResult>) {
        let (tx, rx) = oneshot::channel();
        (ResultDispatcher::Channel(tx), rx)
    }

    pub fn deliver(self, result: TerminalResult) {
        match self {
            ResultDispatcher::Callback(f) => match result {
                Ok(response) => f(None, Some(response.payload)),
                Err(e) => f(Some(e), None),
            },
            ResultDispatcher::Split { success, error } => match result {
                Ok(response) => success(response.payload),
                Err(e) => error(e),
            },
            ResultDispatcher::Channel(tx) => {
                if tx.send(result).is_err() {
                    tracing::debug!("result receiver dropped before delivery");
                }
            }
        }
    }
}
