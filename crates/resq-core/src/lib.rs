//! resq: resilient single requests.
//!
//! A request is described once ([`request::RequestDescriptor`]), run by a
//! per-request state machine ([`scheduler`]) that retries transient failures
//! under a [`retry::RetryPolicy`], and finished with exactly one terminal result
//! delivered through a [`dispatch::ResultDispatcher`]. [`client::Http`] ties the
//! pieces together.

pub mod attempt;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod request;
pub mod retry;
pub mod scheduler;
pub mod transport;

pub use client::{Http, RequestHandle};
pub use dispatch::ResultDispatcher;
pub use request::{DecodeMode, Method, Payload, RequestDescriptor, RequestOptions, Response};
pub use retry::{RequestError, RetryPolicy, TerminalResult};
