//! Submission entry points.
//!
//! [`Http`] turns a target and options into a [`RequestDescriptor`], captures a
//! [`RetryPolicy`] (reading the process-wide default delay once), spawns the
//! request's scheduler on the current tokio runtime and hands back a
//! [`RequestHandle`]. Requests share nothing but the transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::ResqConfig;
use crate::dispatch::ResultDispatcher;
use crate::request::{Method, RequestDescriptor, RequestOptions};
use crate::retry::{Backoff, RequestError, RetryPolicy, TerminalResult};
use crate::scheduler::{cancel_pair, AttemptRecord, CancelHandle, RetryScheduler};
use crate::transport::{CurlTransport, Transport};

/// Request client. Cheap to share behind an `Arc`; every method must be called
/// from within a tokio runtime.
#[derive(Debug)]
pub struct Http<T = CurlTransport> {
    transport: Arc<T>,
    /// Overrides the process-wide default backoff when set.
    backoff: Option<Backoff>,
    next_id: AtomicU64,
}

impl Http<CurlTransport> {
    /// Curl-backed client using the transport and backoff settings from `cfg`.
    pub fn from_config(cfg: &ResqConfig) -> Self {
        Self::new(CurlTransport::new(cfg.transport.to_options()))
            .with_backoff(cfg.retry.backoff())
    }
}

impl<T: Transport> Http<T> {
    pub fn new(transport: T) -> Self {
        Self::with_shared_transport(Arc::new(transport))
    }

    pub fn with_shared_transport(transport: Arc<T>) -> Self {
        Self {
            transport,
            backoff: None,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn get(
        &self,
        target: impl Into<String>,
        options: RequestOptions,
        completion: ResultDispatcher,
    ) -> RequestHandle {
        self.request(
            RequestDescriptor::new(Method::Get, target).with_options(options),
            completion,
        )
    }

    pub fn post(
        &self,
        target: impl Into<String>,
        body: impl Into<Vec<u8>>,
        options: RequestOptions,
        completion: ResultDispatcher,
    ) -> RequestHandle {
        self.request(
            RequestDescriptor::new(Method::Post, target)
                .with_body(body)
                .with_options(options),
            completion,
        )
    }

    pub fn put(
        &self,
        target: impl Into<String>,
        body: impl Into<Vec<u8>>,
        options: RequestOptions,
        completion: ResultDispatcher,
    ) -> RequestHandle {
        self.request(
            RequestDescriptor::new(Method::Put, target)
                .with_body(body)
                .with_options(options),
            completion,
        )
    }

    pub fn delete(
        &self,
        target: impl Into<String>,
        options: RequestOptions,
        completion: ResultDispatcher,
    ) -> RequestHandle {
        self.request(
            RequestDescriptor::new(Method::Delete, target).with_options(options),
            completion,
        )
    }

    /// Submit a descriptor with the policy its options call for.
    pub fn request(
        &self,
        request: RequestDescriptor,
        completion: ResultDispatcher,
    ) -> RequestHandle {
        let mut policy = RetryPolicy::for_options(request.options());
        if let Some(backoff) = &self.backoff {
            policy = policy.with_backoff(backoff.clone());
        }
        self.submit(request, policy, completion)
    }

    /// Submit with an explicit policy.
    pub fn submit(
        &self,
        request: RequestDescriptor,
        policy: RetryPolicy,
        completion: ResultDispatcher,
    ) -> RequestHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel, signal) = cancel_pair();
        let scheduler = RetryScheduler::new(
            id,
            Arc::new(request),
            policy,
            Arc::clone(&self.transport),
            signal,
        );
        let task = tokio::spawn(async move {
            let finished = scheduler.run().await;
            completion.deliver(finished.result);
            finished.history
        });
        RequestHandle { id, cancel, task }
    }

    /// Submit and wait for the terminal result.
    pub async fn fetch(&self, request: RequestDescriptor) -> TerminalResult {
        let (completion, rx) = ResultDispatcher::channel();
        let _handle = self.request(request, completion);
        // The sender only disappears undelivered if the scheduler task never got to
        // deliver: the runtime tore it down, or it panicked. Both surface as Cancelled.
        rx.await.unwrap_or(Err(RequestError::Cancelled))
    }
}

/// Caller's handle on a submitted request.
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct RequestHandle {
    id: u64,
    cancel: CancelHandle,
    task: JoinHandle<Vec<AttemptRecord>>,
}

impl RequestHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Request cancellation. The completion fires once with `Cancelled` unless the
    /// request already completed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Wait until the completion has been delivered; returns the attempt history.
    pub async fn join(self) -> Result<Vec<AttemptRecord>, tokio::task::JoinError> {
        self.task.await
    }
}
