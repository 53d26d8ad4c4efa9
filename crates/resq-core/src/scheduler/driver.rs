use std::sync::Arc;

use super::cancel::CancelSignal;
use super::machine::{RequestMachine, Step};
use super::state::AttemptRecord;
use crate::attempt::AttemptExecutor;
use crate::request::RequestDescriptor;
use crate::retry::{RetryPolicy, TerminalResult};
use crate::transport::Transport;

/// Terminal result plus the attempts that led to it.
#[derive(Debug)]
pub struct Finished {
    pub result: TerminalResult,
    pub history: Vec<AttemptRecord>,
}

/// Drives one [`RequestMachine`] to completion.
///
/// Attempts run strictly one after another. Between attempts the scheduler
/// waits on a tokio timer; both the attempt and the timer are raced against the
/// cancel signal, with cancellation checked first so a cancel that lands in the
/// same poll as a response wins.
pub struct RetryScheduler<T> {
    machine: RequestMachine,
    executor: AttemptExecutor<T>,
    request: Arc<RequestDescriptor>,
    cancel: CancelSignal,
}

impl<T: Transport> RetryScheduler<T> {
    pub fn new(
        id: u64,
        request: Arc<RequestDescriptor>,
        policy: RetryPolicy,
        transport: Arc<T>,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            machine: RequestMachine::new(id, policy),
            executor: AttemptExecutor::new(transport),
            request,
            cancel,
        }
    }

    pub async fn run(mut self) -> Finished {
        let id = self.machine.id();
        tracing::debug!(
            request = id,
            method = %self.request.method(),
            target = self.request.target(),
            max_attempts = self.machine.policy().max_attempts(),
            "request submitted"
        );

        let mut step = if self.cancel.is_cancelled() {
            self.machine.cancel()
        } else {
            self.machine.start()
        };

        loop {
            step = match step {
                Step::Execute { attempt } => {
                    tracing::debug!(request = id, attempt, "attempt started");
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => self.machine.cancel(),
                        outcome = self.executor.execute(&self.request) => {
                            self.machine.on_attempt_complete(outcome)
                        }
                    }
                }
                Step::Sleep { next_attempt, delay } => {
                    tracing::trace!(request = id, next_attempt, ?delay, "retry timer armed");
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => self.machine.cancel(),
                        () = tokio::time::sleep(delay) => self.machine.on_timer_fired(),
                    }
                }
                Step::Done(result) => {
                    for record in self.machine.history() {
                        tracing::debug!(
                            request = id,
                            attempt = record.attempt,
                            outcome = ?record.outcome,
                            "attempt record"
                        );
                    }
                    match &result {
                        Ok(r) => tracing::info!(
                            request = id,
                            attempts = self.machine.history().len(),
                            status = r.status,
                            "request completed"
                        ),
                        Err(e) => tracing::info!(
                            request = id,
                            attempts = self.machine.history().len(),
                            error = %e,
                            "request failed"
                        ),
                    }
                    return Finished {
                        result,
                        history: self.machine.into_history(),
                    };
                }
                // Each event above is fed in the state that produced the step, so the
                // machine always accepts it.
                Step::Ignored => unreachable!("scheduler fed an event the machine rejected"),
            };
        }
    }
}
