use std::time::{Duration, SystemTime};

use tokio::time::Instant;

use super::state::{AttemptRecord, RequestState};
use crate::attempt::AttemptOutcome;
use crate::retry::{ErrorKind, RequestError, RetryDecision, RetryPolicy, TerminalResult};

/// What the driver must do next.
#[derive(Debug)]
pub enum Step {
    /// Run attempt `attempt` now.
    Execute { attempt: u32 },
    /// Arm a timer for `delay`, then report [`RequestMachine::on_timer_fired`].
    Sleep { next_attempt: u32, delay: Duration },
    /// The request is finished. Produced exactly once per machine.
    Done(TerminalResult),
    /// The event did not apply to the current state (late timer, late response,
    /// repeated cancel) and changed nothing.
    Ignored,
}

/// Transition core for one request.
#[derive(Debug)]
pub struct RequestMachine {
    id: u64,
    policy: RetryPolicy,
    state: RequestState,
    attempt_started: Option<Instant>,
    history: Vec<AttemptRecord>,
}

impl RequestMachine {
    pub fn new(id: u64, policy: RetryPolicy) -> Self {
        Self {
            id,
            policy,
            state: RequestState::Idle,
            attempt_started: None,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    pub fn into_history(self) -> Vec<AttemptRecord> {
        self.history
    }

    /// Idle -> InFlight(1).
    pub fn start(&mut self) -> Step {
        match self.state {
            RequestState::Idle => self.begin_attempt(1),
            _ => Step::Ignored,
        }
    }

    /// Feed the outcome of the attempt currently in flight.
    pub fn on_attempt_complete(&mut self, outcome: AttemptOutcome) -> Step {
        let attempt = match self.state {
            RequestState::InFlight { attempt } => attempt,
            _ => {
                tracing::debug!(request = self.id, "discarding attempt result after completion");
                return Step::Ignored;
            }
        };
        self.history.push(AttemptRecord {
            attempt,
            outcome: outcome.class(),
            started: self.attempt_started.take().unwrap_or_else(Instant::now),
            finished_at: SystemTime::now(),
        });

        match outcome {
            AttemptOutcome::Success(response) => {
                tracing::debug!(
                    request = self.id,
                    attempt,
                    status = response.status,
                    "attempt succeeded"
                );
                self.complete(Ok(response))
            }
            AttemptOutcome::Permanent(code) => {
                tracing::debug!(
                    request = self.id,
                    attempt,
                    status = code,
                    "attempt got error status"
                );
                self.complete(Err(RequestError::HttpStatus(code)))
            }
            AttemptOutcome::DecodeFailed(msg) => {
                tracing::debug!(
                    request = self.id,
                    attempt,
                    error = %msg,
                    "response body did not decode"
                );
                self.complete(Err(RequestError::Decode(msg)))
            }
            AttemptOutcome::Transient(err) => {
                match self.policy.decide(attempt, ErrorKind::Transient) {
                    RetryDecision::RetryAfter(delay) => {
                        let next_attempt = attempt + 1;
                        tracing::warn!(
                            request = self.id,
                            attempt,
                            max_attempts = self.policy.max_attempts(),
                            ?delay,
                            error = %err,
                            "transient failure, retrying"
                        );
                        self.state = RequestState::AwaitingRetry {
                            next_attempt,
                            delay,
                        };
                        Step::Sleep {
                            next_attempt,
                            delay,
                        }
                    }
                    RetryDecision::NoRetry => {
                        tracing::debug!(
                            request = self.id,
                            attempt,
                            error = %err,
                            "transient failure, budget spent"
                        );
                        self.complete(Err(RequestError::Network))
                    }
                }
            }
        }
    }

    /// The retry timer fired. Only meaningful while awaiting a retry.
    pub fn on_timer_fired(&mut self) -> Step {
        match self.state {
            RequestState::AwaitingRetry { next_attempt, .. } => self.begin_attempt(next_attempt),
            _ => Step::Ignored,
        }
    }

    /// Cancel from any non-terminal state.
    pub fn cancel(&mut self) -> Step {
        if self.state.is_completed() {
            return Step::Ignored;
        }
        tracing::debug!(request = self.id, state = ?self.state, "request cancelled");
        self.complete(Err(RequestError::Cancelled))
    }

    fn begin_attempt(&mut self, attempt: u32) -> Step {
        self.state = RequestState::InFlight { attempt };
        self.attempt_started = Some(Instant::now());
        Step::Execute { attempt }
    }

    fn complete(&mut self, result: TerminalResult) -> Step {
        self.state = RequestState::Completed;
        self.attempt_started = None;
        Step::Done(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::OutcomeClass;
    use crate::request::{Payload, Response};
    use crate::transport::TransportError;

    fn transient() -> AttemptOutcome {
        AttemptOutcome::Transient(TransportError::Connection("refused".into()))
    }

    fn success() -> AttemptOutcome {
        AttemptOutcome::Success(Response {
            status: 200,
            payload: Payload::Raw(b"ok".to_vec()),
        })
    }

    fn machine(max_retries: u32) -> RequestMachine {
        RequestMachine::new(1, RetryPolicy::new(Duration::from_millis(5), max_retries))
    }

    #[test]
    fn walks_through_retry_to_success() {
        let mut m = machine(2);
        assert!(matches!(m.start(), Step::Execute { attempt: 1 }));
        assert!(matches!(
            m.on_attempt_complete(transient()),
            Step::Sleep { next_attempt: 2, .. }
        ));
        assert_eq!(
            m.state(),
            RequestState::AwaitingRetry {
                next_attempt: 2,
                delay: Duration::from_millis(5)
            }
        );
        assert!(matches!(m.on_timer_fired(), Step::Execute { attempt: 2 }));
        assert!(matches!(m.on_attempt_complete(success()), Step::Done(Ok(_))));
        assert!(m.state().is_completed());
        let attempts: Vec<u32> = m.history().iter().map(|r| r.attempt).collect();
        assert_eq!(attempts, vec![1, 2]);
        assert_eq!(m.history()[0].outcome, OutcomeClass::Transient);
    }

    #[test]
    fn budget_exhaustion_is_network_error() {
        let mut m = machine(1);
        m.start();
        m.on_attempt_complete(transient());
        m.on_timer_fired();
        match m.on_attempt_complete(transient()) {
            Step::Done(Err(RequestError::Network)) => {}
            other => panic!("expected network error, got {:?}", other),
        }
        assert_eq!(m.history().len(), 2);
    }

    #[test]
    fn permanent_failure_completes_immediately() {
        let mut m = machine(3);
        m.start();
        match m.on_attempt_complete(AttemptOutcome::Permanent(404)) {
            Step::Done(Err(RequestError::HttpStatus(404))) => {}
            other => panic!("expected HTTP 404, got {:?}", other),
        }
    }

    #[test]
    fn decode_failure_is_not_retried() {
        let mut m = machine(3);
        m.start();
        assert!(matches!(
            m.on_attempt_complete(AttemptOutcome::DecodeFailed("eof".into())),
            Step::Done(Err(RequestError::Decode(_)))
        ));
    }

    #[test]
    fn timer_after_cancel_is_ignored() {
        let mut m = machine(2);
        m.start();
        m.on_attempt_complete(transient());
        assert!(matches!(m.cancel(), Step::Done(Err(RequestError::Cancelled))));
        assert!(matches!(m.on_timer_fired(), Step::Ignored));
        assert!(matches!(m.cancel(), Step::Ignored));
        assert_eq!(m.history().len(), 1);
    }

    #[test]
    fn late_response_after_cancel_is_discarded() {
        let mut m = machine(0);
        m.start();
        assert!(matches!(m.cancel(), Step::Done(Err(RequestError::Cancelled))));
        assert!(matches!(m.on_attempt_complete(success()), Step::Ignored));
        assert!(m.history().is_empty());
    }

    #[test]
    fn cancel_from_idle() {
        let mut m = machine(0);
        assert!(matches!(m.cancel(), Step::Done(Err(RequestError::Cancelled))));
        assert!(matches!(m.start(), Step::Ignored));
    }

    #[test]
    fn stray_timer_while_in_flight_is_ignored() {
        let mut m = machine(2);
        m.start();
        assert!(matches!(m.on_timer_fired(), Step::Ignored));
        assert_eq!(m.state(), RequestState::InFlight { attempt: 1 });
    }
}
