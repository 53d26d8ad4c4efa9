//! The process-wide default delay and backoff are captured at submission time.
//!
//! Lives in its own test binary, as a single test, because it mutates
//! process-wide state.

use std::time::Duration;

use resq_core::config::{BackoffKind, ResqConfig};
use resq_core::retry::{set_default_backoff, set_default_retry_delay, Backoff};
use resq_core::transport::ScriptedTransport;
use resq_core::{Http, RequestOptions, ResultDispatcher, RetryPolicy};

#[tokio::test(start_paused = true)]
async fn submitted_requests_keep_the_defaults_they_captured() {
    let previous_delay = set_default_retry_delay(Duration::from_secs(10));
    let previous_backoff = set_default_backoff(Backoff::Constant);

    let http = Http::new(ScriptedTransport::new().fail().respond(200, "{}"));
    let start = tokio::time::Instant::now();
    let handle = http.get(
        "/someurl.json",
        RequestOptions::retrying(1),
        ResultDispatcher::callback(|_, _| {}),
    );

    // Shrinking the default now must not shorten the wait already captured.
    set_default_retry_delay(Duration::from_millis(1));
    handle.join().await.unwrap();

    let calls = http.transport().call_times();
    assert_eq!(calls.len(), 2);
    assert!(calls[1] - calls[0] >= Duration::from_secs(10));
    assert!(tokio::time::Instant::now() - start >= Duration::from_secs(10));
    assert_eq!(RetryPolicy::from_defaults(0).base_delay, Duration::from_millis(1));

    // Config installs both the delay and the backoff.
    let mut cfg = ResqConfig::default();
    cfg.retry.base_delay_ms = 100;
    cfg.retry.backoff = BackoffKind::Exponential;
    cfg.retry.max_delay_ms = 1_000;
    cfg.apply_defaults();
    let policy = RetryPolicy::from_defaults(3);
    assert_eq!(policy.base_delay, Duration::from_millis(100));
    assert_eq!(
        policy.backoff,
        Backoff::Exponential { max_delay: Duration::from_millis(1_000) }
    );
    assert_eq!(policy.delay_for(3), Duration::from_millis(400));

    // A request submitted under exponential backoff keeps it after the default
    // flips back to constant.
    let http = Http::new(ScriptedTransport::new().fail_times(3).respond(200, "{}"));
    let handle = http.get(
        "/someurl.json",
        RequestOptions::retrying(3),
        ResultDispatcher::callback(|_, _| {}),
    );
    set_default_backoff(Backoff::Constant);
    handle.join().await.unwrap();

    let calls = http.transport().call_times();
    assert_eq!(calls.len(), 4);
    assert!(calls[1] - calls[0] >= Duration::from_millis(100));
    assert!(calls[2] - calls[1] >= Duration::from_millis(200));
    assert!(calls[3] - calls[2] >= Duration::from_millis(400));
    assert_eq!(RetryPolicy::from_defaults(0).backoff, Backoff::Constant);

    set_default_retry_delay(previous_delay);
    set_default_backoff(previous_backoff);
}
