//! Integration test: curl transport against a local server, through the full client.

mod common;

use std::time::Duration;

use common::http_server::{self, Reply};
use resq_core::transport::{CurlTransport, TransportOptions};
use resq_core::{
    DecodeMode, Http, RequestDescriptor, RequestError, RequestOptions, ResultDispatcher,
    RetryPolicy,
};

fn client() -> Http<CurlTransport> {
    Http::new(CurlTransport::new(TransportOptions {
        connect_timeout: Duration::from_secs(2),
        timeout: Duration::from_secs(5),
        ..TransportOptions::default()
    }))
}

#[tokio::test]
async fn json_body_is_decoded() {
    let server = http_server::start(vec![Reply::Status(200, r#"{"test":"value"}"#)]);
    let response = client()
        .fetch(RequestDescriptor::get(server.url.clone()))
        .await
        .expect("request should succeed");
    assert_eq!(response.status, 200);
    assert_eq!(response.payload.as_json().unwrap()["test"], "value");
}

#[tokio::test]
async fn dropped_connections_are_retried_until_success() {
    let server = http_server::start(vec![
        Reply::Drop,
        Reply::Drop,
        Reply::Status(200, r#"{"ok":true}"#),
    ]);
    let (completion, rx) = ResultDispatcher::channel();
    let handle = client().submit(
        RequestDescriptor::get(server.url.clone()),
        RetryPolicy::new(Duration::from_millis(20), 2),
        completion,
    );
    let history = handle.join().await.unwrap();
    let response = rx.await.unwrap().expect("third attempt succeeds");
    assert_eq!(response.payload.as_json().unwrap()["ok"], true);
    assert_eq!(history.len(), 3);
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn error_status_is_not_retried() {
    let server = http_server::start(vec![Reply::Status(404, "{}"), Reply::Status(200, "{}")]);
    let err = client()
        .fetch(RequestDescriptor::get(server.url.clone()).with_options(RequestOptions::retrying(3)))
        .await
        .unwrap_err();
    assert_eq!(err, RequestError::HttpStatus(404));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn closed_port_exhausts_budget_as_network_error() {
    let url = http_server::closed_port_url();
    let (completion, rx) = ResultDispatcher::channel();
    let handle = client().submit(
        RequestDescriptor::get(url),
        RetryPolicy::new(Duration::from_millis(10), 1),
        completion,
    );
    let history = handle.join().await.unwrap();
    assert_eq!(rx.await.unwrap().unwrap_err(), RequestError::Network);
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn raw_mode_and_post_body() {
    let server = http_server::start(vec![Reply::Status(201, "created")]);
    let response = client()
        .fetch(
            RequestDescriptor::new(resq_core::Method::Post, server.url.clone())
                .with_body(r#"{"name":"x"}"#)
                .with_options(RequestOptions::default().with_decode(DecodeMode::Raw)),
        )
        .await
        .unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.payload.as_bytes(), Some(&b"created"[..]));
}
