use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method for a request. Only the verbs the client exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a successful response body is turned into a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Strict JSON parse of the whole body.
    #[default]
    Json,
    /// Body bytes handed back untouched.
    Raw,
}

/// Per-request options.
///
/// Field names follow the wire shape callers already use
/// (`{"retry": true, "maxRetries": 2, "decode": "raw"}`); every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    /// Whether transient failures are retried at all.
    pub retry: bool,
    /// Additional attempts allowed after the first. Ignored unless `retry` is set.
    pub max_retries: u32,
    pub decode: DecodeMode,
}

impl RequestOptions {
    /// Options with retry enabled and the given budget.
    pub fn retrying(max_retries: u32) -> Self {
        Self {
            retry: true,
            max_retries,
            decode: DecodeMode::Json,
        }
    }

    pub fn with_decode(mut self, decode: DecodeMode) -> Self {
        self.decode = decode;
        self
    }

    /// Retry budget actually granted: a request without `retry` gets exactly one attempt.
    pub fn effective_max_retries(&self) -> u32 {
        if self.retry {
            self.max_retries
        } else {
            0
        }
    }
}

/// Immutable description of one logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    target: String,
    method: Method,
    body: Option<Vec<u8>>,
    options: RequestOptions,
}

impl RequestDescriptor {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            method,
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::Get, target)
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_submission_contract() {
        let opts = RequestOptions::default();
        assert!(!opts.retry);
        assert_eq!(opts.max_retries, 0);
        assert_eq!(opts.decode, DecodeMode::Json);
    }

    #[test]
    fn retry_disabled_ignores_max_retries() {
        let opts = RequestOptions {
            retry: false,
            max_retries: 5,
            decode: DecodeMode::Json,
        };
        assert_eq!(opts.effective_max_retries(), 0);
        assert_eq!(RequestOptions::retrying(3).effective_max_retries(), 3);
    }

    #[test]
    fn options_parse_from_camel_case_json() {
        let opts: RequestOptions =
            serde_json::from_str(r#"{"retry": true, "maxRetries": 2, "decode": "raw"}"#).unwrap();
        assert_eq!(opts, RequestOptions::retrying(2).with_decode(DecodeMode::Raw));

        let partial: RequestOptions = serde_json::from_str(r#"{"retry": true}"#).unwrap();
        assert_eq!(partial.max_retries, 0);
        assert_eq!(partial.decode, DecodeMode::Json);
    }

    #[test]
    fn descriptor_builder() {
        let d = RequestDescriptor::new(Method::Post, "http://localhost/items")
            .with_body("{}")
            .with_options(RequestOptions::retrying(1));
        assert_eq!(d.method(), Method::Post);
        assert_eq!(d.target(), "http://localhost/items");
        assert_eq!(d.body(), Some(&b"{}"[..]));
        assert_eq!(d.options().effective_max_retries(), 1);
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
