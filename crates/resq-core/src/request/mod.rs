//! Request model: what to fetch, how to decode it, and what comes back.
//!
//! A [`RequestDescriptor`] is built once by the caller and then handed to the
//! client, which wraps it in an `Arc` for the lifetime of the request. Nothing
//! downstream mutates it; retries replay the same descriptor.

mod descriptor;
mod payload;

pub use descriptor::{DecodeMode, Method, RequestDescriptor, RequestOptions};
pub use payload::{Payload, Response};
