//! Core types and traits for the warden HTTP client.
//!
//! This crate provides the transport-independent building blocks:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Envelope`] and [`EnvelopeHead`] - the `{status, msg, code, data}` body every endpoint returns
//! - [`code`] - application result codes (success sentinel, session-invalid set)
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - Core client trait for HTTP execution
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
pub mod code;
mod envelope;
mod error;
mod method;
pub mod prelude;
mod request;
mod response;

pub use body::{from_json, to_json, to_query_string};
pub use client::HttpClient;
pub use envelope::{Envelope, EnvelopeHead};
pub use error::{Error, Result};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
