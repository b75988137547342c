//! HTTP response handling.
//!
//! [`Response`] provides access to status, headers, and body, plus decoding of
//! the response [`Envelope`](crate::Envelope).
//!
//! # Example
//!
//! ```ignore
//! let envelope: Envelope<User> = response.envelope()?;
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Envelope, EnvelopeHead};

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

impl Response<Bytes> {
    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Decode the untyped envelope head (`status`, `code`, `msg`).
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON object.
    pub fn envelope_head(&self) -> crate::Result<EnvelopeHead> {
        EnvelopeHead::from_body(&self.body)
    }

    /// Decode the full envelope with a typed payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not an envelope of `T`.
    pub fn envelope<T: serde::de::DeserializeOwned>(&self) -> crate::Result<Envelope<T>> {
        self.json()
    }}
