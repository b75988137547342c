//! Response envelope wire model.
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! { "status": 200, "code": 20000, "msg": "ok", "data": { "id": 1 } }
//! ```
//!
//! [`EnvelopeHead`] reads only the `status`, `code` and `msg` fields, so it can be
//! decoded from any response without knowing the endpoint's payload type.
//! [`Envelope`] adds the typed `data` payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Error, Result, code};

/// The untyped part of a response envelope.
///
/// Decoding is lenient: a field that is missing or of the wrong JSON type is
/// read as `None`, so `{"msg":"x"}` and `{"code":"20000"}` both decode with
/// no code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeHead {
    /// Transport-level status echoed by the server.
    #[serde(default, deserialize_with = "lenient_int")]
    pub status: Option<i64>,
    /// Application result code, [`code::SUCCESS`] on success.
    #[serde(default, deserialize_with = "lenient_int")]
    pub code: Option<i64>,
    /// Human-readable message.
    #[serde(default, deserialize_with = "lenient_str")]
    pub msg: Option<String>,
}

fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| value.as_i64())
}

fn lenient_str<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| value.as_str().map(str::to_string))
}

impl EnvelopeHead {
    /// Decode the head from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonDeserialization`] if the body is not a JSON object.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        crate::from_json(body)
    }

    /// Returns `true` if the code is the success sentinel.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code.is_some_and(code::is_success)
    }

    /// Returns `true` if the code asks the user to log in again.
    #[must_use]
    pub fn is_session_invalid(&self) -> bool {
        self.code.is_some_and(code::is_session_invalid)
    }

    /// The server message, if present and not blank.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref().filter(|msg| !msg.trim().is_empty())
    }
}

/// A full response envelope with a typed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Transport-level status echoed by the server.
    #[serde(default)]
    pub status: i64,
    /// Application result code, [`code::SUCCESS`] on success.
    pub code: i64,
    /// Human-readable message.
    #[serde(default)]
    pub msg: Option<String>,
    /// Endpoint payload, absent on most error envelopes.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Build a success envelope around `data`.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            status: 200,
            code: code::SUCCESS,
            msg: Some("success".to_string()),
            data: Some(data),
        }
    }

    /// Returns `true` if the code is the success sentinel.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        code::is_success(self.code)
    }

    /// Split off the untyped head.
    #[must_use]
    pub fn head(&self) -> EnvelopeHead {
        EnvelopeHead {
            status: Some(self.status),
            code: Some(self.code),
            msg: self.msg.clone(),
        }
    }

    /// Turn the envelope into its payload, or an [`Error::Api`] when the code
    /// is not the success sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] carrying the code and message.
    pub fn into_result(self) -> Result<Option<T>> {
        if self.is_success() {
            return Ok(self.data);
        }

        let message = self
            .head()
            .message()
            .map_or_else(|| "Error".to_string(), str::to_string);
        Err(Error::api(self.code, message))
    }
}
