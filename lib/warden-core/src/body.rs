//! Body serialization utilities.

use bytes::Bytes;

use crate::Result;

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use warden_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Login { username: String }
///
/// let login = Login { username: "admin".to_string() };
/// let bytes = to_json(&login).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"username":"admin"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to a query string.
///
/// Uses `serde_html_form`, so `Vec<T>` fields become repeated parameters
/// (e.g., `?status=open&status=closed`).
///
/// # Errors
///
/// Returns an error if query serialization fails.
///
/// # Example
///
/// ```
/// use warden_core::to_query_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Page {
///     current: u32,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     page_size: Option<u32>,
/// }
///
/// let page = Page { current: 1, page_size: Some(20) };
/// let query = to_query_string(&page).expect("serialize");
/// assert_eq!(query, "current=1&page_size=20");
/// ```
pub fn to_query_string<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the field that failed
/// (e.g., "data.items.0.id").
///
/// # Errors
///
/// Returns an error if JSON deserialization fails.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
