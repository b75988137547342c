//! Base-URL aware API client wrapper.
//!
//! [`ApiClient`] pairs a shared [`HttpClient`] with the API base URL and
//! decodes response envelopes for the typed helpers.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{Envelope, Error, HttpClient, Method, Request, RequestBuilder, Response, Result};

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Pick the base URL: a non-empty `env_value` wins over `default`.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if the selected value is not an absolute URL.
pub fn resolve_base_url(default: &str, env_value: Option<&str>) -> Result<Url> {
    let selected = env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default);
    Url::parse(selected).map_err(Error::InvalidUrl)
}

/// API client wrapper.
///
/// Relative request paths are appended to the base URL, so a base of
/// `https://admin.example.com/prod-api` and a path of `/api/order/list` target
/// `https://admin.example.com/prod-api/api/order/list`.
///
/// # Example
///
/// ```ignore
/// use warden::{ApiClient, HyperClient};
///
/// let http = HyperClient::builder().with_pipeline(pipeline).build();
/// let api = ApiClient::from_env(http, "http://localhost:8080")?;
///
/// let orders: Envelope<Vec<Order>> = api.get("/api/order/list").await?;
/// ```
#[derive(Debug)]
pub struct ApiClient<C> {
    client: C,
    base_url: Url,
}

impl<C: Clone> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<C> ApiClient<C> {
    /// Create a new API client with the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?,
        })
    }

    /// Create a client whose base URL comes from [`BASE_URL_ENV`], falling
    /// back to `default` when the variable is unset or empty.
    ///
    /// The variable is read once, here.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected URL cannot be parsed.
    pub fn from_env(client: C, default: &str) -> Result<Self> {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        let base_url = resolve_base_url(default, env_value.as_deref())?;
        debug!(%base_url, "resolved API base URL");
        Ok(Self::with_url(client, base_url))
    }

    /// Create a new API client with a pre-parsed URL.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The base URL every relative path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }

    /// Resolve `path` against the base URL.
    ///
    /// Absolute `http(s)` URLs are used as they are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the joined URL is invalid.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(Error::InvalidUrl);
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(Error::InvalidUrl)
    }

    /// Start a request to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path cannot be resolved.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder<Bytes>> {
        Ok(Request::builder(method, self.resolve(path)?))
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Send a request through the wrapped client.
    pub async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.client.execute(request).await
    }

    /// `GET path` and decode the envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        let request = self.request(Method::Get, path)?.build();
        self.fetch(request).await
    }

    /// `GET path?query` and decode the envelope.
    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<Envelope<T>>
    where
        Q: Serialize,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::Get, path)?
            .query_params(query)?
            .build();
        self.fetch(request).await
    }

    /// `POST path` with a JSON body and decode the envelope.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let request = self.request(Method::Post, path)?.json(body)?.build();
        self.fetch(request).await
    }

    /// `PUT path` with a JSON body and decode the envelope.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let request = self.request(Method::Put, path)?.json(body)?.build();
        self.fetch(request).await
    }

    /// `DELETE path` and decode the envelope.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        let request = self.request(Method::Delete, path)?.build();
        self.fetch(request).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request<Bytes>) -> Result<Envelope<T>> {
        let response = self.execute(request).await?;
        response.envelope()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use assert2::{check, let_assert};
    use serde::Deserialize;

    use super::*;

    /// Records requests and answers with a canned body.
    #[derive(Clone)]
    struct Canned {
        body: &'static str,
        seen: Arc<Mutex<Vec<(Method, String, Option<Bytes>)>>>,
    }

    impl Canned {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                seen: Arc::default(),
            }
        }

        fn last(&self) -> (Method, String, Option<Bytes>) {
            self.seen.lock().expect("lock").last().cloned().expect("request")
        }
    }

    impl HttpClient for Canned {
        async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
            let (method, url, _, body) = request.into_parts();
            self.seen
                .lock()
                .expect("lock")
                .push((method, url.to_string(), body));
            Ok(Response::new(
                200,
                HashMap::new(),
                Bytes::from_static(self.body.as_bytes()),
            ))
        }
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Order {
        id: u64,
    }

    #[test]
    fn env_value_overrides_default() {
        let url = resolve_base_url("http://localhost:8080", Some("https://admin.example.com/prod-api"))
            .expect("url");
        check!(url.as_str() == "https://admin.example.com/prod-api");
    }

    #[test]
    fn empty_env_value_falls_back_to_default() {
        for env_value in [None, Some(""), Some("   ")] {
            let url = resolve_base_url("http://localhost:8080", env_value).expect("url");
            check!(url.as_str() == "http://localhost:8080/");
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = resolve_base_url("http://localhost:8080", Some("not a url"));
        let_assert!(Err(Error::InvalidUrl(_)) = result);
    }

    #[test]
    fn resolve_keeps_base_path() {
        let api = ApiClient::new((), "https://admin.example.com/prod-api/").expect("client");

        let url = api.resolve("/api/order/list").expect("url");
        check!(url.as_str() == "https://admin.example.com/prod-api/api/order/list");
        check!(url.path() == "/prod-api/api/order/list");
    }

    #[test]
    fn resolve_passes_absolute_urls_through() {
        let api = ApiClient::new((), "https://admin.example.com").expect("client");

        let url = api.resolve("https://cdn.example.com/upload").expect("url");
        check!(url.as_str() == "https://cdn.example.com/upload");
    }

    #[tokio::test]
    async fn get_decodes_envelope() {
        let client = Canned::new(r#"{"status":200,"code":20000,"msg":"ok","data":{"id":7}}"#);
        let api = ApiClient::new(client.clone(), "https://admin.example.com").expect("client");

        let envelope: Envelope<Order> = api.get("/api/order/7").await.expect("envelope");

        check!(envelope.data == Some(Order { id: 7 }));
        let (method, url, _) = client.last();
        check!(method == Method::Get);
        check!(url == "https://admin.example.com/api/order/7");
    }

    #[tokio::test]
    async fn get_with_query_appends_params() {
        #[derive(Serialize)]
        struct Page {
            current: u32,
            size: u32,
        }

        let client = Canned::new(r#"{"code":20000,"data":[]}"#);
        let api = ApiClient::new(client.clone(), "https://admin.example.com").expect("client");

        let _: Envelope<Vec<Order>> = api
            .get_with_query("/api/order/list", &Page { current: 2, size: 20 })
            .await
            .expect("envelope");

        let (_, url, _) = client.last();
        check!(url == "https://admin.example.com/api/order/list?current=2&size=20");
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let client = Canned::new(r#"{"code":20000}"#);
        let api = ApiClient::new(client.clone(), "https://admin.example.com").expect("client");

        let envelope: Envelope<Order> = api
            .post("/api/order", &serde_json::json!({"sku": "A-1"}))
            .await
            .expect("envelope");

        check!(envelope.data.is_none());
        let (method, _, body) = client.last();
        check!(method == Method::Post);
        check!(body == Some(Bytes::from_static(br#"{"sku":"A-1"}"#)));
    }

    #[tokio::test]
    async fn error_envelope_is_returned_for_inspection() {
        let client = Canned::new(r#"{"code":40001,"msg":"bad request"}"#);
        let api = ApiClient::new(client, "https://admin.example.com").expect("client");

        let envelope: Envelope<Order> = api.delete("/api/order/7").await.expect("envelope");

        let_assert!(Err(err) = envelope.into_result());
        check!(err.api_code() == Some(40001));
    }
}
