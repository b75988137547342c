//! HTTP client for admin front-ends talking to an envelope-based API.
//!
//! Every request carries the session's bearer token, and every response body
//! is a `{status, msg, code, data}` envelope. Requests go through a
//! [`RequestPipeline`] installed as tower middleware:
//!
//! - the token from the injected [`TokenStore`] is sent as
//!   `Authorization: Bearer <token>`
//! - a response whose `code` is not `20000` shows an error toast and fails with
//!   [`Error::Api`]
//! - session-invalid codes (`50008`, `50012`, `50014`) also open a re-login
//!   prompt, except for the current-user endpoint
//! - transport failures show a "Request Error" toast and are returned unchanged
//!
//! # Example
//!
//! ```ignore
//! use warden::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Order {
//!     id: u64,
//! }
//!
//! let pipeline = RequestPipeline::new(tokens, notifier, session, page);
//! let http = HyperClient::builder()
//!     .with_logging()
//!     .with_pipeline(pipeline)
//!     .build();
//!
//! let api = ApiClient::from_env(http, "http://localhost:8080")?;
//! let orders: Envelope<Vec<Order>> = api.get("/api/order/list").await?;
//! ```

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
mod pipeline;
pub mod prelude;
pub mod session;

pub use api_client::{ApiClient, BASE_URL_ENV, resolve_base_url};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_CURRENT_USER_PATH, DEFAULT_TOAST_DURATION,
    PipelineConfig, PipelineConfigBuilder,
};
pub use pipeline::RequestPipeline;
pub use session::{
    ConfirmPrompt, LogoutFuture, Notifier, Page, SessionStore, Toast, TokenFn, TokenStore,
    token_fn,
};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use warden_core::{
    Envelope, EnvelopeHead, Error, HttpClient, Method, Request, RequestBuilder, Response, Result,
    code, from_json, to_json, to_query_string,
};

// Re-export http types for status codes and headers
pub use warden_core::{StatusCode, header};

pub use url;
