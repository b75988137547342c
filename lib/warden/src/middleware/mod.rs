//! Tower middleware layers for the warden HTTP client.
//!
//! The [`RequestPipeline`](crate::RequestPipeline) hooks run as two layers:
//!
//! - [`AuthTokenLayer`] - request hook, adds `Authorization: Bearer <token>`
//! - [`EnvelopeLayer`] - response hooks, checks the envelope `code` and
//!   notifies on failures
//!
//! [`LoggingLayer`] logs requests and responses using `tracing`.
//!
//! Layers added through [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer)
//! wrap the client in order, so the last layer added is the first to see a request.
//!
//! # Example
//!
//! ```ignore
//! use warden::HyperClient;
//!
//! let client = HyperClient::builder()
//!     .with_logging()
//!     .with_pipeline(pipeline)
//!     .build();
//!
//! // Raw layer access
//! use warden::middleware::AuthTokenLayer;
//! let client = HyperClient::builder()
//!     .layer(AuthTokenLayer::new("static-token".to_string()))
//!     .build();
//! ```

mod auth_token;
mod envelope;
mod logging;

pub(crate) use auth_token::apply_token;
pub use auth_token::{AUTHORIZATION, AuthToken, AuthTokenLayer};
pub use envelope::{EnvelopeCheck, EnvelopeLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
