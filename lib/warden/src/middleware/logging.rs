//! Request/response logging middleware.
//!
//! Logs each call using the `tracing` crate: method and path on the way out,
//! HTTP status, envelope code and elapsed time on the way back. Header values
//! (and so the bearer token) are never logged.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Error, Request, Response, Result};

/// Layer that adds request/response logging.
///
/// # Example
///
/// ```ignore
/// use warden::middleware::LoggingLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(LoggingLayer::new())
///     .service(client);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (adds header names and body sizes).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method();
        let path = request.path().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %path);

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();

                if level == LogLevel::Debug {
                    let header_names: Vec<&str> =
                        request.headers().keys().map(String::as_str).collect();
                    debug!(
                        headers = ?header_names,
                        body_len = request.body().map_or(0, Bytes::len),
                        "sending request"
                    );
                } else {
                    info!("sending request");
                }

                let result = inner.call(request).await;

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        match response.envelope_head() {
                            Ok(head) if head.is_success() => {
                                info!(status, code = ?head.code, elapsed_ms, "request completed");
                            }
                            Ok(head) => {
                                warn!(
                                    status,
                                    code = ?head.code,
                                    elapsed_ms,
                                    "request rejected by server"
                                );
                            }
                            Err(_) => {
                                warn!(status, elapsed_ms, "response is not an envelope");
                            }
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
