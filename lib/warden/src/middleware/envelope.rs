//! Response envelope interception middleware.
//!
//! Hands every outcome of the inner service to the [`RequestPipeline`]
//! response hooks: delivered responses go through the envelope check, failures
//! through the transport error hook.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::{Error, Request, RequestPipeline, Response, Result};

/// Layer that checks response envelopes.
///
/// # Example
///
/// ```ignore
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(pipeline.envelope_layer())
///     .service(client);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeLayer {
    pipeline: RequestPipeline,
}

impl EnvelopeLayer {
    /// Create a layer running the hooks of `pipeline`.
    #[must_use]
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }
}

impl<S> Layer<S> for EnvelopeLayer {
    type Service = EnvelopeCheck<S>;

    fn layer(&self, inner: S) -> Self::Service {
        EnvelopeCheck {
            inner,
            pipeline: self.pipeline.clone(),
        }
    }
}

/// Service that checks response envelopes.
#[derive(Debug, Clone)]
pub struct EnvelopeCheck<S> {
    inner: S,
    pipeline: RequestPipeline,
}

impl<S> Service<Request<Bytes>> for EnvelopeCheck<S>
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
        let path = request.path().to_string();
        let pipeline = self.pipeline.clone();

        let mut inner = self.inner.clone();
        Box::pin(async move {
            match inner.call(request).await {
                Ok(response) => pipeline.on_response(&path, response),
                Err(error) => Err(pipeline.on_response_error(error)),
            }
        })
    }
}
