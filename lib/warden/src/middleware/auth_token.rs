//! Bearer token injection middleware.
//!
//! Reads the token from a [`TokenStore`] on every request and, when it is
//! non-empty, sets `Authorization: Bearer <token>`. Errors from the inner
//! service are returned unchanged.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::debug;

use crate::session::TokenStore;
use crate::{Error, Request, Response, Result};

/// Header carrying the bearer token.
pub const AUTHORIZATION: &str = "Authorization";

/// Attach the current token to `request`. Returns `true` if a header was set.
pub(crate) fn apply_token(tokens: &dyn TokenStore, request: &mut Request<Bytes>) -> bool {
    match tokens.token().filter(|token| !token.is_empty()) {
        Some(token) => {
            request.set_header(AUTHORIZATION, format!("Bearer {token}"));
            debug!(path = request.path(), "attached bearer token");
            true
        }
        None => false,
    }
}

/// Layer that adds the bearer token to requests.
///
/// # Example
///
/// ```ignore
/// use warden::middleware::AuthTokenLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(AuthTokenLayer::new(warden::token_fn(|| storage.token())))
///     .service(client);
/// ```
#[derive(Clone)]
pub struct AuthTokenLayer {
    tokens: Arc<dyn TokenStore>,
}

impl fmt::Debug for AuthTokenLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokenLayer").finish_non_exhaustive()
    }
}

impl AuthTokenLayer {
    /// Create a layer reading tokens from `tokens`.
    pub fn new(tokens: impl TokenStore) -> Self {
        Self::from_store(Arc::new(tokens))
    }

    /// Create a layer from an already shared token store.
    #[must_use]
    pub fn from_store(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }
}

impl<S> Layer<S> for AuthTokenLayer {
    type Service = AuthToken<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthToken {
            inner,
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Service that adds the bearer token to requests.
#[derive(Clone)]
pub struct AuthToken<S> {
    inner: S,
    tokens: Arc<dyn TokenStore>,
}

impl<S> fmt::Debug for AuthToken<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken").finish_non_exhaustive()
    }
}

impl<S> Service<Request<Bytes>> for AuthToken<S>
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

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        apply_token(self.tokens.as_ref(), &mut request);

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}
