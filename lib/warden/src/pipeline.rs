//! The request pipeline: request and response hooks around the shared client.
//!
//! [`RequestPipeline`] owns the injected collaborators and implements the two
//! hooks. The tower layers in [`middleware`](crate::middleware) only call into it.
//!
//! Request hook: attach `Authorization: Bearer <token>` when the token store
//! has a non-empty token.
//!
//! Response hook:
//! - envelope `code == 20000`: the response passes through untouched
//! - any other code: error toast, then `Err(Error::Api)`; for session-invalid
//!   codes outside the current-user endpoint a re-login prompt is shown first
//! - a 2xx body with no usable code: same as a rejected code, with no code
//! - transport failure, or a non-2xx body that is not an envelope: "Request
//!   Error" toast (or the server message when the body carries one), and the
//!   error is returned unchanged

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::middleware::{AuthTokenLayer, EnvelopeLayer};
use crate::session::{ConfirmPrompt, Notifier, Page, Relogin, SessionStore, Toast, TokenStore};
use crate::{EnvelopeHead, Error, PipelineConfig, Request, Response, Result};

/// Request/response hooks wired to their collaborators.
///
/// # Example
///
/// ```ignore
/// use warden::{HyperClient, PipelineConfig, RequestPipeline};
///
/// let pipeline = RequestPipeline::new(tokens, notifier, session, page)
///     .with_config(PipelineConfig::default());
///
/// let client = HyperClient::builder().with_pipeline(pipeline).build();
/// ```
#[derive(Clone)]
pub struct RequestPipeline {
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    session: Arc<dyn SessionStore>,
    page: Arc<dyn Page>,
    config: Arc<PipelineConfig>,
}

impl fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RequestPipeline {
    /// Create a pipeline with the default [`PipelineConfig`].
    pub fn new(
        tokens: impl TokenStore,
        notifier: impl Notifier,
        session: impl SessionStore,
        page: impl Page,
    ) -> Self {
        Self {
            tokens: Arc::new(tokens),
            notifier: Arc::new(notifier),
            session: Arc::new(session),
            page: Arc::new(page),
            config: Arc::new(PipelineConfig::default()),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// The pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Layer running the request hook.
    #[must_use]
    pub fn auth_layer(&self) -> AuthTokenLayer {
        AuthTokenLayer::from_store(Arc::clone(&self.tokens))
    }

    /// Layer running the response hooks.
    #[must_use]
    pub fn envelope_layer(&self) -> EnvelopeLayer {
        EnvelopeLayer::new(self.clone())
    }

    /// Request hook. Returns `true` if a token was attached.
    pub fn on_request(&self, request: &mut Request<Bytes>) -> bool {
        crate::middleware::apply_token(self.tokens.as_ref(), request)
    }

    /// Response hook for responses the transport delivered.
    ///
    /// `path` is the path of the request that produced `response`.
    ///
    /// A 2xx body without a usable envelope code is an application error like
    /// any other rejected code. A non-2xx body without one is an HTTP error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when the envelope code is not the success
    /// sentinel, and [`Error::Http`] for a non-2xx response with no code.
    pub fn on_response(&self, path: &str, response: Response<Bytes>) -> Result<Response<Bytes>> {
        let head = response.envelope_head().unwrap_or_else(|err| {
            debug!(path, error = %err, "response body is not an envelope");
            EnvelopeHead::default()
        });

        if head.is_success() {
            return Ok(response);
        }
        if head.code.is_none() && !response.is_success() {
            return Err(self.on_response_error(Self::http_error(response)));
        }

        let message = head
            .message()
            .unwrap_or(self.config.fallback_message.as_str())
            .to_string();
        warn!(code = ?head.code, path, message = %message, "application error");
        self.notifier.show_error(self.toast(message.clone()));

        if head.is_session_invalid() && !self.config.is_current_user_path(path) {
            info!(code = ?head.code, path, "session no longer valid, offering re-login");
            self.notifier.show_confirm(self.relogin_prompt());
        }

        Err(match head.code {
            Some(code) => Error::api(code, message),
            None => Error::api_without_code(message),
        })
    }

    /// Response hook for failed requests. Returns `error` unchanged.
    pub fn on_response_error(&self, error: Error) -> Error {
        let content = error
            .server_message()
            .unwrap_or_else(|| self.config.transport_fallback_message.clone());
        warn!(error = %error, "request failed");
        self.notifier.show_error(self.toast(content));
        error
    }

    fn toast(&self, content: String) -> Toast {
        Toast {
            content,
            duration: self.config.toast_duration,
        }
    }

    fn relogin_prompt(&self) -> ConfirmPrompt {
        ConfirmPrompt::new(
            self.config.relogin_title.as_str(),
            self.config.relogin_content.as_str(),
            self.config.relogin_ok_label.as_str(),
            Relogin::new(Arc::clone(&self.session), Arc::clone(&self.page)),
        )
    }

    /// Error for a non-2xx response whose body is not an envelope.
    fn http_error(response: Response<Bytes>) -> Error {
        let status = response.status();
        let reason = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status");
        Error::http_with_body(status, reason, response.into_body())
    }
}
