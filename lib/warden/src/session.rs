//! Collaborators the request pipeline calls into.
//!
//! The pipeline never reaches for globals: the token source, the session
//! store, the page and the notification UI are injected when it is built.
//!
//! - [`TokenStore`] - where the bearer token comes from
//! - [`SessionStore`] - clears the user session on re-login
//! - [`Page`] - reloads the application after logout
//! - [`Notifier`] - shows error toasts and the re-login prompt

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::Result;

/// Future returned by [`SessionStore::logout`].
pub type LogoutFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Source of the bearer token attached to outgoing requests.
///
/// Lookups must be side-effect free; they run once per request.
pub trait TokenStore: Send + Sync + 'static {
    /// Current token, `None` when the user is not logged in.
    fn token(&self) -> Option<String>;
}

impl TokenStore for String {
    fn token(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl TokenStore for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

/// A [`TokenStore`] backed by a closure, see [`token_fn`].
#[derive(Clone)]
pub struct TokenFn<F>(F);

impl<F> fmt::Debug for TokenFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenFn").finish_non_exhaustive()
    }
}

impl<F> TokenStore for TokenFn<F>
where
    F: Fn() -> Option<String> + Send + Sync + 'static,
{
    fn token(&self) -> Option<String> {
        (self.0)()
    }
}

/// Build a [`TokenStore`] from a closure.
///
/// # Example
///
/// ```ignore
/// let tokens = warden::token_fn(move || storage.get("token"));
/// ```
pub fn token_fn<F>(f: F) -> TokenFn<F>
where
    F: Fn() -> Option<String> + Send + Sync + 'static,
{
    TokenFn(f)
}

/// The user session store.
pub trait SessionStore: Send + Sync + 'static {
    /// Clear the session (token, user info). Calling it twice is harmless.
    fn logout(&self) -> LogoutFuture<'_>;
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn logout(&self) -> LogoutFuture<'_> {
        (**self).logout()
    }
}

/// The page hosting the application.
pub trait Page: Send + Sync + 'static {
    /// Reload the application from scratch.
    fn reload(&self);
}

impl<T: Page + ?Sized> Page for Arc<T> {
    fn reload(&self) {
        (**self).reload();
    }
}

/// User-facing notifications.
pub trait Notifier: Send + Sync + 'static {
    /// Show a transient error message.
    fn show_error(&self, toast: Toast);

    /// Show the blocking re-login prompt.
    ///
    /// Implementations call [`ConfirmPrompt::confirm`] when the user accepts
    /// and drop (or [`ConfirmPrompt::dismiss`]) the prompt otherwise.
    fn show_confirm(&self, prompt: ConfirmPrompt);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn show_error(&self, toast: Toast) {
        (**self).show_error(toast);
    }

    fn show_confirm(&self, prompt: ConfirmPrompt) {
        (**self).show_confirm(prompt);
    }
}

/// An error message shown for a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Message text.
    pub content: String,
    /// How long the message stays on screen.
    pub duration: Duration,
}

/// The re-login confirmation offered when the session is no longer valid.
///
/// [`confirm`](Self::confirm) and [`dismiss`](Self::dismiss) consume the
/// prompt, so logout runs at most once per prompt.
pub struct ConfirmPrompt {
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub content: String,
    /// Label of the confirm button.
    pub ok_label: String,
    relogin: Relogin,
}

impl fmt::Debug for ConfirmPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmPrompt")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("ok_label", &self.ok_label)
            .finish_non_exhaustive()
    }
}

impl ConfirmPrompt {
    pub(crate) fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        ok_label: impl Into<String>,
        relogin: Relogin,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ok_label: ok_label.into(),
            relogin,
        }
    }

    /// The user accepted: log out, then reload the page.
    ///
    /// # Errors
    ///
    /// Returns the session store error; the page is not reloaded in that case.
    pub async fn confirm(self) -> Result<()> {
        self.relogin.run().await
    }

    /// The user stayed on the page. Nothing else happens.
    pub fn dismiss(self) {
        debug!(title = %self.title, "re-login prompt dismissed");
    }
}

/// Logout-then-reload action carried by a [`ConfirmPrompt`].
pub(crate) struct Relogin {
    session: Arc<dyn SessionStore>,
    page: Arc<dyn Page>,
}

impl Relogin {
    pub(crate) fn new(session: Arc<dyn SessionStore>, page: Arc<dyn Page>) -> Self {
        Self { session, page }
    }

    async fn run(&self) -> Result<()> {
        info!("re-login confirmed, clearing session");
        if let Err(err) = self.session.logout().await {
            warn!(error = %err, "logout failed, page not reloaded");
            return Err(err);
        }
        self.page.reload();
        Ok(())
    }
}
