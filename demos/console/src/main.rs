//! Console demo
//!
//! Calls an envelope API with the request pipeline wired to terminal
//! collaborators: toasts become log lines and the re-login prompt is a y/N
//! question.
//!
//! ```text
//! API_BASE_URL=https://admin.example.com/prod-api API_TOKEN=... \
//!     cargo run -p console-demo -- /api/order/list
//! ```

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::io::BufRead;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use warden::prelude::*;
use warden::session::LogoutFuture;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable holding the initial bearer token.
const TOKEN_ENV: &str = "API_TOKEN";

// ============================================================================
// Collaborators
// ============================================================================

/// In-memory session: holds the token until logout.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: Mutex<Option<String>>,
}

impl MemorySession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Mutex::new(token),
        }
    }
}

impl TokenStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStore for MemorySession {
    fn logout(&self) -> LogoutFuture<'_> {
        Box::pin(async move {
            self.token
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            info!("session cleared");
            Ok(())
        })
    }
}

/// Terminal UI: logs toasts, keeps the last re-login prompt for `main`.
#[derive(Debug, Default)]
pub struct Terminal {
    pending: Mutex<Option<ConfirmPrompt>>,
}

impl Terminal {
    pub fn take_prompt(&self) -> Option<ConfirmPrompt> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Notifier for Terminal {
    fn show_error(&self, toast: Toast) {
        error!(duration = ?toast.duration, "{}", toast.content);
    }

    fn show_confirm(&self, prompt: ConfirmPrompt) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(prompt);
    }
}

impl Page for Terminal {
    fn reload(&self) {
        info!("reloading application");
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Build the API client around `session` and `terminal`.
pub fn api_client(
    base_url: &str,
    session: &Arc<MemorySession>,
    terminal: &Arc<Terminal>,
) -> Result<ApiClient<HyperClient>> {
    let pipeline = RequestPipeline::new(
        Arc::clone(session),
        Arc::clone(terminal),
        Arc::clone(session),
        Arc::clone(terminal),
    );
    let http = HyperClient::builder()
        .with_logging()
        .with_pipeline(pipeline)
        .build();
    ApiClient::from_env(http, base_url)
}

fn ask(prompt: &ConfirmPrompt) -> bool {
    println!("{}\n{} [{} y/N]", prompt.title, prompt.content, prompt.ok_label);
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| warden::DEFAULT_CURRENT_USER_PATH.to_string());

    let session = Arc::new(MemorySession::new(std::env::var(TOKEN_ENV).ok()));
    let terminal = Arc::new(Terminal::default());
    let api = api_client(DEFAULT_BASE_URL, &session, &terminal)?;
    info!(base_url = %api.base_url(), %path, "calling API");

    match api.get::<serde_json::Value>(&path).await {
        Ok(envelope) => {
            println!("{}", envelope.data.unwrap_or_default());
        }
        Err(err) => {
            if let Some(prompt) = terminal.take_prompt() {
                if ask(&prompt) {
                    prompt.confirm().await?;
                } else {
                    prompt.dismiss();
                }
            }
            return Err(err);
        }
    }

    Ok(())
}
