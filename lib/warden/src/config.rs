//! Client and pipeline configuration types.

use std::time::Duration;

/// Path of the "fetch current user" endpoint; it never triggers the re-login prompt.
pub const DEFAULT_CURRENT_USER_PATH: &str = "/api/user/info";

/// How long error toasts stay on screen.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout duration.
    pub timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
        }
    }
}

/// Texts and rules used by the [`RequestPipeline`](crate::RequestPipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// How long error toasts stay on screen.
    pub toast_duration: Duration,
    /// Requests to this path never open the re-login prompt.
    pub current_user_path: String,
    /// Toast and error text when an error envelope has no message.
    pub fallback_message: String,
    /// Toast text for transport failures without a server message.
    pub transport_fallback_message: String,
    /// Re-login prompt title.
    pub relogin_title: String,
    /// Re-login prompt body.
    pub relogin_content: String,
    /// Re-login prompt confirm button label.
    pub relogin_ok_label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            toast_duration: DEFAULT_TOAST_DURATION,
            current_user_path: DEFAULT_CURRENT_USER_PATH.to_string(),
            fallback_message: "Error".to_string(),
            transport_fallback_message: "Request Error".to_string(),
            relogin_title: "Confirm logout".to_string(),
            relogin_content:
                "You have been logged out, you can cancel to stay on this page, or log in again"
                    .to_string(),
            relogin_ok_label: "Re-Login".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Returns `true` if `path` targets the current-user endpoint.
    ///
    /// Matches on suffix so a base URL with a path prefix still matches.
    #[must_use]
    pub fn is_current_user_path(&self, path: &str) -> bool {
        path.ends_with(self.current_user_path.as_str())
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    toast_duration: Option<Duration>,
    current_user_path: Option<String>,
    fallback_message: Option<String>,
    transport_fallback_message: Option<String>,
    relogin_title: Option<String>,
    relogin_content: Option<String>,
    relogin_ok_label: Option<String>,
}

impl PipelineConfigBuilder {
    /// Set how long error toasts stay on screen.
    #[must_use]
    pub const fn toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = Some(duration);
        self
    }

    /// Set the current-user endpoint path.
    #[must_use]
    pub fn current_user_path(mut self, path: impl Into<String>) -> Self {
        self.current_user_path = Some(path.into());
        self
    }

    /// Set the text used when an error envelope has no message.
    #[must_use]
    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = Some(message.into());
        self
    }

    /// Set the text used for transport failures.
    #[must_use]
    pub fn transport_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.transport_fallback_message = Some(message.into());
        self
    }

    /// Set the re-login prompt texts.
    #[must_use]
    pub fn relogin_prompt(
        mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        ok_label: impl Into<String>,
    ) -> Self {
        self.relogin_title = Some(title.into());
        self.relogin_content = Some(content.into());
        self.relogin_ok_label = Some(ok_label.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            toast_duration: self.toast_duration.unwrap_or(defaults.toast_duration),
            current_user_path: self
                .current_user_path
                .unwrap_or(defaults.current_user_path),
            fallback_message: self.fallback_message.unwrap_or(defaults.fallback_message),
            transport_fallback_message: self
                .transport_fallback_message
                .unwrap_or(defaults.transport_fallback_message),
            relogin_title: self.relogin_title.unwrap_or(defaults.relogin_title),
            relogin_content: self.relogin_content.unwrap_or(defaults.relogin_content),
            relogin_ok_label: self.relogin_ok_label.unwrap_or(defaults.relogin_ok_label),
        }
    }
}
