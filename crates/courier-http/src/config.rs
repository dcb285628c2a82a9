//! Client configuration

/// Configuration for [`Client`](crate::Client)
///
/// Timeouts, TLS, and pooling belong to the `reqwest::Client` transport; a
/// caller that needs them builds one and passes it to
/// [`Client::with_transport`](crate::Client::with_transport).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that relative request paths are joined onto
    /// (e.g., "https://api.example.com/v1")
    pub base_url: Option<String>,

    /// User-Agent header value
    pub user_agent: String,

    /// Headers added to every request
    pub default_headers: Vec<(String, String)>,

    /// Keep cookies between requests. Only applies to transports built by
    /// [`Client::new`](crate::Client::new).
    pub cookie_store: bool,

    /// Log every request and response at debug level
    pub debug: bool,

    /// Turn non-2xx responses into `HttpError::Status`
    pub error_for_status: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: format!("courier/{}", env!("CARGO_PKG_VERSION")),
            default_headers: Vec::new(),
            cookie_store: false,
            debug: false,
            error_for_status: false,
        }
    }
}

impl ClientConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Enable/disable the cookie store
    pub fn cookie_store(mut self, enabled: bool) -> Self {
        self.cookie_store = enabled;
        self
    }

    /// Enable/disable debug logging of requests and responses
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Treat non-2xx responses as errors
    pub fn error_for_status(mut self, enabled: bool) -> Self {
        self.error_for_status = enabled;
        self
    }
}
