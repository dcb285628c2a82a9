//! Request helper client

use std::sync::Arc;
use std::time::Instant;

use courier_common::{HttpMethod, Values};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{sanitize, HttpError, HttpResult};
use crate::multipart::{FileMap, MultipartBody};
use crate::request::{resolve_url, PreparedRequest};
use crate::response::{from_reqwest, HttpResponse};

/// Async HTTP client that encodes parameters and decodes JSON responses
///
/// Cloning is cheap; clones share the same transport and configuration.
///
/// # Example
///
/// ```ignore
/// use courier_http::{Client, Values};
/// use serde_json::Value;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::from_base_url("http://127.0.0.1:62621")?;
///
///     let found: Value = client
///         .get("/search", Some(&Values::from([("term", "some string")])))
///         .await?;
///     println!("{}", found["url"]);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    base_url: Option<Url>,
    headers: HeaderMap,
}

impl Client {
    /// Create a client, building a reqwest transport from the configuration
    pub fn new(config: ClientConfig) -> HttpResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(config.cookie_store)
            .build()?;
        Self::with_transport(config, http)
    }

    /// Create a client on top of a caller-configured reqwest transport
    pub fn with_transport(config: ClientConfig, http: reqwest::Client) -> HttpResult<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()?;
        if let Some(url) = &base_url {
            if url.cannot_be_a_base() {
                return Err(HttpError::InvalidUrl(format!(
                    "'{}' cannot be used as a base URL",
                    url
                )));
            }
        }

        let headers = default_headers(&config)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                base_url,
                headers,
            }),
        })
    }

    /// Create a client with default configuration for `base_url`
    pub fn from_base_url(base_url: impl Into<String>) -> HttpResult<Self> {
        Self::new(ClientConfig::new().base_url(base_url))
    }

    /// Get the base URL
    pub fn base_url(&self) -> Option<&str> {
        self.inner.config.base_url.as_deref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Send `method` to `path`, returning the raw response.
    ///
    /// `params` go in the query string for GET, DELETE, HEAD and OPTIONS and
    /// in a form-encoded body for POST, PUT and PATCH.
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Values>,
    ) -> HttpResult<HttpResponse> {
        let url = resolve_url(self.inner.base_url.as_ref(), path)?;
        self.execute(PreparedRequest::with_params(method, url, params))
            .await
    }

    /// Send a prebuilt multipart body, returning the raw response
    pub async fn send_multipart(
        &self,
        method: HttpMethod,
        path: &str,
        body: MultipartBody,
    ) -> HttpResult<HttpResponse> {
        let url = resolve_url(self.inner.base_url.as_ref(), path)?;
        self.execute(PreparedRequest::multipart(method, url, body))
            .await
    }

    /// GET `path` with `params` in the query string and decode the JSON reply
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Values>,
    ) -> HttpResult<T> {
        self.send(HttpMethod::Get, path, params).await?.json()
    }

    /// POST `params` as a form body and decode the JSON reply
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Values>,
    ) -> HttpResult<T> {
        self.send(HttpMethod::Post, path, params).await?.json()
    }

    /// PUT `params` as a form body and decode the JSON reply
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Values>,
    ) -> HttpResult<T> {
        self.send(HttpMethod::Put, path, params).await?.json()
    }

    /// DELETE `path` with `params` in the query string and decode the JSON reply
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Values>,
    ) -> HttpResult<T> {
        self.send(HttpMethod::Delete, path, params).await?.json()
    }

    /// Serialize form fields and files into a multipart body
    pub fn create_multipart_body(
        &self,
        params: Option<&Values>,
        files: Option<FileMap<'_>>,
    ) -> HttpResult<MultipartBody> {
        MultipartBody::build(params, files)
    }

    /// POST a multipart body and decode the JSON reply
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> HttpResult<T> {
        self.send_multipart(HttpMethod::Post, path, body)
            .await?
            .json()
    }

    /// PUT a multipart body and decode the JSON reply
    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> HttpResult<T> {
        self.send_multipart(HttpMethod::Put, path, body)
            .await?
            .json()
    }

    async fn execute(&self, request: PreparedRequest) -> HttpResult<HttpResponse> {
        let config = &self.inner.config;
        let method = request.method;

        if config.debug {
            debug!(
                method = %method,
                url = %sanitize(request.url.as_str()),
                content_type = ?request.content_type(),
                body_len = request.body_len(),
                "Sending request"
            );
        }

        let start = Instant::now();
        let response = request
            .into_reqwest(&self.inner.http, &self.inner.headers)?
            .send()
            .await?;
        let latency_ms = start.elapsed().as_millis() as u64;
        let response = from_reqwest(response, latency_ms).await?;

        if config.debug {
            debug!(
                method = %method,
                status = response.status.code(),
                latency_ms,
                body = %response.body_preview(),
                "Received response"
            );
        }

        if config.error_for_status {
            response.error_for_status()
        } else {
            Ok(response)
        }
    }
}

/// User-Agent plus the configured default headers
fn default_headers(config: &ClientConfig) -> HttpResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| HttpError::InvalidRequest(format!("Invalid User-Agent: {}", e)))?;
    headers.insert(USER_AGENT, user_agent);

    for (name, value) in &config.default_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HttpError::InvalidRequest(format!("Invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| HttpError::InvalidRequest(format!("Invalid value for header '{}': {}", name, e)))?;
        headers.append(name, value);
    }

    Ok(headers)
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.config.base_url)
            .field("debug", &self.inner.config.debug)
            .finish()
    }
}
