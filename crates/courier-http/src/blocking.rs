//! Blocking facade over [`Client`](crate::Client)
//!
//! Every call blocks the current thread until the response is decoded.
//! Requests run on a private tokio runtime owned by the client. The runtime
//! has one worker thread, so pooled connections keep being driven between
//! calls. These functions must not be called from inside an async context.
//!
//! ```ignore
//! use courier_http::blocking;
//! use serde_json::Value;
//!
//! let client = blocking::Client::from_base_url("http://127.0.0.1:62621")?;
//! let echoed: Value = client.post("/search?foo=the+quick", None)?;
//! ```

use std::sync::Arc;

use courier_common::{HttpMethod, Values};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use tokio::runtime::{Builder, Runtime};

use crate::config::ClientConfig;
use crate::error::{HttpError, HttpResult};
use crate::multipart::{FileMap, MultipartBody};
use crate::response::HttpResponse;

/// Blocking counterpart of [`crate::Client`]
#[derive(Clone)]
pub struct Client {
    inner: crate::Client,
    runtime: Arc<Runtime>,
}

impl Client {
    pub fn new(config: ClientConfig) -> HttpResult<Self> {
        Ok(Self {
            inner: crate::Client::new(config)?,
            runtime: Arc::new(Self::runtime()?),
        })
    }

    pub fn with_transport(config: ClientConfig, http: reqwest::Client) -> HttpResult<Self> {
        Ok(Self {
            inner: crate::Client::with_transport(config, http)?,
            runtime: Arc::new(Self::runtime()?),
        })
    }

    pub fn from_base_url(base_url: impl Into<String>) -> HttpResult<Self> {
        Self::new(ClientConfig::new().base_url(base_url))
    }

    fn runtime() -> HttpResult<Runtime> {
        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("courier-blocking")
            .enable_all()
            .build()
            .map_err(|e| HttpError::InvalidRequest(format!("Failed to start runtime: {}", e)))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.inner.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    /// The async client driven by this facade
    pub fn as_async(&self) -> &crate::Client {
        &self.inner
    }

    pub fn send(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Values>,
    ) -> HttpResult<HttpResponse> {
        self.runtime.block_on(self.inner.send(method, path, params))
    }

    pub fn send_multipart(
        &self,
        method: HttpMethod,
        path: &str,
        body: MultipartBody,
    ) -> HttpResult<HttpResponse> {
        self.runtime
            .block_on(self.inner.send_multipart(method, path, body))
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str, params: Option<&Values>) -> HttpResult<T> {
        self.runtime.block_on(self.inner.get(path, params))
    }

    pub fn post<T: DeserializeOwned>(&self, path: &str, params: Option<&Values>) -> HttpResult<T> {
        self.runtime.block_on(self.inner.post(path, params))
    }

    pub fn put<T: DeserializeOwned>(&self, path: &str, params: Option<&Values>) -> HttpResult<T> {
        self.runtime.block_on(self.inner.put(path, params))
    }

    pub fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Values>,
    ) -> HttpResult<T> {
        self.runtime.block_on(self.inner.delete(path, params))
    }

    pub fn create_multipart_body(
        &self,
        params: Option<&Values>,
        files: Option<FileMap<'_>>,
    ) -> HttpResult<MultipartBody> {
        self.inner.create_multipart_body(params, files)
    }

    pub fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> HttpResult<T> {
        self.runtime.block_on(self.inner.post_multipart(path, body))
    }

    pub fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> HttpResult<T> {
        self.runtime.block_on(self.inner.put_multipart(path, body))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::Client")
            .field("base_url", &self.inner.base_url())
            .finish()
    }
}

static DEFAULT_CLIENT: OnceCell<Client> = OnceCell::new();

/// The lazily built blocking client behind the free functions below
pub fn default_client() -> HttpResult<&'static Client> {
    DEFAULT_CLIENT.get_or_try_init(|| Client::new(ClientConfig::default()))
}

pub fn send(method: HttpMethod, url: &str, params: Option<&Values>) -> HttpResult<HttpResponse> {
    default_client()?.send(method, url, params)
}

pub fn get<T: DeserializeOwned>(url: &str, params: Option<&Values>) -> HttpResult<T> {
    default_client()?.get(url, params)
}

pub fn post<T: DeserializeOwned>(url: &str, params: Option<&Values>) -> HttpResult<T> {
    default_client()?.post(url, params)
}

pub fn put<T: DeserializeOwned>(url: &str, params: Option<&Values>) -> HttpResult<T> {
    default_client()?.put(url, params)
}

pub fn delete<T: DeserializeOwned>(url: &str, params: Option<&Values>) -> HttpResult<T> {
    default_client()?.delete(url, params)
}

pub fn post_multipart<T: DeserializeOwned>(url: &str, body: MultipartBody) -> HttpResult<T> {
    default_client()?.post_multipart(url, body)
}

pub fn put_multipart<T: DeserializeOwned>(url: &str, body: MultipartBody) -> HttpResult<T> {
    default_client()?.put_multipart(url, body)
}
