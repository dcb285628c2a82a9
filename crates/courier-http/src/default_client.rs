//! One-off requests through a shared default client
//!
//! The default client has no base URL, so every `url` here must be absolute.

use courier_common::{HttpMethod, Values};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::HttpResult;
use crate::multipart::{FileMap, MultipartBody};
use crate::response::HttpResponse;

static DEFAULT_CLIENT: OnceCell<Client> = OnceCell::new();

/// The lazily built client used by the free functions in this module
pub fn default_client() -> HttpResult<&'static Client> {
    DEFAULT_CLIENT.get_or_try_init(|| Client::new(ClientConfig::default()))
}

pub async fn send(
    method: HttpMethod,
    url: &str,
    params: Option<&Values>,
) -> HttpResult<HttpResponse> {
    default_client()?.send(method, url, params).await
}

pub async fn get<T: DeserializeOwned>(url: &str, params: Option<&Values>) -> HttpResult<T> {
    default_client()?.get(url, params).await
}

pub async fn post<T: DeserializeOwned>(url: &str, params: Option<&Values>) -> HttpResult<T> {
    default_client()?.post(url, params).await
}

pub async fn put<T: DeserializeOwned>(url: &str, params: Option<&Values>) -> HttpResult<T> {
    default_client()?.put(url, params).await
}

pub async fn delete<T: DeserializeOwned>(url: &str, params: Option<&Values>) -> HttpResult<T> {
    default_client()?.delete(url, params).await
}

pub fn create_multipart_body(
    params: Option<&Values>,
    files: Option<FileMap<'_>>,
) -> HttpResult<MultipartBody> {
    MultipartBody::build(params, files)
}

pub async fn post_multipart<T: DeserializeOwned>(url: &str, body: MultipartBody) -> HttpResult<T> {
    default_client()?.post_multipart(url, body).await
}

pub async fn put_multipart<T: DeserializeOwned>(url: &str, body: MultipartBody) -> HttpResult<T> {
    default_client()?.put_multipart(url, body).await
}
