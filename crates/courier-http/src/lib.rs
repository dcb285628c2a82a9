//! courier-http: HTTP request helper
//!
//! Removes the boilerplate around a plain request/response cycle: building
//! query strings, encoding form bodies, assembling multipart bodies with
//! files, and decoding JSON replies into caller types.
//!
//! # Architecture
//!
//! - `Client`: async client with an optional base URL, built on reqwest
//! - `MultipartBody`: immutable, pre-serialized upload payload
//! - `HttpResponse`: raw status, headers, and body for undecoded replies
//! - `blocking`: the same operations as plain blocking calls
//! - free functions (`get`, `post`, ...): one-off calls on a shared default client

pub mod blocking;
pub mod client;
pub mod config;
pub mod default_client;
pub mod error;
pub mod multipart;
mod request;
pub mod response;

pub use client::Client;
pub use config::ClientConfig;
pub use default_client::{
    create_multipart_body, default_client, delete, get, post, post_multipart, put,
    put_multipart, send,
};
pub use error::{HttpError, HttpErrorCategory, HttpResult};
pub use multipart::{File, FileMap, MultipartBody};
pub use response::HttpResponse;

// Re-export shared types from courier-common
pub use courier_common::{dig, dig_as, HttpMethod, HttpStatus, Segment, Values};
