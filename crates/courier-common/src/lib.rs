//! Common types for courier
//!
//! Transport-independent pieces shared by the request helper: HTTP method
//! and status types, the [`Values`] parameter mapping used for query strings
//! and form bodies, and [`dig`] lookups into decoded JSON.

pub mod dig;
pub mod http;
pub mod values;

pub use dig::{dig, dig_as, Segment};
pub use http::{HttpMethod, HttpStatus};
pub use values::Values;
