//! Host APIs for `TgIntel` transports.
//!
//! - [`http`] - HTTP client with tracing and domain allowlist

pub mod http;

pub use http::{HttpClient, HttpTransport};
