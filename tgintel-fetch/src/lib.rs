// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `TgIntel` Fetch
//!
//! The transport layer for `TgIntel`.
//!
//! ## Seam
//!
//! - [`Transport`] - Performs one HTTP call for the dispatcher
//! - [`RequestDescriptor`] - Method, URL, and headers of a call
//! - [`RawResponse`] - Status and body
//! - [`TransportError`] - Timeout, unreachable host, or refused request
//!
//! ## Implementations
//!
//! - [`host::http::HttpTransport`] - reqwest with a provider-host allowlist
//! - [`ScriptedTransport`] - replays queued responses
//!
//! ## Example
//!
//! ```ignore
//! use tgintel_fetch::{HttpTransport, Transport};
//!
//! let transport = HttpTransport::new(Duration::from_secs(15))?;
//! let response = transport.invoke(&request).await?;
//! ```

pub mod error;
pub mod host;
pub mod scripted;
pub mod transport;

pub use error::{HttpError, TransportError};
pub use host::{HttpClient, HttpTransport};
pub use scripted::ScriptedTransport;
pub use transport::{HttpMethod, RawResponse, RequestDescriptor, RequestHeader, Transport};
