// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `TgIntel` Providers
//!
//! The operation catalog and the dispatcher.
//!
//! Each provider module includes:
//!
//! - **Descriptor**: Static configuration of its operations (params, path)
//! - **Parser**: Normalizers from raw response shape to the uniform result
//!
//! ## Supported Providers
//!
//! | Provider | Auth | Free operations | Metered operations |
//! |----------|------|-----------------|--------------------|
//! | BotsArchive | none | `bot_id_lookup` | |
//! | Telegram Channel API | RapidAPI | `channel_info` | |
//! | Telegram Scraper API | RapidAPI | `entity_search` | 8, 15 calls per month |
//!
//! ## Usage
//!
//! ```ignore
//! use tgintel_providers::{Dispatcher, Params};
//!
//! let dispatcher = Dispatcher::new(credentials, ledger, transport);
//! let params = Params::from([("username".into(), "durov".into())]);
//! let outcome = dispatcher.execute("fetch_full_user", &params).await?;
//! ```

pub mod catalog;
pub mod descriptor;
pub mod dispatcher;
pub mod normalize;

// Provider modules (alphabetical)
pub mod botsarchive;
pub mod channel;
pub mod scraper;

// Re-export key types
pub use catalog::{CatalogError, OperationCatalog};
pub use descriptor::{
    NormalizeError, Normalizer, OperationDescriptor, OperationDescriptorBuilder,
    OperationSummary, ParamKind, ParamSpec,
};
pub use dispatcher::{Dispatcher, Params, TARGET_PARAM};

#[cfg(test)]
mod parser_edge_tests;
