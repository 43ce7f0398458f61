// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `TgIntel` Core
//!
//! Core types, models, and traits shared by every `TgIntel` crate.
//!
//! ## Key Types
//!
//! ### Providers
//! - [`ProviderId`] - The upstream APIs
//! - [`Tier`] - Free vs. metered operations
//!
//! ### Quota
//! - [`Period`] - Calendar month scoping a counter
//! - [`UsageRecord`] - Persisted monthly counter
//! - [`QuotaCheck`] - Result of a read-only quota check
//!
//! ### Credentials
//! - [`SecretKey`] - Redacting wrapper around an API key
//! - [`CredentialSet`] - Provider to key mapping
//!
//! ### Dispatch
//! - [`Outcome`] - Result of one dispatch
//! - [`OperationReport`] - Entry of an aggregate run
//!
//! ### Seams
//! - [`Credentials`] and [`QuotaLedger`] - implemented by the store crate

pub mod error;
pub mod models;
pub mod traits;

pub use error::CoreError;

pub use models::{
    // Providers
    ProviderAuth,
    ProviderId,
    Tier,
    // Quota
    Period,
    QuotaCheck,
    UsageRecord,
    // Credentials
    CredentialSet,
    SecretKey,
    // Dispatch
    OperationReport,
    Outcome,
    UpstreamFailure,
};

pub use traits::{Credentials, QuotaLedger};
