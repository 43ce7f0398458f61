//! Domain models for `TgIntel`.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider ids, authentication schemes, tiers
//! - [`usage`] - Periods, usage records, quota checks
//! - [`credentials`] - Secret keys and the persisted credential set
//! - [`outcome`] - Dispatch outcomes and aggregate reports

mod credentials;
mod outcome;
mod provider;
mod usage;

pub use credentials::{CredentialSet, SecretKey};
pub use outcome::{OperationReport, Outcome, UpstreamFailure};
pub use provider::{ProviderAuth, ProviderId, Tier};
pub use usage::{Period, QuotaCheck, UsageRecord};
#[cfg(test)]
mod serde_tests;
