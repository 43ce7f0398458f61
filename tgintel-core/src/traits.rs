//! Trait definitions for `TgIntel`.
//!
//! The dispatcher depends on these seams rather than on concrete stores, so
//! file-backed and in-memory implementations are interchangeable.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::{ProviderId, QuotaCheck, SecretKey, UsageRecord};

/// Read access to configured API keys.
///
/// Lookups are in-memory; any file I/O happens when the implementation is
/// constructed.
pub trait Credentials: Send + Sync {
    /// Returns the key for a provider.
    fn api_key(&self, provider: ProviderId) -> Option<SecretKey>;

    /// Returns true if a key is configured for the provider.
    fn has(&self, provider: ProviderId) -> bool {
        self.api_key(provider).is_some()
    }
}

/// Monthly call budget bookkeeping for metered providers.
///
/// Every method first rolls the provider's record over to the current
/// calendar month when the stored period is stale.
#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// Reports whether one more call is allowed. Never increments.
    async fn check(&self, provider: ProviderId) -> Result<QuotaCheck, CoreError>;

    /// Records one successful call.
    ///
    /// Fails with [`CoreError::LimitExceeded`] when the budget is already
    /// spent.
    async fn record_success(&self, provider: ProviderId) -> Result<UsageRecord, CoreError>;

    /// Zeroes the counter for the current period.
    async fn reset(&self, provider: ProviderId) -> Result<UsageRecord, CoreError>;
}
