//! Monthly usage ledger.
//!
//! Tracks one [`UsageRecord`] per metered provider. The record is rolled over
//! to the current calendar month before every read or write, and the stored
//! limit follows the configured one without touching the count.
//!
//! File-backed ledgers re-read the usage file on every access so that
//! separate processes see each other's writes. Each mutation rewrites the
//! whole file atomically before returning; reads never write.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tgintel_core::{CoreError, Period, ProviderId, QuotaCheck, QuotaLedger, UsageRecord};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::persistence::{load_json_if_exists, save_json};

/// Serialized shape of the usage file: provider id to record.
pub type UsageFile = BTreeMap<ProviderId, UsageRecord>;

/// Monthly budgets keyed by provider.
pub type MonthlyLimits = BTreeMap<ProviderId, u32>;

/// Budgets of every provider that has a built-in limit.
pub fn default_limits() -> MonthlyLimits {
    ProviderId::all()
        .iter()
        .filter_map(|p| p.default_monthly_limit().map(|limit| (*p, limit)))
        .collect()
}

// ============================================================================
// Usage Ledger
// ============================================================================

/// Quota bookkeeping for metered providers.
pub struct UsageLedger {
    path: Option<PathBuf>,
    limits: MonthlyLimits,
    clock: Arc<dyn Clock>,
    records: Mutex<UsageFile>,
}

impl std::fmt::Debug for UsageLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageLedger")
            .field("path", &self.path)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl UsageLedger {
    /// Opens a file-backed ledger using the system clock.
    ///
    /// The file is not read until the first access.
    pub fn open(path: impl Into<PathBuf>, limits: MonthlyLimits) -> Self {
        Self::open_with_clock(path, limits, Arc::new(SystemClock))
    }

    /// Opens a file-backed ledger with an explicit clock.
    pub fn open_with_clock(
        path: impl Into<PathBuf>,
        limits: MonthlyLimits,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            path: Some(path.into()),
            limits,
            clock,
            records: Mutex::new(UsageFile::new()),
        }
    }

    /// Creates a ledger that lives only in memory, using the system clock.
    pub fn in_memory(limits: MonthlyLimits) -> Self {
        Self::in_memory_with_clock(limits, Arc::new(SystemClock))
    }

    /// Creates an in-memory ledger with an explicit clock.
    pub fn in_memory_with_clock(limits: MonthlyLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: None,
            limits,
            clock,
            records: Mutex::new(UsageFile::new()),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Configured budgets.
    pub fn limits(&self) -> &MonthlyLimits {
        &self.limits
    }

    /// Current state of every configured provider, after rollover.
    pub async fn snapshot(&self) -> Result<Vec<QuotaCheck>, CoreError> {
        let mut records = self.records.lock().await;
        self.reload(&mut records).await?;

        let period = self.clock.current_period();
        let checks = self
            .limits
            .iter()
            .map(|(&provider, &limit)| {
                let record = Self::current(&mut records, provider, limit, period);
                QuotaCheck::from_record(provider, &record)
            })
            .collect();
        Ok(checks)
    }

    fn limit_for(&self, provider: ProviderId) -> Result<u32, CoreError> {
        self.limits
            .get(&provider)
            .copied()
            .ok_or_else(|| CoreError::UnknownProvider(provider.id().to_string()))
    }

    /// Replaces the in-memory records with the file contents.
    async fn reload(&self, records: &mut UsageFile) -> Result<(), CoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        *records = load_json_if_exists::<UsageFile>(path)
            .await
            .map_err(|e| {
                warn!(path = %path.display(), error = %e, "Usage file unreadable");
                e.into_read_error(path)
            })?
            .unwrap_or_default();
        Ok(())
    }

    async fn persist(&self, records: &UsageFile) -> Result<(), CoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        save_json(path, records)
            .await
            .map_err(|e| e.into_write_error(path))
    }

    /// Returns the provider's record for `period`, rolling over and refreshing
    /// the limit in memory. Nothing is written.
    fn current(
        records: &mut UsageFile,
        provider: ProviderId,
        limit: u32,
        period: Period,
    ) -> UsageRecord {
        let record = records
            .entry(provider)
            .or_insert_with(|| UsageRecord::fresh(period, limit));

        if record.period != period {
            info!(%provider, from = %record.period, to = %period, "Usage period rolled over");
            *record = UsageRecord::fresh(period, limit);
        }
        if record.limit != limit {
            debug!(%provider, old = record.limit, new = limit, "Usage limit refreshed");
            record.limit = limit;
        }
        *record
    }

    /// Runs `f` on the current record under the lock and persists the result.
    async fn mutate<F>(&self, provider: ProviderId, f: F) -> Result<UsageRecord, CoreError>
    where
        F: FnOnce(&mut UsageRecord) -> Result<(), CoreError>,
    {
        let limit = self.limit_for(provider)?;
        let mut records = self.records.lock().await;
        self.reload(&mut records).await?;

        let period = self.clock.current_period();
        let mut record = Self::current(&mut records, provider, limit, period);
        f(&mut record)?;
        records.insert(provider, record);

        self.persist(&records).await?;
        Ok(record)
    }
}

#[async_trait]
impl QuotaLedger for UsageLedger {
    #[instrument(skip(self))]
    async fn check(&self, provider: ProviderId) -> Result<QuotaCheck, CoreError> {
        let limit = self.limit_for(provider)?;
        let mut records = self.records.lock().await;
        self.reload(&mut records).await?;

        let period = self.clock.current_period();
        let record = Self::current(&mut records, provider, limit, period);

        let check = QuotaCheck::from_record(provider, &record);
        debug!(used = check.used, limit = check.limit, allowed = check.allowed, "Quota checked");
        Ok(check)
    }

    #[instrument(skip(self))]
    async fn record_success(&self, provider: ProviderId) -> Result<UsageRecord, CoreError> {
        let record = self
            .mutate(provider, |record| {
                if record.is_exhausted() {
                    return Err(CoreError::LimitExceeded {
                        provider,
                        limit: record.limit,
                        period: record.period,
                    });
                }
                record.count += 1;
                Ok(())
            })
            .await?;
        debug!(used = record.count, limit = record.limit, "Usage recorded");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn reset(&self, provider: ProviderId) -> Result<UsageRecord, CoreError> {
        let record = self
            .mutate(provider, |record| {
                record.count = 0;
                Ok(())
            })
            .await?;
        info!(period = %record.period, "Usage counter reset");
        Ok(record)
    }
}
