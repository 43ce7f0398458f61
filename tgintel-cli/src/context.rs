//! Wiring of stores, transport and dispatcher for one CLI invocation.

use anyhow::Result;
use std::sync::Arc;
use tgintel_fetch::{HttpTransport, Transport};
use tgintel_providers::Dispatcher;
use tgintel_store::{CredentialStore, DataPaths, SettingsStore, UsageLedger};
use tracing::debug;

/// Everything a command needs.
pub struct AppContext {
    /// Data file locations.
    pub paths: DataPaths,
    /// User preferences.
    pub settings: SettingsStore,
    /// API keys, shared with the dispatcher.
    pub credentials: Arc<CredentialStore>,
    /// Operation dispatcher.
    pub dispatcher: Dispatcher,
}

impl AppContext {
    /// Opens the stores under `paths` with the production HTTP transport.
    pub async fn open(paths: DataPaths, settings: SettingsStore) -> Result<Self> {
        let timeout = settings.get().await.request_timeout();
        let transport = Arc::new(HttpTransport::new(timeout)?);
        Self::with_transport(paths, settings, transport).await
    }

    /// Opens the stores under `paths` with a caller-supplied transport.
    pub async fn with_transport(
        paths: DataPaths,
        settings: SettingsStore,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let limits = settings.get().await.monthly_limits;
        let credentials = Arc::new(CredentialStore::load(paths.credentials()).await?);
        let ledger = Arc::new(UsageLedger::open(paths.usage(), limits));

        debug!(
            root = %paths.root().display(),
            keys = credentials.configured().len(),
            "Context ready"
        );

        let dispatcher = Dispatcher::new(credentials.clone(), ledger, transport);
        Ok(Self {
            paths,
            settings,
            credentials,
            dispatcher,
        })
    }
}
