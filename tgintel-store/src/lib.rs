// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `TgIntel` Store
//!
//! Persistent state for `TgIntel`.
//!
//! This crate provides:
//!
//! - **`CredentialStore`**: API keys per provider, implements `Credentials`
//! - **`UsageLedger`**: Monthly call budgets, implements `QuotaLedger`
//! - **`SettingsStore`**: User preferences
//! - **Persistence**: Atomic, owner-only JSON files under `~/.tgintel`
//!
//! ## Usage
//!
//! ```ignore
//! use tgintel_store::{CredentialStore, DataPaths, UsageLedger, default_limits};
//!
//! let paths = DataPaths::default();
//! let credentials = CredentialStore::load(paths.credentials()).await?;
//! let ledger = UsageLedger::open(paths.usage(), default_limits());
//!
//! let check = ledger.check(ProviderId::TelegramScraper).await?;
//! println!("{} calls left", check.remaining);
//! ```

pub mod clock;
pub mod credential_store;
pub mod error;
pub mod persistence;
pub mod settings_store;
pub mod usage_ledger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credential_store::CredentialStore;
pub use error::StoreError;
pub use persistence::{
    DataPaths, default_data_dir, ensure_dir, load_json, load_json_if_exists, save_json,
};
pub use settings_store::{LogLevel, Settings, SettingsStore};
pub use usage_ledger::{MonthlyLimits, UsageFile, UsageLedger, default_limits};
