//! Provider-related types.
//!
//! This module contains types related to upstream APIs:
//! - [`ProviderId`] - Enum of supported upstreams
//! - [`ProviderAuth`] - How requests to a provider are authenticated
//! - [`Tier`] - Free vs. metered classification of operations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Provider Id
// ============================================================================

/// Supported upstream providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderId {
    /// BotsArchive bot id lookup (no key required).
    #[serde(rename = "botsarchive")]
    BotsArchive,
    /// Telegram Channel API on RapidAPI.
    #[serde(rename = "channel")]
    TelegramChannel,
    /// Telegram Scraper API on RapidAPI (monthly quota).
    #[serde(rename = "scraper")]
    TelegramScraper,
}

impl ProviderId {
    /// Returns the stable identifier used in files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::BotsArchive => "botsarchive",
            Self::TelegramChannel => "channel",
            Self::TelegramScraper => "scraper",
        }
    }

    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BotsArchive => "BotsArchive",
            Self::TelegramChannel => "Telegram Channel API",
            Self::TelegramScraper => "Telegram Scraper API",
        }
    }

    /// Returns the API host requests are sent to.
    pub fn host(&self) -> &'static str {
        match self {
            Self::BotsArchive => "botsarchive.com",
            Self::TelegramChannel => "telegram-channel.p.rapidapi.com",
            Self::TelegramScraper => "telegram-scraper-api.p.rapidapi.com",
        }
    }

    /// Returns how requests to this provider are authenticated.
    pub fn auth(&self) -> ProviderAuth {
        match self {
            Self::BotsArchive => ProviderAuth::None,
            Self::TelegramChannel | Self::TelegramScraper => ProviderAuth::RapidApi,
        }
    }

    /// Returns true if a credential must be configured before calling this provider.
    pub fn requires_credential(&self) -> bool {
        self.auth() != ProviderAuth::None
    }

    /// Default monthly call budget, or `None` for unmetered providers.
    pub fn default_monthly_limit(&self) -> Option<u32> {
        match self {
            Self::TelegramScraper => Some(15),
            Self::BotsArchive | Self::TelegramChannel => None,
        }
    }

    /// Where a user signs up for a key, if the provider needs one.
    pub fn signup_url(&self) -> Option<&'static str> {
        match self {
            Self::BotsArchive => None,
            Self::TelegramChannel => {
                Some("https://rapidapi.com/akrakoro-akrakoro-default/api/telegram-channel")
            }
            Self::TelegramScraper => Some("https://rapidapi.com/nyansterowo/api/telegram-scraper-api"),
        }
    }

    /// Returns all providers.
    pub fn all() -> &'static [ProviderId] {
        &[Self::BotsArchive, Self::TelegramChannel, Self::TelegramScraper]
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.id() == needle)
            .ok_or_else(|| CoreError::UnknownProvider(s.trim().to_string()))
    }
}

// ============================================================================
// Provider Auth
// ============================================================================

/// Authentication scheme for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderAuth {
    /// Anonymous access.
    None,
    /// RapidAPI `x-rapidapi-host` / `x-rapidapi-key` header pair.
    RapidApi,
}

// ============================================================================
// Tier
// ============================================================================

/// Whether an operation is free or counts against a monthly quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Unmetered.
    Free,
    /// Quota-limited.
    Metered,
}

impl Tier {
    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Metered => "metered",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "metered" | "paid" => Ok(Self::Metered),
            other => Err(format!("unknown tier '{other}', expected free or metered")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_roundtrip() {
        for provider in ProviderId::all() {
            let parsed: ProviderId = provider.id().parse().unwrap();
            assert_eq!(parsed, *provider);
        }
    }

    #[test]
    fn test_provider_id_parse_is_case_insensitive() {
        assert_eq!(" Scraper ".parse::<ProviderId>().unwrap(), ProviderId::TelegramScraper);
    }

    #[test]
    fn test_unknown_provider() {
        let err = "telegraph".parse::<ProviderId>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownProvider(ref name) if name == "telegraph"));
    }

    #[test]
    fn test_only_scraper_is_metered_by_default() {
        assert_eq!(ProviderId::TelegramScraper.default_monthly_limit(), Some(15));
        assert_eq!(ProviderId::BotsArchive.default_monthly_limit(), None);
        assert_eq!(ProviderId::TelegramChannel.default_monthly_limit(), None);
    }

    #[test]
    fn test_credential_requirement() {
        assert!(!ProviderId::BotsArchive.requires_credential());
        assert!(ProviderId::TelegramChannel.requires_credential());
        assert!(ProviderId::TelegramScraper.requires_credential());
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("paid".parse::<Tier>().unwrap(), Tier::Metered);
        assert_eq!("FREE".parse::<Tier>().unwrap(), Tier::Free);
        assert!("gold".parse::<Tier>().is_err());
    }
}
