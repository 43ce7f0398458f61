//! Operation catalog.
//!
//! The catalog is the single lookup point from operation name to
//! [`OperationDescriptor`]. The built-in catalog is initialized lazily and
//! shared for the life of the process.

use std::collections::HashSet;
use std::sync::OnceLock;
use tgintel_core::{CoreError, ProviderId, Tier};
use thiserror::Error;

use crate::botsarchive::bot_id_lookup_descriptor;
use crate::channel::channel_info_descriptor;
use crate::descriptor::OperationDescriptor;
use crate::scraper::{
    check_participant_descriptor, entity_search_descriptor, fetch_entity_descriptor,
    fetch_full_channel_descriptor, fetch_full_user_descriptor, fetch_online_users_descriptor,
    fetch_stories_descriptor, search_by_phone_descriptor, search_entities_descriptor,
};

// ============================================================================
// Static Catalog
// ============================================================================

/// Static storage for the built-in catalog.
static BUILTIN: OnceLock<OperationCatalog> = OnceLock::new();

/// All built-in descriptors in registration order.
///
/// Free operations come first, in the order the aggregate search runs them.
fn init_descriptors() -> Vec<OperationDescriptor> {
    vec![
        // Free
        bot_id_lookup_descriptor(),
        channel_info_descriptor(),
        entity_search_descriptor(),
        // Metered
        check_participant_descriptor(),
        fetch_entity_descriptor(),
        fetch_full_user_descriptor(),
        fetch_full_channel_descriptor(),
        search_by_phone_descriptor(),
        fetch_online_users_descriptor(),
        fetch_stories_descriptor(),
        search_entities_descriptor(),
    ]
}

/// Problems with a custom descriptor list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two descriptors share a name.
    #[error("Duplicate operation: {0}")]
    DuplicateOperation(&'static str),

    /// A metered operation targets a provider without a monthly budget.
    #[error("Metered operation {operation} targets unmetered provider {provider}")]
    UnmeteredProvider {
        /// Operation name.
        operation: &'static str,
        /// Provider without a budget.
        provider: ProviderId,
    },
}

// ============================================================================
// Operation Catalog
// ============================================================================

/// Ordered, name-unique set of operation descriptors.
#[derive(Debug, Clone)]
pub struct OperationCatalog {
    descriptors: Vec<OperationDescriptor>,
}

impl OperationCatalog {
    /// Returns the built-in catalog.
    pub fn builtin() -> &'static OperationCatalog {
        BUILTIN.get_or_init(|| OperationCatalog {
            descriptors: init_descriptors(),
        })
    }

    /// Builds a catalog from custom descriptors, keeping their order.
    pub fn new(descriptors: Vec<OperationDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for desc in &descriptors {
            if !seen.insert(desc.name) {
                return Err(CatalogError::DuplicateOperation(desc.name));
            }
            if desc.is_metered() && desc.provider.default_monthly_limit().is_none() {
                return Err(CatalogError::UnmeteredProvider {
                    operation: desc.name,
                    provider: desc.provider,
                });
            }
        }
        Ok(Self { descriptors })
    }

    /// Looks up an operation by name.
    pub fn resolve(&self, name: &str) -> Result<&OperationDescriptor, CoreError> {
        self.descriptors
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| CoreError::UnknownOperation(name.to_string()))
    }

    /// Descriptors of one tier, in registration order.
    pub fn list(&self, tier: Tier) -> Vec<&OperationDescriptor> {
        self.descriptors.iter().filter(|d| d.tier == tier).collect()
    }

    /// Every descriptor, in registration order.
    pub fn all(&self) -> &[OperationDescriptor] {
        &self.descriptors
    }

    /// Distinct providers referenced by metered operations.
    pub fn metered_providers(&self) -> Vec<ProviderId> {
        let mut providers: Vec<ProviderId> = Vec::new();
        for desc in self.list(Tier::Metered) {
            if !providers.contains(&desc.provider) {
                providers.push(desc.provider);
            }
        }
        providers
    }

    /// Returns the number of registered operations.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no operation is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
