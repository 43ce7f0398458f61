//! Telegram Scraper API provider.
//!
//! RapidAPI service with one free search endpoint and a set of metered
//! lookups that share a monthly budget.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::{
    check_participant_descriptor, entity_search_descriptor, fetch_entity_descriptor,
    fetch_full_channel_descriptor, fetch_full_user_descriptor, fetch_online_users_descriptor,
    fetch_stories_descriptor, search_by_phone_descriptor, search_entities_descriptor,
};
pub use parser::{normalize_collection, normalize_entity, normalize_participant, normalize_search};
