//! Telegram Scraper API operation descriptors.

use tgintel_core::ProviderId;

use super::parser::{normalize_collection, normalize_entity, normalize_participant, normalize_search};
use crate::descriptor::{OperationDescriptor, ParamKind, ParamSpec};

const SCRAPER: ProviderId = ProviderId::TelegramScraper;

const QUERY: ParamSpec = ParamSpec::required("query", "q", ParamKind::Text, "Search query");
const LIMIT: ParamSpec = ParamSpec::optional("limit", "limit", ParamKind::Count, "10", "Result limit");
const USERNAME: ParamSpec = ParamSpec::required("username", "peer", ParamKind::Peer, "Username");

// ============================================================================
// Free
// ============================================================================

/// `entity_search`: free-tier entity search.
pub fn entity_search_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("entity_search", SCRAPER)
        .title("Entity Search")
        .param(QUERY)
        .param(LIMIT)
        .path("/entity/search")
        .normalizer(normalize_search)
        .build()
}

// ============================================================================
// Metered
// ============================================================================

/// `check_participant`: whether a user is a member of a chat.
pub fn check_participant_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("check_participant", SCRAPER)
        .title("Check Participant Status")
        .metered()
        .param(ParamSpec::required("peer", "peer", ParamKind::Peer, "Group or channel"))
        .param(ParamSpec::required(
            "participant",
            "participant",
            ParamKind::Peer,
            "Participant username",
        ))
        .path("/entity/get-participant")
        .normalizer(normalize_participant)
        .build()
}

/// `fetch_entity`: basic entity lookup by username.
pub fn fetch_entity_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("fetch_entity", SCRAPER)
        .title("Fetch Entity by Username")
        .metered()
        .param(USERNAME)
        .path("/entity/fetch")
        .normalizer(normalize_entity)
        .build()
}

/// `fetch_full_user`: full profile of a user.
pub fn fetch_full_user_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("fetch_full_user", SCRAPER)
        .title("Fetch Full User Info")
        .metered()
        .param(USERNAME)
        .path("/user/full")
        .normalizer(normalize_entity)
        .build()
}

/// `fetch_full_channel`: full profile of a channel.
pub fn fetch_full_channel_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("fetch_full_channel", SCRAPER)
        .title("Fetch Full Channel Info")
        .metered()
        .param(ParamSpec::required("channel", "peer", ParamKind::Peer, "Channel username"))
        .path("/entity/fullchannel")
        .normalizer(normalize_entity)
        .build()
}

/// `search_by_phone`: resolve a phone number to a user.
pub fn search_by_phone_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("search_by_phone", SCRAPER)
        .title("Search User by Phone")
        .metered()
        .param(ParamSpec::required(
            "phone",
            "phone",
            ParamKind::Phone,
            "Phone number (with country code)",
        ))
        .path("/user/search-by-phone")
        .normalizer(normalize_entity)
        .build()
}

/// `fetch_online_users`: members of a group currently online.
pub fn fetch_online_users_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("fetch_online_users", SCRAPER)
        .title("Fetch Online Users")
        .metered()
        .param(ParamSpec::required("group", "peer", ParamKind::Peer, "Group username"))
        .path("/entity/online")
        .normalizer(normalize_collection)
        .build()
}

/// `fetch_stories`: active stories of a user or channel.
pub fn fetch_stories_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("fetch_stories", SCRAPER)
        .title("Fetch Stories")
        .metered()
        .param(USERNAME)
        .param(ParamSpec::optional(
            "without_media",
            "withoutMedia",
            ParamKind::Flag,
            "false",
            "Skip media",
        ))
        .path("/stories/fetch")
        .normalizer(normalize_collection)
        .build()
}

/// `search_entities`: metered entity search.
pub fn search_entities_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("search_entities", SCRAPER)
        .title("Search Entities")
        .metered()
        .param(QUERY)
        .param(LIMIT)
        .path("/entity/search")
        .normalizer(normalize_search)
        .build()
}
