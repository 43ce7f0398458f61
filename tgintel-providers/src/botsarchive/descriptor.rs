//! BotsArchive operation descriptors.

use tgintel_core::ProviderId;

use super::parser::normalize_bot_id;
use crate::descriptor::{OperationDescriptor, ParamKind, ParamSpec};

/// `bot_id_lookup`: numeric id of a bot by username.
pub fn bot_id_lookup_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("bot_id_lookup", ProviderId::BotsArchive)
        .title("Bot ID Lookup")
        .param(ParamSpec::required(
            "username",
            "username",
            ParamKind::BotHandle,
            "Bot username",
        ))
        .path("/getBotID.php")
        .normalizer(normalize_bot_id)
        .build()
}
