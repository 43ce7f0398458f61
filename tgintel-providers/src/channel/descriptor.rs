//! Telegram Channel API operation descriptors.

use tgintel_core::ProviderId;

use super::parser::normalize_channel_info;
use crate::descriptor::{OperationDescriptor, ParamKind, ParamSpec};

/// `channel_info`: public metadata of a channel.
pub fn channel_info_descriptor() -> OperationDescriptor {
    OperationDescriptor::builder("channel_info", ProviderId::TelegramChannel)
        .title("Channel Info")
        .param(ParamSpec::required(
            "channel",
            "channel",
            ParamKind::Peer,
            "Channel username",
        ))
        .path("/channel/info")
        .normalizer(normalize_channel_info)
        .build()
}
