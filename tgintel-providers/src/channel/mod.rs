//! Telegram Channel API provider.
//!
//! Free channel metadata lookups on RapidAPI; requires a key.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::channel_info_descriptor;
pub use parser::normalize_channel_info;
