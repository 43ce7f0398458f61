//! BotsArchive provider.
//!
//! Free, unauthenticated bot id lookups against `botsarchive.com`.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::bot_id_lookup_descriptor;
pub use parser::normalize_bot_id;
