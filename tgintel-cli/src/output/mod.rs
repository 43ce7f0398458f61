//! Output formatting for CLI.

mod json;
mod text;

pub use json::{ConfigOutput, JsonFormatter, KeyOutput, PathsOutput, RunOutput, SearchOutput};
pub use text::{Status, TextFormatter};
#[cfg(test)]
mod tests;
