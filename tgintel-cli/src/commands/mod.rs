//! CLI command implementations.

pub mod config;
pub mod menu;
pub mod operations;
pub mod reset;
pub mod run;
pub mod search;
pub mod usage;

use tgintel_core::Outcome;
use tgintel_providers::{OperationDescriptor, Params};

use crate::ExitCode;

/// Parameter filled from `default_search_limit` when omitted.
const LIMIT_PARAM: &str = "limit";

/// Fills `limit` from settings for operations that declare it.
pub(crate) fn apply_default_limit(desc: &OperationDescriptor, params: &mut Params, default: u32) {
    if desc.param(LIMIT_PARAM).is_some() {
        params
            .entry(LIMIT_PARAM.to_string())
            .or_insert_with(|| default.to_string());
    }
}

/// Exit code of a single dispatch.
pub(crate) fn exit_code_for(outcome: &Outcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::Success
    } else {
        ExitCode::NoResult
    }
}
