//! Run command - dispatch a single operation.

use anyhow::Result;
use clap::Args;
use tgintel_core::CoreError;
use tgintel_providers::Params;
use tracing::debug;

use super::{apply_default_limit, exit_code_for};
use crate::context::AppContext;
use crate::output::{JsonFormatter, RunOutput, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Operation name (see `tgintel operations`).
    pub operation: String,

    /// Parameters as `name=value` pairs.
    #[arg(value_name = "NAME=VALUE")]
    pub params: Vec<String>,
}

/// Runs the run command.
pub async fn run(args: &RunArgs, ctx: &AppContext, cli: &Cli) -> Result<ExitCode> {
    let desc = ctx.dispatcher.catalog().resolve(&args.operation)?;
    let mut params = parse_pairs(desc.name, &args.params)?;
    apply_default_limit(desc, &mut params, ctx.settings.get().await.default_search_limit);

    debug!(operation = desc.name, params = ?params.keys().collect::<Vec<_>>(), "Dispatching");
    let outcome = ctx.dispatcher.execute(desc.name, &params).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_outcome(desc, &outcome));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format(&RunOutput {
                    operation: desc.name,
                    result: &outcome,
                })?
            );
        }
    }

    Ok(exit_code_for(&outcome))
}

/// Parses `name=value` arguments. Later duplicates win.
fn parse_pairs(operation: &str, raw: &[String]) -> Result<Params, CoreError> {
    let mut params = Params::new();
    for pair in raw {
        let Some((name, value)) = pair.split_once('=') else {
            return Err(CoreError::InvalidParameter {
                operation: operation.to_string(),
                parameter: pair.clone(),
                reason: "expected name=value".to_string(),
            });
        };
        params.insert(name.trim().to_string(), value.to_string());
    }
    Ok(params)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_pairs() {
        let params = parse_pairs("x", &strings(&["username=durov", " limit =5"])).unwrap();
        assert_eq!(params.get("username").map(String::as_str), Some("durov"));
        assert_eq!(params.get("limit").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_parse_pairs_keeps_equals_in_value() {
        let params = parse_pairs("x", &strings(&["query=a=b"])).unwrap();
        assert_eq!(params.get("query").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_parse_pairs_rejects_bare_word() {
        let err = parse_pairs("fetch_entity", &strings(&["durov"])).unwrap_err();
        assert!(err.is_validation());
    }
}
