//! Search command - run every free lookup on one target.

use anyhow::Result;
use clap::Args;
use tgintel_core::OperationReport;
use tgintel_providers::{OperationCatalog, Params, TARGET_PARAM};
use tracing::info;

use crate::context::AppContext;
use crate::output::{JsonFormatter, SearchOutput, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Username, channel or bot handle to look up.
    pub target: String,

    /// Result limit for the entity search.
    #[arg(long, short)]
    pub limit: Option<u32>,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, ctx: &AppContext, cli: &Cli) -> Result<ExitCode> {
    let target = args.target.trim();
    let reports = free_search(ctx, target, args.limit).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!(
                "{}",
                render(&formatter, ctx.dispatcher.catalog(), target, &reports)
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format(&SearchOutput {
                    target,
                    reports: &reports,
                })?
            );
        }
    }

    if reports.iter().any(OperationReport::is_success) {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::NoResult)
    }
}

/// Runs the free operations with `target` fanned out.
pub(crate) async fn free_search(
    ctx: &AppContext,
    target: &str,
    limit: Option<u32>,
) -> Vec<OperationReport> {
    let limit = match limit {
        Some(limit) => limit,
        None => ctx.settings.get().await.default_search_limit,
    };

    let mut params = Params::new();
    params.insert(TARGET_PARAM.to_string(), target.to_string());
    params.insert("limit".to_string(), limit.to_string());

    info!(query = target, limit, "Running free search");
    ctx.dispatcher.run_free(&params).await
}

/// Text rendering of a free search.
pub(crate) fn render(
    formatter: &TextFormatter,
    catalog: &OperationCatalog,
    target: &str,
    reports: &[OperationReport],
) -> String {
    let mut blocks = vec![
        formatter.heading("Free search - all free APIs"),
        format!("{} {}", formatter.bold("Target:"), formatter.cyan(target)),
    ];
    for (i, report) in reports.iter().enumerate() {
        blocks.push(String::new());
        blocks.push(formatter.format_report(i + 1, report, catalog.resolve(report.operation).ok()));
    }
    blocks.join("\n")
}
