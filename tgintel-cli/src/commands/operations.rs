//! Operations command - list the catalog.

use anyhow::Result;
use clap::Args;
use tgintel_core::Tier;
use tgintel_providers::{OperationDescriptor, OperationSummary};

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the operations command.
#[derive(Args)]
pub struct OperationsArgs {
    /// Only show one tier (free or metered).
    #[arg(long, short)]
    pub tier: Option<Tier>,
}

/// Runs the operations command.
pub fn run(args: &OperationsArgs, ctx: &AppContext, cli: &Cli) -> Result<ExitCode> {
    let catalog = ctx.dispatcher.catalog();
    let descriptors: Vec<&OperationDescriptor> = match args.tier {
        Some(tier) => catalog.list(tier),
        None => catalog.all().iter().collect(),
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_operations_header());
            println!("{}", "─".repeat(70));
            for desc in &descriptors {
                println!("{}", formatter.format_operation_line(desc));
            }
        }
        OutputFormat::Json => {
            let summaries: Vec<OperationSummary> =
                descriptors.iter().map(|d| d.summary()).collect();
            println!("{}", JsonFormatter::new(cli.pretty).format(&summaries)?);
        }
    }

    Ok(ExitCode::Success)
}
