//! Reset command - zero a metered usage counter.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tgintel_core::{CoreError, ProviderId, UsageRecord};
use tracing::info;

use crate::context::AppContext;
use crate::output::{JsonFormatter, Status, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the reset command.
#[derive(Args)]
pub struct ResetArgs {
    /// Provider to reset (default: every metered provider).
    #[arg(long, short)]
    pub provider: Option<ProviderId>,

    /// Confirm the reset.
    #[arg(long)]
    pub yes: bool,
}

#[derive(Serialize)]
struct ResetOutput {
    provider: ProviderId,
    #[serde(flatten)]
    record: UsageRecord,
}

/// Runs the reset command.
pub async fn run(args: &ResetArgs, ctx: &AppContext, cli: &Cli) -> Result<ExitCode> {
    let formatter = TextFormatter::new(!cli.no_color);

    if !args.yes {
        eprintln!(
            "{}",
            formatter.status(Status::Warning, "Refusing to reset usage without --yes")
        );
        return Ok(ExitCode::InvalidInput);
    }

    let records = reset_counters(ctx, args.provider).await?;

    match cli.format {
        OutputFormat::Text => {
            for out in &records {
                println!(
                    "{}",
                    formatter.status(
                        Status::Success,
                        &format!(
                            "Usage counter for {} reset ({}: 0/{})",
                            out.provider.display_name(),
                            out.record.period,
                            out.record.limit
                        ),
                    )
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&records)?);
        }
    }

    Ok(ExitCode::Success)
}

async fn reset_counters(
    ctx: &AppContext,
    only: Option<ProviderId>,
) -> Result<Vec<ResetOutput>, CoreError> {
    let metered = ctx.dispatcher.metered_providers();
    let providers = match only {
        Some(provider) if metered.contains(&provider) => vec![provider],
        Some(provider) => return Err(CoreError::UnknownProvider(provider.id().to_string())),
        None => metered,
    };

    let mut records = Vec::with_capacity(providers.len());
    for provider in providers {
        let record = ctx.dispatcher.reset_quota(provider).await?;
        info!(%provider, period = %record.period, "Usage counter reset");
        records.push(ResetOutput { provider, record });
    }
    Ok(records)
}

/// Resets every metered counter. Used by the interactive menu.
pub(crate) async fn reset_all(ctx: &AppContext) -> Result<Vec<ProviderId>, CoreError> {
    Ok(reset_counters(ctx, None)
        .await?
        .into_iter()
        .map(|r| r.provider)
        .collect())
}
