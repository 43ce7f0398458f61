//! Usage command - show this month's metered usage.

use anyhow::Result;
use tgintel_core::{CoreError, QuotaCheck};

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Runs the usage command.
pub async fn run(ctx: &AppContext, cli: &Cli) -> Result<ExitCode> {
    let checks = quota_checks(ctx).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", render(&formatter, &checks));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format_usage(&checks)?);
        }
    }

    Ok(ExitCode::Success)
}

/// Quota state of every metered provider.
pub(crate) async fn quota_checks(ctx: &AppContext) -> Result<Vec<QuotaCheck>, CoreError> {
    let mut checks = Vec::new();
    for provider in ctx.dispatcher.metered_providers() {
        checks.push(ctx.dispatcher.quota(provider).await?);
    }
    Ok(checks)
}

/// Text rendering of the usage statistics.
pub(crate) fn render(formatter: &TextFormatter, checks: &[QuotaCheck]) -> String {
    let mut blocks = vec![formatter.heading("Usage statistics")];
    for check in checks {
        blocks.push(String::new());
        blocks.push(formatter.format_quota(check));
    }
    blocks.join("\n")
}
