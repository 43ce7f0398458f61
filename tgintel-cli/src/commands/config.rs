//! Config command - manage keys and settings.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use tgintel_core::{CoreError, ProviderId};
use tracing::info;

use crate::context::AppContext;
use crate::output::{ConfigOutput, JsonFormatter, KeyOutput, PathsOutput, Status, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show key status and settings.
    Show,

    /// Show data file paths.
    Path,

    /// Store an API key.
    SetKey {
        /// Provider (channel or scraper).
        provider: ProviderId,
        /// The key. Read from stdin when omitted.
        key: Option<String>,
    },

    /// Forget an API key.
    RemoveKey {
        /// Provider (channel or scraper).
        provider: ProviderId,
    },

    /// Set the monthly call budget of a metered provider.
    SetLimit {
        /// Metered provider.
        provider: ProviderId,
        /// Calls per month.
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },

    /// Reset settings to defaults. Keys and usage are kept.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, ctx: &AppContext, cli: &Cli) -> Result<ExitCode> {
    let formatter = TextFormatter::new(!cli.no_color);
    match &args.action {
        ConfigAction::Show => show_config(ctx, cli, &formatter).await?,
        ConfigAction::Path => show_paths(ctx, cli)?,
        ConfigAction::SetKey { provider, key } => {
            let key = match key {
                Some(key) => key.clone(),
                None => read_key(*provider)?,
            };
            let preview = set_key(ctx, *provider, &key).await?;
            println!(
                "{}",
                formatter.status(
                    Status::Success,
                    &format!("{} key saved ({preview})", provider.display_name())
                )
            );
        }
        ConfigAction::RemoveKey { provider } => {
            let removed = ctx.credentials.remove(*provider);
            if removed {
                ctx.credentials.save().await?;
                println!(
                    "{}",
                    formatter.status(
                        Status::Success,
                        &format!("{} key removed", provider.display_name())
                    )
                );
            } else {
                println!(
                    "{}",
                    formatter.status(
                        Status::Info,
                        &format!("No {} key configured", provider.display_name())
                    )
                );
            }
        }
        ConfigAction::SetLimit { provider, limit } => {
            set_limit(ctx, *provider, *limit).await?;
            println!(
                "{}",
                formatter.status(
                    Status::Success,
                    &format!("{} monthly limit set to {limit}", provider.display_name())
                )
            );
        }
        ConfigAction::Reset => {
            ctx.settings.reset().await;
            ctx.settings.save().await?;
            info!(path = %ctx.settings.path().display(), "Settings reset");
            println!(
                "{}",
                formatter.status(Status::Success, "Settings reset to defaults")
            );
        }
    }
    Ok(ExitCode::Success)
}

async fn show_config(ctx: &AppContext, cli: &Cli, formatter: &TextFormatter) -> Result<()> {
    let settings = ctx.settings.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", render_key_status(ctx, formatter));
            println!();
            println!("{}", formatter.bold("Settings"));
            for (provider, limit) in &settings.monthly_limits {
                println!("  Monthly limit ({provider}): {limit}");
            }
            println!("  Request timeout:      {}s", settings.request_timeout_secs);
            println!("  Default search limit: {}", settings.default_search_limit);
            println!("  Log level:            {}", settings.log_level);
            println!();
            println!(
                "{}",
                formatter.dim(&format!("Data dir: {}", ctx.paths.root().display()))
            );
        }
        OutputFormat::Json => {
            let keys: BTreeMap<ProviderId, KeyOutput> = ProviderId::all()
                .iter()
                .filter(|p| p.requires_credential())
                .map(|p| {
                    let preview = ctx.credentials.masked(*p);
                    (
                        *p,
                        KeyOutput {
                            configured: preview.is_some(),
                            preview,
                        },
                    )
                })
                .collect();
            let output = ConfigOutput {
                paths: PathsOutput::from(&ctx.paths),
                keys,
                settings: &settings,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

fn show_paths(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let paths = PathsOutput::from(&ctx.paths);
    match cli.format {
        OutputFormat::Text => {
            println!("Data dir:         {}", paths.data_dir);
            println!("Credentials file: {}", paths.credentials_file);
            println!("Usage file:       {}", paths.usage_file);
            println!("Settings file:    {}", paths.settings_file);
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }
    Ok(())
}

/// Key status of every provider.
pub(crate) fn render_key_status(ctx: &AppContext, formatter: &TextFormatter) -> String {
    let mut lines = vec![formatter.heading("Configuration status")];
    for provider in ProviderId::all() {
        let masked = ctx.credentials.masked(*provider);
        lines.push(formatter.format_key_status(*provider, masked.as_deref()));
    }
    lines.join("\n")
}

/// Stores and persists a key. Returns its masked preview.
pub(crate) async fn set_key(
    ctx: &AppContext,
    provider: ProviderId,
    key: &str,
) -> Result<String, CoreError> {
    if !provider.requires_credential() {
        return Err(CoreError::InvalidParameter {
            operation: "set-key".to_string(),
            parameter: provider.id().to_string(),
            reason: "this provider does not use an API key".to_string(),
        });
    }
    ctx.credentials.set(provider, key)?;
    ctx.credentials.save().await?;
    info!(%provider, "API key configured");
    Ok(ctx.credentials.masked(provider).unwrap_or_default())
}

async fn set_limit(ctx: &AppContext, provider: ProviderId, limit: u32) -> Result<(), CoreError> {
    if !ctx.dispatcher.metered_providers().contains(&provider) {
        return Err(CoreError::InvalidParameter {
            operation: "set-limit".to_string(),
            parameter: provider.id().to_string(),
            reason: "this provider is not metered".to_string(),
        });
    }
    ctx.settings.set_monthly_limit(provider, limit).await;
    ctx.settings.save().await?;
    info!(%provider, limit, "Monthly limit updated");
    Ok(())
}

/// Reads a key from stdin so it stays out of shell history.
fn read_key(provider: ProviderId) -> Result<String> {
    eprint!("Enter {} API key: ", provider.display_name());
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
