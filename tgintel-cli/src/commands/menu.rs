//! Interactive menu.
//!
//! The menu only ever looks at [`Outcome`](tgintel_core::Outcome)s and
//! quota checks returned by the dispatcher; it never touches the ledger.

use anyhow::Result;
use std::io::{BufRead, Write};
use tgintel_core::{ProviderId, Tier};
use tgintel_providers::{OperationDescriptor, Params};
use tracing::debug;

use super::{apply_default_limit, config, reset, search, usage};
use crate::context::AppContext;
use crate::output::{Status, TextFormatter};
use crate::{Cli, ExitCode};

/// Runs the interactive menu on stdin/stdout.
pub async fn run(ctx: &AppContext, cli: &Cli) -> Result<ExitCode> {
    let stdin = std::io::stdin();
    let mut menu = Menu::new(
        ctx,
        TextFormatter::new(!cli.no_color),
        stdin.lock(),
        std::io::stdout(),
    );
    menu.run().await?;
    Ok(ExitCode::Success)
}

/// Menu state over an input and an output stream.
pub struct Menu<'a, R, W> {
    ctx: &'a AppContext,
    fmt: TextFormatter,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    /// Creates a menu.
    pub fn new(ctx: &'a AppContext, fmt: TextFormatter, input: R, out: W) -> Self {
        Self {
            ctx,
            fmt,
            input,
            out,
        }
    }

    /// Main loop. Returns on `0` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        if self.ctx.credentials.configured().is_empty() {
            let line = self.fmt.status(
                Status::Warning,
                "No API keys configured. Some features will be limited; use 'C' to add them.",
            );
            writeln!(self.out, "{line}")?;
        }

        loop {
            self.print_main_menu().await?;
            let Some(choice) = self.prompt("Select option:")? else {
                break;
            };

            match choice.to_uppercase().as_str() {
                "0" | "Q" => break,
                "1" => self.free_search().await?,
                "2" => self.metered_menu().await?,
                "C" => self.configure_keys().await?,
                "V" => self.view_config()?,
                "U" => self.view_usage().await?,
                "R" => self.reset_usage().await?,
                other => {
                    debug!(choice = other, "Unknown menu choice");
                    let line = self.fmt.status(Status::Error, "Invalid option");
                    writeln!(self.out, "{line}")?;
                }
            }
        }

        writeln!(self.out, "\nExiting...")?;
        Ok(())
    }

    // ========================================================================
    // Screens
    // ========================================================================

    async fn print_main_menu(&mut self) -> Result<()> {
        let mut lines = vec![String::new(), self.fmt.heading("Main menu")];

        for provider in self.ctx.dispatcher.metered_providers() {
            if self.ctx.dispatcher.has_credential(provider) {
                let check = self.ctx.dispatcher.quota(provider).await?;
                lines.push(format!(
                    "{} {}",
                    self.fmt.bold(&format!("{}:", provider.display_name())),
                    self.fmt.format_remaining(&check)
                ));
            } else {
                lines.push(self.fmt.status(
                    Status::Warning,
                    &format!("{} key not configured", provider.display_name()),
                ));
            }
        }

        lines.extend([
            String::new(),
            format!("  1. Free search (all free APIs)   {}", self.fmt.dim("[unlimited]")),
            format!("  2. Metered operations            {}", self.fmt.dim("[requires API key]")),
            String::new(),
            "  C. Configure API keys".to_string(),
            "  V. View configuration status".to_string(),
            "  U. View usage stats".to_string(),
            "  R. Reset usage counter".to_string(),
            "  0. Exit".to_string(),
            String::new(),
        ]);
        writeln!(self.out, "{}", lines.join("\n"))?;
        Ok(())
    }

    async fn free_search(&mut self) -> Result<()> {
        let Some(target) = self.prompt("Enter username/ID to search:")? else {
            return Ok(());
        };
        if target.is_empty() {
            return Ok(());
        }

        let reports = search::free_search(self.ctx, &target, None).await;
        let text = search::render(&self.fmt, self.ctx.dispatcher.catalog(), &target, &reports);
        writeln!(self.out, "\n{text}")?;
        Ok(())
    }

    async fn metered_menu(&mut self) -> Result<()> {
        let ctx = self.ctx;
        let ops: Vec<&OperationDescriptor> = ctx.dispatcher.catalog().list(Tier::Metered);

        let providers = ctx.dispatcher.metered_providers();
        if !providers.iter().any(|p| ctx.dispatcher.has_credential(*p)) {
            let line = self.fmt.status(
                Status::Error,
                "Metered API key not configured. Use option 'C' to configure.",
            );
            writeln!(self.out, "{line}")?;
            return Ok(());
        }

        loop {
            let mut lines = vec![String::new(), self.fmt.heading("Metered operations")];
            for provider in &providers {
                let check = ctx.dispatcher.quota(*provider).await?;
                lines.push(format!(
                    "{} {}",
                    self.fmt.bold("Remaining calls:"),
                    self.fmt.format_remaining(&check)
                ));
            }
            lines.push(String::new());
            for (i, desc) in ops.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, desc.title));
            }
            lines.push(String::new());
            lines.push("  0. Back to main menu".to_string());
            writeln!(self.out, "{}", lines.join("\n"))?;

            let Some(choice) = self.prompt("Select metered operation:")? else {
                return Ok(());
            };
            if choice == "0" {
                return Ok(());
            }

            let selected = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| ops.get(i).copied());
            match selected {
                Some(desc) => self.run_operation(desc).await?,
                None => {
                    let line = self.fmt.status(Status::Error, "Invalid option");
                    writeln!(self.out, "{line}")?;
                }
            }
        }
    }

    async fn run_operation(&mut self, desc: &OperationDescriptor) -> Result<()> {
        let mut params = Params::new();
        for param in &desc.params {
            let label = match param.default {
                Some(default) => format!("{} [{default}]:", param.prompt),
                None => format!("{}:", param.prompt),
            };
            let Some(value) = self.prompt(&label)? else {
                return Ok(());
            };
            if !value.is_empty() {
                params.insert(param.name.to_string(), value);
            }
        }
        let default_limit = self.ctx.settings.get().await.default_search_limit;
        apply_default_limit(desc, &mut params, default_limit);

        match self.ctx.dispatcher.execute(desc.name, &params).await {
            Ok(outcome) => {
                let text = self.fmt.format_outcome(desc, &outcome);
                writeln!(self.out, "\n{text}")?;
            }
            Err(e) if e.is_validation() => {
                let line = self.fmt.format_error(&e.to_string());
                writeln!(self.out, "{line}")?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    async fn configure_keys(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}", self.fmt.heading("API key configuration"))?;

        let mut changed = false;
        for provider in ProviderId::all().iter().filter(|p| p.requires_credential()) {
            writeln!(self.out)?;
            if let Some(url) = provider.signup_url() {
                writeln!(self.out, "{}", self.fmt.dim(&format!("Get a key at {url}")))?;
            }

            if let Some(preview) = self.ctx.credentials.masked(*provider) {
                writeln!(
                    self.out,
                    "Current {} key: {preview}",
                    provider.display_name()
                )?;
                let Some(answer) = self.prompt("Update? (y/n):")? else {
                    break;
                };
                if !answer.eq_ignore_ascii_case("y") {
                    continue;
                }
            }

            let label = format!("Enter {} key (Enter to skip):", provider.display_name());
            let Some(key) = self.prompt(&label)? else {
                break;
            };
            if key.is_empty() {
                continue;
            }

            self.ctx.credentials.set(*provider, &key)?;
            changed = true;
            let line = self.fmt.status(
                Status::Success,
                &format!("{} key updated", provider.display_name()),
            );
            writeln!(self.out, "{line}")?;
        }

        if changed {
            self.ctx.credentials.save().await?;
            let line = self.fmt.status(
                Status::Success,
                &format!(
                    "Configuration saved to {}",
                    self.ctx.paths.credentials().display()
                ),
            );
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn view_config(&mut self) -> Result<()> {
        let text = config::render_key_status(self.ctx, &self.fmt);
        writeln!(self.out, "\n{text}")?;
        let path = format!("Config file: {}", self.ctx.paths.credentials().display());
        writeln!(self.out, "\n{}", self.fmt.dim(&path))?;
        Ok(())
    }

    async fn view_usage(&mut self) -> Result<()> {
        let checks = usage::quota_checks(self.ctx).await?;
        let text = usage::render(&self.fmt, &checks);
        writeln!(self.out, "\n{text}")?;
        Ok(())
    }

    async fn reset_usage(&mut self) -> Result<()> {
        writeln!(self.out, "\nAre you sure you want to reset the usage counter?")?;
        let confirm = self.prompt("Type 'YES' to confirm:")?;

        if confirm.as_deref() == Some("YES") {
            reset::reset_all(self.ctx).await?;
            let line = self.fmt.status(Status::Success, "Usage counter reset successfully");
            writeln!(self.out, "{line}")?;
        } else {
            let line = self.fmt.status(Status::Info, "Reset cancelled");
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Prints `label` and reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{} ", self.fmt.cyan(label))?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tgintel_core::Period;
    use tgintel_fetch::ScriptedTransport;
    use tgintel_store::{DataPaths, SettingsStore};

    const SCRAPER: ProviderId = ProviderId::TelegramScraper;

    async fn context(dir: &TempDir, transport: Arc<ScriptedTransport>) -> AppContext {
        let paths = DataPaths::new(dir.path());
        let settings = SettingsStore::new(paths.settings());
        AppContext::with_transport(paths, settings, transport)
            .await
            .unwrap()
    }

    async fn drive(ctx: &AppContext, input: &str) -> String {
        let mut out = Vec::new();
        Menu::new(ctx, TextFormatter::new(false), Cursor::new(input.to_string()), &mut out)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_exit_and_end_of_input() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, Arc::new(ScriptedTransport::new())).await;

        let output = drive(&ctx, "0\n").await;
        assert!(output.contains("[MAIN MENU]"));
        assert!(output.contains("No API keys configured"));
        assert!(output.ends_with("Exiting...\n"));

        let output = drive(&ctx, "").await;
        assert!(output.contains("Exiting..."));
    }

    #[tokio::test]
    async fn test_free_search_without_keys() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({"id": 123_456, "username": "@examplebot"}));
        let ctx = context(&dir, transport.clone()).await;

        let output = drive(&ctx, "1\nexamplebot\n0\n").await;

        assert!(output.contains("Target: examplebot"));
        assert!(output.contains("\"bot_id\": 123456"));
        assert!(output.contains("Telegram Channel API key not configured"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_metered_menu_requires_key() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        let ctx = context(&dir, transport.clone()).await;

        let output = drive(&ctx, "2\n0\n").await;
        assert!(output.contains("Metered API key not configured"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_metered_operation_consumes_one_call() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({"id": 1, "username": "durov"}));
        let ctx = context(&dir, transport.clone()).await;
        ctx.credentials.set(SCRAPER, "scraper-secret-key").unwrap();

        // metered menu, "Fetch Entity by Username", username, back, exit
        let output = drive(&ctx, "2\n2\n@durov\n0\n0\n").await;

        assert!(output.contains("[METERED OPERATIONS]"));
        assert!(output.contains("\"username\": \"durov\""));
        assert!(output.contains("14/15 remaining"));
        assert!(!output.contains("scraper-secret-key"));
        assert_eq!(ctx.dispatcher.quota(SCRAPER).await.unwrap().used, 1);
    }

    #[tokio::test]
    async fn test_metered_missing_parameter_is_reported() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        let ctx = context(&dir, transport.clone()).await;
        ctx.credentials.set(SCRAPER, "scraper-secret-key").unwrap();

        let output = drive(&ctx, "2\n3\n\n0\n0\n").await;
        assert!(output.contains("[!] Missing parameter 'username'"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_configure_keys_persists_and_masks() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, Arc::new(ScriptedTransport::new())).await;

        // channel key, then skip scraper, then view config
        let output = drive(&ctx, "C\nchan-key-123456\n\nV\n0\n").await;

        assert!(output.contains("Telegram Channel API key updated"));
        assert!(output.contains("Telegram Channel API: Configured (chan…)"));
        assert!(output.contains("Telegram Scraper API: Not configured"));
        assert!(!output.contains("chan-key-123456"));
        assert!(DataPaths::new(dir.path()).credentials().exists());
    }

    #[tokio::test]
    async fn test_reset_requires_exact_confirmation() {
        let dir = TempDir::new().unwrap();
        let period = Period::from_date(Local::now().date_naive());
        std::fs::write(
            DataPaths::new(dir.path()).usage(),
            format!(r#"{{"scraper":{{"period":"{period}","count":7,"limit":15}}}}"#),
        )
        .unwrap();
        let ctx = context(&dir, Arc::new(ScriptedTransport::new())).await;

        let output = drive(&ctx, "R\nyes\n0\n").await;
        assert!(output.contains("Reset cancelled"));
        assert_eq!(ctx.dispatcher.quota(SCRAPER).await.unwrap().used, 7);

        let output = drive(&ctx, "R\nYES\nU\n0\n").await;
        assert!(output.contains("Usage counter reset successfully"));
        assert!(output.contains("Used:      0/15"));
        assert_eq!(ctx.dispatcher.quota(SCRAPER).await.unwrap().used, 0);
    }

    #[tokio::test]
    async fn test_invalid_choice() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, Arc::new(ScriptedTransport::new())).await;
        let output = drive(&ctx, "Z\n0\n").await;
        assert!(output.contains("[!] Invalid option"));
    }
}
