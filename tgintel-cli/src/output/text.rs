//! Text output formatting with progress bars and colors.

use tgintel_core::{OperationReport, Outcome, ProviderId, QuotaCheck, Tier, UpstreamFailure};
use tgintel_providers::OperationDescriptor;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Width of the usage bar.
const USAGE_BAR_WIDTH: usize = 40;

/// Width of section rules.
const RULE_WIDTH: usize = 60;

/// Kind of a one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `[+]`
    Success,
    /// `[!]`
    Error,
    /// `[*]`
    Warning,
    /// `[i]`
    Info,
    /// `[$]`
    Metered,
}

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: USAGE_BAR_WIDTH,
        }
    }

    /// Section heading like `[USAGE STATISTICS]`.
    pub fn heading(&self, title: &str) -> String {
        self.paint(&format!("{BOLD}{MAGENTA}"), &format!("[{}]", title.to_uppercase()))
    }

    /// Horizontal rule.
    pub fn rule(&self) -> String {
        self.dim(&"═".repeat(RULE_WIDTH))
    }

    /// One-line status message.
    pub fn status(&self, kind: Status, message: &str) -> String {
        let (tag, color) = match kind {
            Status::Success => ("[+]", GREEN),
            Status::Error => ("[!]", RED),
            Status::Warning => ("[*]", YELLOW),
            Status::Info => ("[i]", CYAN),
            Status::Metered => ("[$]", MAGENTA),
        };
        format!("{} {message}", self.paint(color, tag))
    }

    /// Formats an error message.
    pub fn format_error(&self, message: &str) -> String {
        self.status(Status::Error, message)
    }

    // ========================================================================
    // Dispatch results
    // ========================================================================

    /// Formats one entry of the free search, numbered from 1.
    pub fn format_report(
        &self,
        index: usize,
        report: &OperationReport,
        desc: Option<&OperationDescriptor>,
    ) -> String {
        let title = desc.map_or(report.operation, |d| d.title);
        let provider = desc.map(|d| d.provider.display_name());

        let header = match provider {
            Some(p) => format!("{index}. {title} ({p})"),
            None => format!("{index}. {title}"),
        };

        let body = match &report.result {
            Ok(outcome) => self.format_outcome_body(outcome),
            Err(e) => self.format_error(&e.to_string()),
        };

        [self.rule(), self.bold(&header), self.rule(), body].join("\n")
    }

    /// Formats a single dispatch with its heading.
    pub fn format_outcome(&self, desc: &OperationDescriptor, outcome: &Outcome) -> String {
        let tag = match desc.tier {
            Tier::Free => self.green("[FREE]"),
            Tier::Metered => self.paint(MAGENTA, "[$]"),
        };
        format!(
            "{tag} {} ({})\n{}",
            self.bold(desc.title),
            desc.provider.display_name(),
            self.format_outcome_body(outcome)
        )
    }

    /// Formats what happened, without a heading.
    pub fn format_outcome_body(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Success { data, .. } => {
                let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
                self.dim(&json)
            }
            Outcome::QuotaExceeded {
                provider,
                limit,
                period,
            } => self.status(
                Status::Error,
                &format!(
                    "Monthly limit reached for {} ({limit}/{limit} used in {period}). Resets on {}",
                    provider.display_name(),
                    period.resets_on()
                ),
            ),
            Outcome::MissingCredential { provider } => self.status(
                Status::Warning,
                &format!(
                    "{} key not configured, skipping. Run `tgintel config set-key {}`",
                    provider.display_name(),
                    provider.id()
                ),
            ),
            Outcome::UpstreamError {
                reason: UpstreamFailure::NoResult,
                ..
            } => self.status(Status::Warning, "No result"),
            Outcome::UpstreamError { provider, reason } => self.status(
                Status::Error,
                &format!("{} error: {reason}", provider.display_name()),
            ),
            Outcome::TransportFailure { provider, reason } => self.status(
                Status::Error,
                &format!("{} unreachable: {reason}", provider.display_name()),
            ),
        }
    }

    // ========================================================================
    // Usage
    // ========================================================================

    /// Formats the usage block of one metered provider.
    pub fn format_quota(&self, check: &QuotaCheck) -> String {
        let color = color_for_remaining(check.remaining);
        let percent = used_percent(check.used, check.limit);

        let mut lines = vec![
            format!("{} (metered)", self.bold(check.provider.display_name())),
            format!("  Period:    {}", check.period),
            format!("  Used:      {}/{}", self.paint(color, &check.used.to_string()), check.limit),
            format!("  Remaining: {}", self.paint(color, &check.remaining.to_string())),
            format!(
                "  {} {}",
                self.progress_bar(check.used, check.limit, check.remaining),
                self.paint(color, &format!("{percent:.1}%"))
            ),
        ];

        if check.remaining == 0 {
            lines.push(self.paint(
                RED,
                &format!("  LIMIT REACHED - Resets on {}", check.period.resets_on()),
            ));
        }

        lines.join("\n")
    }

    /// One-line remaining count for menus.
    pub fn format_remaining(&self, check: &QuotaCheck) -> String {
        let color = color_for_remaining(check.remaining);
        format!(
            "{} remaining this month",
            self.paint(color, &format!("{}/{}", check.remaining, check.limit))
        )
    }

    /// Bar filled in proportion to `used / limit`, colored by `remaining`.
    pub fn progress_bar(&self, used: u32, limit: u32, remaining: u32) -> String {
        let filled = if limit == 0 {
            self.bar_width
        } else {
            (self.bar_width * used as usize / limit as usize).min(self.bar_width)
        };
        let empty = self.bar_width - filled;

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );
        self.paint(color_for_remaining(remaining), &bar)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Header of the operations table.
    pub fn format_operations_header(&self) -> String {
        self.bold(&format!(
            "{:<20} {:<8} {:<10} {}",
            "Operation", "Tier", "Provider", "Parameters"
        ))
    }

    /// One row of the operations table.
    pub fn format_operation_line(&self, desc: &OperationDescriptor) -> String {
        let params: Vec<String> = desc
            .params
            .iter()
            .map(|p| match (p.required, p.default) {
                (true, _) => p.name.to_string(),
                (false, Some(default)) => format!("[{}={default}]", p.name),
                (false, None) => format!("[{}]", p.name),
            })
            .collect();

        let tier = match desc.tier {
            Tier::Free => self.green(&format!("{:<8}", "free")),
            Tier::Metered => self.paint(MAGENTA, &format!("{:<8}", "metered")),
        };

        format!(
            "{:<20} {tier} {:<10} {}",
            desc.name,
            desc.provider.id(),
            self.dim(&params.join(" "))
        )
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Key status line, showing only a masked preview.
    pub fn format_key_status(&self, provider: ProviderId, masked: Option<&str>) -> String {
        if !provider.requires_credential() {
            return format!(
                "{} {}: {}",
                self.green("✓"),
                provider.display_name(),
                self.dim("no key needed")
            );
        }
        match masked {
            Some(preview) => format!(
                "{} {}: Configured ({})",
                self.green("✓"),
                provider.display_name(),
                self.blue(preview)
            ),
            None => format!("{} {}: Not configured", self.red("✗"), provider.display_name()),
        }
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Bold text.
    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Dimmed text.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn blue(&self, text: &str) -> String {
        self.paint(BLUE, text)
    }

    /// Cyan text, used for prompts.
    pub fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn color_for_remaining(remaining: u32) -> &'static str {
    match remaining {
        r if r > 5 => GREEN,
        r if r > 2 => YELLOW,
        _ => RED,
    }
}

fn used_percent(used: u32, limit: u32) -> f64 {
    if limit == 0 {
        return 100.0;
    }
    f64::from(used) / f64::from(limit) * 100.0
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_width() {
        let formatter = TextFormatter::new(false);
        let bar = formatter.progress_bar(0, 15, 15);
        assert_eq!(bar.chars().count(), USAGE_BAR_WIDTH);
        assert!(bar.chars().all(|c| c == BAR_EMPTY));
    }

    #[test]
    fn test_progress_bar_floor() {
        let formatter = TextFormatter::new(false);
        // 40 * 3 / 15 = 8
        let bar = formatter.progress_bar(3, 15, 12);
        assert_eq!(bar.chars().filter(|c| *c == BAR_FULL).count(), 8);
    }

    #[test]
    fn test_progress_bar_zero_limit_is_full() {
        let formatter = TextFormatter::new(false);
        let bar = formatter.progress_bar(0, 0, 0);
        assert!(bar.chars().all(|c| c == BAR_FULL));
    }

    #[test]
    fn test_color_for_remaining() {
        assert_eq!(color_for_remaining(6), GREEN);
        assert_eq!(color_for_remaining(5), YELLOW);
        assert_eq!(color_for_remaining(3), YELLOW);
        assert_eq!(color_for_remaining(2), RED);
        assert_eq!(color_for_remaining(0), RED);
    }

    #[test]
    fn test_status_without_colors() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.status(Status::Warning, "careful"), "[*] careful");
        assert_eq!(formatter.format_error("bad"), "[!] bad");
    }

    #[test]
    fn test_heading() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.heading("usage statistics"), "[USAGE STATISTICS]");
    }
}
