//! Output formatting and progress reporting

use console::{style, Style, Term};
use figport::{BackendRun, ExportAttempt, ExportOutcome};
use indicatif::{ProgressBar, ProgressStyle};

/// Status line and progress output for an export run.
///
/// Status lines go to stdout; the progress bar draws on stderr and is
/// hidden automatically when stderr is not a terminal.
#[derive(Debug)]
pub struct ExportReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ExportReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ExportReporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` backends
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Remove the progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn write_line(&self, line: &str) {
        let write = || {
            let _ = self.term.write_line(line);
        };
        match self.progress_bar {
            Some(ref pb) => pb.suspend(write),
            None => write(),
        }
    }

    /// Print one attempt. Failures are printed even in quiet mode.
    pub fn attempt(&self, attempt: &ExportAttempt) {
        let failed = attempt.outcome().is_failure();
        if self.quiet && !failed {
            return;
        }

        let prefix = match (self.use_color, attempt.outcome()) {
            (true, ExportOutcome::Failure { .. }) => style("✗").red().bold().to_string(),
            (true, ExportOutcome::Success { resolution: None, .. }) => {
                style("⚠").yellow().bold().to_string()
            }
            (true, _) => style("✓").green().bold().to_string(),
            (false, ExportOutcome::Failure { .. }) => "FAIL".to_string(),
            (false, _) => "OK".to_string(),
        };

        self.write_line(&format!("{prefix} {}", attempt.status_line()));
    }

    /// Print the closing line of one backend run
    pub fn backend_summary(&self, run: &BackendRun) {
        if self.quiet {
            return;
        }

        let summary = run.summary();
        let line = summary.saved_line(&run.directory);
        let line = if self.use_color {
            let style = if summary.failed > 0 {
                Style::new().yellow().bold()
            } else {
                Style::new().green().bold()
            };
            style.apply_to(line).to_string()
        } else {
            line
        };
        self.write_line(&line);
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.write_line("");
        self.write_line(&styled);
    }

    /// Print a plain line
    pub fn line(&self, line: &str) {
        if !self.quiet {
            self.write_line(line);
        }
    }
}
