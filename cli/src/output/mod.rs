//! Terminal output: styled messages and YAML documents.

pub mod progress;
pub mod reporter;
pub mod styles;

use anyhow::{Context, Result};
use console::Term;
use owo_colors::OwoColorize as _;
use serde::Serialize;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Suppress status messages. Documents printed with [`Self::yaml`],
    /// result lines and errors are always shown.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{} {msg}", "✓".style(self.styles.success));
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("{} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Printed to stderr, never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {msg}", "✗".style(self.styles.error));
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    /// Print a result line on stdout. Like documents, never suppressed.
    pub fn line(&self, msg: &str) {
        println!("{msg}");
    }

    /// Print a serializable document as YAML on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as YAML.
    pub fn yaml<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        print!("{}", render_yaml(value)?);
        Ok(())
    }
}

/// Render a document the way [`OutputContext::yaml`] prints it.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as YAML.
pub fn render_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).context("cannot render YAML")
}
