//! Message formatting and display.
//!
//! This module provides formatted output for different message types
//! with support for quiet and verbose modes.
//!
//! # Examples
//!
//! ```
//! use pdfcompile::output::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Compiling 3 selected file(s)");
//! formatter.success("Saved Documentos_UNIDOS_1.pdf");
//! formatter.error("No valid files were found to compile");
//! ```

use crate::config::Config;
use std::io;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn decoration(self) -> (&'static str, &'static str) {
        match self {
            Self::Info => ("", ""),
            Self::Success => ("✓ ", "\x1b[32m"),
            Self::Warning => ("⚠ ", "\x1b[33m"),
            Self::Error => ("✗ ", "\x1b[31m"),
            Self::Debug => ("→ ", "\x1b[36m"),
        }
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether to use colored output.
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    ///
    /// JSON mode keeps stdout for the report, so it behaves as quiet.
    pub fn from_config(config: &Config) -> Self {
        Self::new(!config.should_print(), config.verbose)
    }

    /// Create a quiet formatter (only errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Detect if colored output should be used.
    ///
    /// Returns true if stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.render(MessageLevel::Info, message));
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.render(MessageLevel::Success, message));
        }
    }

    /// Print a warning message to stderr, even in quiet mode.
    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.render(MessageLevel::Warning, message));
    }

    /// Print an error message to stderr. Always displayed.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.render(MessageLevel::Error, message));
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            println!("{}", self.render(MessageLevel::Debug, message));
        }
    }

    /// Render a message with its level prefix and color.
    pub fn render(&self, level: MessageLevel, message: &str) -> String {
        let (prefix, color_code) = level.decoration();

        if self.colored && !color_code.is_empty() {
            format!("{color_code}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled value. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a numbered list item. Suppressed in quiet mode.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(quiet: bool, verbose: bool) -> OutputFormatter {
        OutputFormatter {
            quiet,
            verbose,
            colored: false,
        }
    }

    #[test]
    fn test_new_formatter() {
        let formatter = OutputFormatter::new(false, false);
        assert!(!formatter.quiet);
        assert!(!formatter.verbose);
    }

    #[test]
    fn test_quiet_formatter() {
        let formatter = OutputFormatter::quiet();
        assert!(formatter.quiet);
        assert!(!formatter.verbose);
    }

    #[test]
    fn test_verbose_formatter() {
        let formatter = OutputFormatter::verbose();
        assert!(formatter.verbose);
        assert!(!formatter.quiet);
    }

    #[test]
    fn test_json_config_is_quiet() {
        let config = Config {
            json: true,
            ..Config::default()
        };
        assert!(OutputFormatter::from_config(&config).quiet);
    }

    #[test]
    fn test_render_plain() {
        let formatter = plain(false, false);
        assert_eq!(formatter.render(MessageLevel::Info, "hi"), "hi");
        assert_eq!(formatter.render(MessageLevel::Success, "done"), "✓ done");
        assert_eq!(formatter.render(MessageLevel::Error, "bad"), "✗ bad");
    }

    #[test]
    fn test_render_colored() {
        let formatter = OutputFormatter {
            quiet: false,
            verbose: false,
            colored: true,
        };
        assert_eq!(
            formatter.render(MessageLevel::Warning, "careful"),
            "\x1b[33m⚠ careful\x1b[0m"
        );
        assert_eq!(formatter.render(MessageLevel::Info, "plain"), "plain");
    }

    #[test]
    fn test_messages_do_not_panic() {
        let formatter = plain(true, false);
        formatter.info("suppressed");
        formatter.warning("always shown");
        formatter.error("always shown");
        formatter.debug("suppressed");
        formatter.section("suppressed");
        formatter.list_item(1, "suppressed");
    }
}
