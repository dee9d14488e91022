//! Color support detection and styles for suite output
//!
//! Respects `NO_COLOR` and `FORCE_COLOR`, and falls back to plain text when
//! stdout is not a terminal or `TERM=dumb`.

use colored::{ColoredString, Colorize};
use std::io::IsTerminal;

/// Level of color support detected for the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    /// No color support (NO_COLOR set, TERM=dumb, piped output)
    None,
    /// Basic 16-color support
    Basic,
}

impl ColorSupport {
    /// Detect color support from environment and terminal capabilities
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var(key).ok(), std::io::stdout().is_terminal())
    }

    /// Detection over an injectable environment lookup.
    pub fn detect_with<F>(lookup: F, is_terminal: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // https://no-color.org/
        if lookup("NO_COLOR").is_some() {
            return Self::None;
        }
        if lookup("FORCE_COLOR").is_some() {
            return Self::Basic;
        }
        if !is_terminal {
            return Self::None;
        }
        if lookup("TERM").is_some_and(|term| term == "dumb") {
            return Self::None;
        }
        Self::Basic
    }

    #[must_use]
    pub const fn has_color(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Default for ColorSupport {
    fn default() -> Self {
        Self::detect()
    }
}

/// Pre-built styles for suite output
pub struct SuiteStyles;

impl SuiteStyles {
    pub fn pass() -> ColoredString {
        "✓".green().bold()
    }

    pub fn fail() -> ColoredString {
        "✗".red().bold()
    }

    pub fn group(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    /// Conversation-level errors: red, underlined.
    pub fn error(text: &str) -> ColoredString {
        text.red().underline()
    }
}

/// Apply a style conditionally based on color support
pub fn styled<S, F>(text: S, style_fn: F, support: ColorSupport) -> String
where
    S: AsRef<str>,
    F: FnOnce(&str) -> ColoredString,
{
    if support.has_color() {
        style_fn(text.as_ref()).to_string()
    } else {
        text.as_ref().to_string()
    }
}

/// Format a pass/fail marker
pub fn format_status(passed: bool, support: ColorSupport) -> String {
    match (passed, support.has_color()) {
        (true, true) => SuiteStyles::pass().to_string(),
        (false, true) => SuiteStyles::fail().to_string(),
        (true, false) => "✓".to_string(),
        (false, false) => "✗".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_no_color_wins() {
        let support = ColorSupport::detect_with(env(&[("NO_COLOR", "1"), ("FORCE_COLOR", "1")]), true);
        assert_eq!(support, ColorSupport::None);
    }

    #[test]
    fn test_force_color_overrides_pipe() {
        let support = ColorSupport::detect_with(env(&[("FORCE_COLOR", "1")]), false);
        assert_eq!(support, ColorSupport::Basic);
    }

    #[test]
    fn test_dumb_terminal_and_pipe_disable_color() {
        assert_eq!(ColorSupport::detect_with(env(&[("TERM", "dumb")]), true), ColorSupport::None);
        assert_eq!(ColorSupport::detect_with(env(&[]), false), ColorSupport::None);
        assert_eq!(ColorSupport::detect_with(env(&[]), true), ColorSupport::Basic);
    }

    #[test]
    fn test_styled_with_no_color() {
        assert_eq!(styled("hello", |s| s.green(), ColorSupport::None), "hello");
        assert!(styled("hello", |s| s.green(), ColorSupport::Basic).contains("hello"));
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(true, ColorSupport::None), "✓");
        assert_eq!(format_status(false, ColorSupport::None), "✗");
        assert!(format_status(false, ColorSupport::Basic).contains('✗'));
    }
}
