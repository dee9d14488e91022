//! Default registry: runs checks as they are registered and keeps the outcome.

use std::fmt::Write as _;

use tracing::{debug, error, info};

use crate::error::ConverseError;

use super::colors::{ColorSupport, SuiteStyles, format_status, styled};
use super::suite::{TestGroup, TestRegistry};

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub name: String,
    /// Failure message, `None` when the check passed.
    pub failure: Option<String>,
}

impl CheckReport {
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupReport {
    pub name: String,
    pub groups: Vec<GroupReport>,
    pub checks: Vec<CheckReport>,
}

impl GroupReport {
    /// Run every check in `group`, depth first, in registration order.
    fn run(group: TestGroup, depth: usize) -> Self {
        debug!(group = %group.name, depth, "running group");
        let checks = group
            .checks
            .into_iter()
            .map(|check| {
                let name = check.name().to_string();
                let failure = check.run().err().map(|failure| failure.message);
                match &failure {
                    None => debug!(check = %name, "passed"),
                    Some(message) => info!(check = %name, %message, "failed"),
                }
                CheckReport { name, failure }
            })
            .collect();
        let groups = group
            .groups
            .into_iter()
            .map(|child| Self::run(child, depth + 1))
            .collect();
        Self {
            name: group.name,
            groups,
            checks,
        }
    }

    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.len() + self.groups.iter().map(Self::check_count).sum::<usize>()
    }

    /// Look up a direct child group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Self> {
        self.groups.iter().find(|group| group.name == name)
    }

    fn collect_failures<'a>(&'a self, out: &mut Vec<&'a CheckReport>) {
        out.extend(self.checks.iter().filter(|check| !check.passed()));
        for group in &self.groups {
            group.collect_failures(out);
        }
    }

    fn render_into(&self, out: &mut String, depth: usize, support: ColorSupport) {
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}{}", styled(&self.name, SuiteStyles::group, support));
        for check in &self.checks {
            let _ = writeln!(
                out,
                "{indent}  {} {}",
                format_status(check.passed(), support),
                check.name
            );
            if let Some(message) = &check.failure {
                for line in message.lines() {
                    let _ = writeln!(out, "{indent}      {}", styled(line, SuiteStyles::muted, support));
                }
            }
        }
        for group in &self.groups {
            group.render_into(out, depth + 1, support);
        }
    }
}

/// Everything a [`SuiteRunner`] observed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuiteReport {
    pub groups: Vec<GroupReport>,
    /// Conversation-level errors, formatted.
    pub errors: Vec<String>,
}

impl SuiteReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.errors.is_empty() && self.failures().is_empty()
    }

    #[must_use]
    pub fn failures(&self) -> Vec<&CheckReport> {
        let mut out = Vec::new();
        for group in &self.groups {
            group.collect_failures(&mut out);
        }
        out
    }

    #[must_use]
    pub fn check_count(&self) -> usize {
        self.groups.iter().map(GroupReport::check_count).sum()
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Indented tree of groups and checks, with errors at the end.
    #[must_use]
    pub fn render(&self, support: ColorSupport) -> String {
        let mut out = String::new();
        for group in &self.groups {
            group.render_into(&mut out, 0, support);
        }
        for message in &self.errors {
            let _ = writeln!(out, "{}", styled(format!("ERROR: {message}"), SuiteStyles::error, support));
        }
        out
    }

    /// Panic with the rendered tree when anything failed.
    ///
    /// # Panics
    ///
    /// When a check failed or a conversation errored.
    pub fn assert_passed(&self) {
        assert!(
            self.passed(),
            "{} failure(s), {} error(s):\n{}",
            self.failures().len(),
            self.errors.len(),
            self.render(ColorSupport::None)
        );
    }
}

/// In-process [`TestRegistry`] producing a [`SuiteReport`].
#[derive(Debug)]
pub struct SuiteRunner {
    report: SuiteReport,
    color: ColorSupport,
    echo_errors: bool,
}

impl Default for SuiteRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteRunner {
    /// Runner that echoes conversation errors to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self {
            report: SuiteReport::default(),
            color: ColorSupport::detect(),
            echo_errors: true,
        }
    }

    /// Runner that only records errors.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            echo_errors: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn with_color(mut self, color: ColorSupport) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub const fn report(&self) -> &SuiteReport {
        &self.report
    }

    #[must_use]
    pub fn into_report(self) -> SuiteReport {
        self.report
    }
}

impl TestRegistry for SuiteRunner {
    fn register(&mut self, group: TestGroup) {
        info!(group = %group.name, checks = group.check_count(), "registering group");
        self.report.groups.push(GroupReport::run(group, 0));
    }

    fn report_error(&mut self, conversation: &str, err: &ConverseError) {
        let message = format!("{conversation}: {err}");
        error!(conversation, error = %err, "conversation failed");
        if self.echo_errors {
            eprintln!("{}", styled(format!("ERROR: {message}"), SuiteStyles::error, self.color));
            if let Some(trace) = err.backtrace() {
                eprintln!("{trace}");
            }
        }
        self.report.errors.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssertionFailure, HandlerError};
    use crate::report::suite::Check;

    fn sample_group() -> TestGroup {
        TestGroup::new("Conversation: demo").with_group(
            TestGroup::new("User triggers: Greet")
                .with_check(Check::passing("first"))
                .with_check(Check::failing("second", AssertionFailure::new("line one\nline two")))
                .with_check(Check::passing("third")),
        )
    }

    #[test]
    fn failures_do_not_abort_siblings() {
        let mut runner = SuiteRunner::quiet();
        runner.register(sample_group());
        let report = runner.into_report();

        assert_eq!(report.check_count(), 3);
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "second");
        assert!(!report.passed());

        let turn = report
            .group("Conversation: demo")
            .and_then(|group| group.group("User triggers: Greet"))
            .unwrap();
        assert!(turn.checks[2].passed());
    }

    #[test]
    fn render_is_an_indented_tree() {
        let mut runner = SuiteRunner::quiet();
        runner.register(sample_group());
        let rendered = runner.report().render(ColorSupport::None);

        assert!(rendered.starts_with("Conversation: demo\n  User triggers: Greet\n"));
        assert!(rendered.contains("    ✓ first\n"));
        assert!(rendered.contains("    ✗ second\n        line one\n        line two\n"));
    }

    #[test]
    fn errors_fail_the_report() {
        let mut runner = SuiteRunner::quiet();
        let err = ConverseError::handler(2, "Continue", HandlerError::Abandoned);
        runner.report_error("demo", &err);
        let report = runner.into_report();

        assert!(!report.passed());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("demo: turn 2 (Continue) failed"));
        assert!(report.render(ColorSupport::None).contains("ERROR: demo:"));
    }

    #[test]
    fn echoing_runner_still_records_errors() {
        let mut runner = SuiteRunner::new().with_color(ColorSupport::None);
        let err = ConverseError::handler(1, "Greet", HandlerError::Panicked("boom".into()));
        runner.report_error("echo", &err);
        assert_eq!(runner.report().errors.len(), 1);
        assert!(runner.report().errors[0].contains("handler panicked: boom"));
    }

    #[test]
    #[should_panic(expected = "1 failure(s)")]
    fn assert_passed_panics_with_tree() {
        let mut runner = SuiteRunner::quiet();
        runner.register(sample_group());
        runner.into_report().assert_passed();
    }

    #[test]
    fn empty_report_passes() {
        let report = SuiteRunner::quiet().into_report();
        assert!(report.passed());
        report.assert_passed();
    }
}
