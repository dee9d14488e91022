//! Registration model: named groups of named checks.

use std::fmt;

use crate::error::{AssertionFailure, ConverseError};

type CheckFn = Box<dyn FnOnce() -> Result<(), AssertionFailure> + Send>;

/// A named, not-yet-run check.
pub struct Check {
    name: String,
    run: CheckFn,
}

impl Check {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: FnOnce() -> Result<(), AssertionFailure> + Send + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    pub fn passing(name: impl Into<String>) -> Self {
        Self::new(name, || Ok(()))
    }

    pub fn failing(name: impl Into<String>, failure: AssertionFailure) -> Self {
        Self::new(name, move || Err(failure))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(self) -> Result<(), AssertionFailure> {
        (self.run)()
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A named group of checks and nested groups.
#[derive(Debug, Default)]
pub struct TestGroup {
    pub name: String,
    pub groups: Vec<TestGroup>,
    pub checks: Vec<Check>,
}

impl TestGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: Self) -> Self {
        self.groups.push(group);
        self
    }

    #[must_use]
    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Checks in this group and every nested group.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.len() + self.groups.iter().map(Self::check_count).sum::<usize>()
    }
}

/// Receiver of a finalized conversation's groups and failures.
pub trait TestRegistry {
    fn register(&mut self, group: TestGroup);

    /// Called once when the conversation could not be resolved.
    fn report_error(&mut self, conversation: &str, error: &ConverseError);
}
