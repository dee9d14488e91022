//! One declared turn and its recorded expectations.

use std::sync::Arc;

use itertools::Itertools;
use serde_json::Value;

use crate::error::AssertionFailure;
use crate::report::{Check, TestGroup};
use crate::request::{Request, Slots};
use crate::response::Expectation;

#[derive(Debug, Clone)]
pub struct TestCase {
    pub intent_name: String,
    pub slots: Slots,
    /// Request sent for this turn, once built.
    pub request: Option<Request>,
    /// Raw handler result, once this turn resolved.
    pub actual: Option<Value>,
    pub expectations: Vec<Expectation>,
}

impl TestCase {
    pub fn new(intent_name: impl Into<String>, slots: Slots) -> Self {
        Self {
            intent_name: intent_name.into(),
            slots,
            request: None,
            actual: None,
            expectations: Vec::new(),
        }
    }

    /// Group name, e.g. `User triggers: Continue SLOTS: {topic: weather}`.
    #[must_use]
    pub fn title(&self) -> String {
        let slots = if self.slots.is_empty() {
            String::new()
        } else {
            let pairs = self
                .slots
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .join(", ");
            format!("SLOTS: {{{pairs}}}")
        };
        format!("User triggers: {} {slots}", self.intent_name)
            .trim()
            .to_string()
    }

    /// Turn the recorded expectations into checks against `actual`.
    #[must_use]
    pub fn into_group(self) -> TestGroup {
        let group = TestGroup::new(self.title());
        let Some(actual) = self.actual else {
            return self.expectations.into_iter().fold(group, |group, expectation| {
                group.with_check(Check::failing(
                    expectation.name(),
                    AssertionFailure::new("turn was never resolved"),
                ))
            });
        };

        let actual = Arc::new(actual);
        self.expectations.into_iter().fold(group, |group, expectation| {
            let actual = Arc::clone(&actual);
            group.with_check(Check::new(expectation.name(), move || {
                expectation.evaluate(&actual)
            }))
        })
    }
}
