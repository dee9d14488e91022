//! Fluent, per-turn response assertions.

use crate::conversation::Turn;
use crate::request::Slots;

use super::expectation::{Expectation, Matcher, Polarity, Target};
use super::extract::OutputKind;

/// Assertions on one turn's spoken output, in plain or markup form.
///
/// Every method records expectations on the turn and returns the same
/// handle, so calls chain; nothing is evaluated until the conversation ends.
/// Passing `None` for the response or reprompt argument skips that half.
pub struct ResponseAssertions<'a> {
    turn: Turn<'a>,
    output: OutputKind,
}

impl<'a> ResponseAssertions<'a> {
    pub(crate) fn new(turn: Turn<'a>, output: OutputKind) -> Self {
        Self { turn, output }
    }

    #[must_use]
    pub const fn output(&self) -> OutputKind {
        self.output
    }

    pub fn should_equal<'e>(
        self,
        expected: impl Into<Option<&'e str>>,
        reprompt: impl Into<Option<&'e str>>,
    ) -> Self {
        self.record(Polarity::Should, expected.into(), reprompt.into(), Matcher::Equal)
    }

    pub fn should_not_equal<'e>(
        self,
        expected: impl Into<Option<&'e str>>,
        reprompt: impl Into<Option<&'e str>>,
    ) -> Self {
        self.record(Polarity::ShouldNot, expected.into(), reprompt.into(), Matcher::Equal)
    }

    pub fn should_contain<'e>(
        self,
        expected: impl Into<Option<&'e str>>,
        reprompt: impl Into<Option<&'e str>>,
    ) -> Self {
        self.record(Polarity::Should, expected.into(), reprompt.into(), Matcher::Contain)
    }

    pub fn should_not_contain<'e>(
        self,
        expected: impl Into<Option<&'e str>>,
        reprompt: impl Into<Option<&'e str>>,
    ) -> Self {
        self.record(Polarity::ShouldNot, expected.into(), reprompt.into(), Matcher::Contain)
    }

    /// Regex match; `pattern` uses `regex` crate syntax.
    pub fn should_match<'e>(
        self,
        pattern: impl Into<Option<&'e str>>,
        reprompt_pattern: impl Into<Option<&'e str>>,
    ) -> Self {
        self.record(Polarity::Should, pattern.into(), reprompt_pattern.into(), Matcher::Match)
    }

    pub fn should_not_match<'e>(
        self,
        pattern: impl Into<Option<&'e str>>,
        reprompt_pattern: impl Into<Option<&'e str>>,
    ) -> Self {
        self.record(Polarity::ShouldNot, pattern.into(), reprompt_pattern.into(), Matcher::Match)
    }

    /// Fuzzy match; `threshold` defaults to the conversation's `fuzzy_threshold`.
    pub fn should_approximate<'e>(
        self,
        expected: impl Into<Option<&'e str>>,
        reprompt: impl Into<Option<&'e str>>,
        threshold: impl Into<Option<f64>>,
    ) -> Self {
        self.record_fuzzy(Polarity::Should, expected.into(), reprompt.into(), threshold.into())
    }

    pub fn should_not_approximate<'e>(
        self,
        expected: impl Into<Option<&'e str>>,
        reprompt: impl Into<Option<&'e str>>,
        threshold: impl Into<Option<f64>>,
    ) -> Self {
        self.record_fuzzy(Polarity::ShouldNot, expected.into(), reprompt.into(), threshold.into())
    }

    /// Switch to plain-text assertions on the same turn.
    pub fn plain_response(self) -> Self {
        Self::new(self.turn, OutputKind::Plain)
    }

    /// Switch to markup assertions on the same turn.
    pub fn ssml_response(self) -> Self {
        Self::new(self.turn, OutputKind::Ssml)
    }

    /// Declare the next turn of the conversation.
    pub fn user_says(self, intent: impl Into<String>, slots: impl Into<Slots>) -> Turn<'a> {
        self.turn.user_says(intent, slots)
    }

    fn record_fuzzy(
        self,
        polarity: Polarity,
        expected: Option<&str>,
        reprompt: Option<&str>,
        threshold: Option<f64>,
    ) -> Self {
        let threshold = threshold.unwrap_or_else(|| self.turn.config().fuzzy_threshold);
        self.record(polarity, expected, reprompt, |expected| Matcher::Approximate {
            expected,
            threshold,
        })
    }

    fn record<F>(
        mut self,
        polarity: Polarity,
        expected: Option<&str>,
        reprompt: Option<&str>,
        matcher: F,
    ) -> Self
    where
        F: Fn(String) -> Matcher,
    {
        let fix_spaces = self.turn.config().fix_spaces;
        let output = self.output;
        let targets = [(Target::Response, expected), (Target::Reprompt, reprompt)];
        for (target, value) in targets {
            if let Some(value) = value {
                self.turn.push_expectation(Expectation {
                    output,
                    target,
                    polarity,
                    matcher: matcher(value.to_string()),
                    fix_spaces,
                });
            }
        }
        self
    }
}
