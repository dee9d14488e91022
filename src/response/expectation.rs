//! Deferred response expectations.

use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::error::AssertionFailure;

use super::extract::{OutputKind, SpokenText, spoken_text};
use super::fuzzy::approximates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Should,
    ShouldNot,
}

impl Polarity {
    const fn word(self) -> &'static str {
        match self {
            Self::Should => "should",
            Self::ShouldNot => "should not",
        }
    }
}

/// Which half of the spoken output a check reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Response,
    Reprompt,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response => write!(f, "response"),
            Self::Reprompt => write!(f, "reprompt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    Equal(String),
    Contain(String),
    /// Regular expression source; compiled when the check runs.
    Match(String),
    Approximate { expected: String, threshold: f64 },
}

impl Matcher {
    fn describe(&self) -> String {
        match self {
            Self::Equal(expected) => format!("equal: {expected}"),
            Self::Contain(expected) => format!("contain: {expected}"),
            Self::Match(pattern) => format!("match: /{pattern}/"),
            Self::Approximate {
                expected,
                threshold,
            } => format!("approximate (min. fuzzy match score: {threshold}): {expected}"),
        }
    }
}

/// One recorded assertion against a turn's spoken output.
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    pub output: OutputKind,
    pub target: Target,
    pub polarity: Polarity,
    pub matcher: Matcher,
    pub fix_spaces: bool,
}

impl Expectation {
    /// Name under which the check is registered.
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "Alexa's {} {} {} {}",
            self.output,
            self.target,
            self.polarity.word(),
            self.matcher.describe()
        )
    }

    /// Evaluate against a turn's raw handler result.
    pub fn evaluate(&self, result: &Value) -> Result<(), AssertionFailure> {
        let SpokenText { speech, reprompt } = spoken_text(result, self.output, self.fix_spaces);
        let actual = match self.target {
            Target::Response => speech,
            Target::Reprompt => reprompt,
        };
        self.check(&actual)
    }

    fn check(&self, actual: &str) -> Result<(), AssertionFailure> {
        let should = self.polarity == Polarity::Should;
        match &self.matcher {
            Matcher::Equal(expected) => {
                if (actual == expected) == should {
                    Ok(())
                } else {
                    Err(self.mismatch(actual, "equal", expected))
                }
            }
            Matcher::Contain(expected) => {
                if actual.contains(expected.as_str()) == should {
                    Ok(())
                } else {
                    Err(self.mismatch(actual, "include", expected))
                }
            }
            Matcher::Match(pattern) => {
                let regex = Regex::new(pattern).map_err(|err| {
                    AssertionFailure::new(format!("invalid pattern /{pattern}/: {err}"))
                })?;
                if regex.is_match(actual) == should {
                    Ok(())
                } else {
                    Err(self.mismatch(actual, "match", &format!("/{pattern}/")))
                }
            }
            Matcher::Approximate {
                expected,
                threshold,
            } => {
                let outcome = approximates(self.polarity, actual, expected, *threshold);
                if outcome.matched {
                    return Ok(());
                }
                let score = outcome
                    .score
                    .map_or_else(|| "none".to_string(), |score| format!("{score:.4}"));
                let relation = match self.polarity {
                    Polarity::Should => "at least",
                    Polarity::ShouldNot => "below",
                };
                Err(AssertionFailure::new(format!(
                    "expected {} similarity {relation} {threshold}\n\nActual:\n\n  {actual}\n\nFuzzy Expected:\n\n  {expected}\n\nActual Fuzzy Score:\n\n  {score}",
                    self.target
                )))
            }
        }
    }

    fn mismatch(&self, actual: &str, verb: &str, expected: &str) -> AssertionFailure {
        let negation = match self.polarity {
            Polarity::Should => "",
            Polarity::ShouldNot => "not ",
        };
        AssertionFailure::new(format!(
            "expected {} '{actual}' to {negation}{verb} '{expected}'",
            self.target
        ))
    }
}
