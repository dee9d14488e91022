//! Conversation construction, turn declaration and sequential resolution.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ConversationConfig;
use crate::error::{AssertionFailure, ConverseError, Result};
use crate::handler::{SkillApp, SkillHandler, invoke};
use crate::report::{Check, SuiteReport, SuiteRunner, TestGroup, TestRegistry};
use crate::request::{RequestBuilder, Slots};
use crate::response::{Expectation, OutputKind, ResponseAssertions};

use super::case::TestCase;

const FINISHED_CHECK: &str = "Finished executing conversation";

/// Lifecycle of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Turns and assertions are being declared.
    Building,
    /// Turns are being sent to the handler in order.
    Finalizing,
    /// Results were registered (or the failure reported).
    Finalized,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building => write!(f, "building"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Finalized => write!(f, "finalized"),
        }
    }
}

/// Builder for [`Conversation`].
pub struct ConversationBuilder {
    name: String,
    config: ConversationConfig,
    handler: Option<Arc<dyn SkillHandler>>,
}

impl ConversationBuilder {
    #[must_use]
    pub fn config(mut self, config: ConversationConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn handler<H: SkillHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn shared_handler(mut self, handler: Arc<dyn SkillHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Use the handler supplied by `app`, unless one was already set.
    #[must_use]
    pub fn app(mut self, app: &dyn SkillApp) -> Self {
        if self.handler.is_none() {
            self.handler = app.handler();
        }
        self
    }

    pub fn build(self) -> Result<Conversation> {
        let Some(handler) = self.handler else {
            return Err(ConverseError::Config(format!(
                "conversation '{}' has no handler; pass one via handler() or app()",
                self.name
            )));
        };
        if !self.config.has_app_id() {
            return Err(ConverseError::Config(format!(
                "conversation '{}' has no application id",
                self.name
            )));
        }
        self.config.validate()?;

        debug!(conversation = %self.name, app_id = %self.config.app_id, "conversation created");
        Ok(Conversation {
            name: self.name,
            handler,
            builder: RequestBuilder::new(self.config),
            cases: Vec::new(),
            phase: Phase::Building,
        })
    }
}

/// A scripted sequence of user turns against one skill handler.
///
/// Turns are only declared while building; [`Conversation::end`] sends them
/// to the handler one at a time, threading each result's session attributes
/// into the next request, and then evaluates every recorded expectation.
pub struct Conversation {
    name: String,
    handler: Arc<dyn SkillHandler>,
    builder: RequestBuilder,
    cases: Vec<TestCase>,
    phase: Phase,
}

impl fmt::Debug for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversation")
            .field("name", &self.name)
            .field("cases", &self.cases)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Conversation {
    pub fn builder(name: impl Into<String>) -> ConversationBuilder {
        ConversationBuilder {
            name: name.into(),
            config: ConversationConfig::default(),
            handler: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn config(&self) -> &ConversationConfig {
        self.builder.config()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Declare the next user turn.
    pub fn user_says(&mut self, intent: impl Into<String>, slots: impl Into<Slots>) -> Turn<'_> {
        let case = TestCase::new(intent, slots.into());
        debug!(conversation = %self.name, turn = self.cases.len() + 1, intent = %case.intent_name, "turn declared");
        self.cases.push(case);
        let index = self.cases.len() - 1;
        Turn {
            conversation: self,
            index,
        }
    }

    /// Resolve every turn and run the checks with a [`SuiteRunner`].
    pub async fn end(self) -> SuiteReport {
        let mut runner = SuiteRunner::new();
        // The failure is already in the report's errors.
        let _ = self.end_with(&mut runner).await;
        runner.into_report()
    }

    /// Resolve every turn, then register the results with `registry`.
    ///
    /// On the first failing turn the remaining turns are skipped, the error is
    /// passed to [`TestRegistry::report_error`] and returned.
    pub async fn end_with<R>(mut self, registry: &mut R) -> Result<()>
    where
        R: TestRegistry + ?Sized,
    {
        self.advance(Phase::Finalizing);
        let resolved = self.resolve().await;
        let execution = TestGroup::new(format!("Executing conversation: {}", self.name));

        let outcome = match resolved {
            Ok(()) => {
                registry.register(execution.with_check(Check::passing(FINISHED_CHECK)));
                let turns = std::mem::take(&mut self.cases)
                    .into_iter()
                    .fold(TestGroup::new(format!("Conversation: {}", self.name)), |group, case| {
                        group.with_group(case.into_group())
                    });
                info!(conversation = %self.name, checks = turns.check_count(), "conversation resolved");
                registry.register(turns);
                Ok(())
            }
            Err(err) => {
                error!(conversation = %self.name, error = %err, "conversation aborted");
                registry.register(execution.with_check(Check::failing(
                    FINISHED_CHECK,
                    AssertionFailure::new(err.to_string()),
                )));
                registry.report_error(&self.name, &err);
                Err(err)
            }
        };

        self.advance(Phase::Finalized);
        outcome
    }

    async fn resolve(&mut self) -> Result<()> {
        let mut prior: Option<Value> = None;
        for (index, case) in self.cases.iter_mut().enumerate() {
            let turn = index + 1;
            let request = self.builder.build(&case.intent_name, &case.slots, prior.as_ref())?;
            case.request = Some(request.clone());

            debug!(conversation = %self.name, turn, intent = %case.intent_name, "invoking handler");
            let result = invoke(self.handler.as_ref(), request)
                .await
                .map_err(|source| ConverseError::handler(turn, &case.intent_name, source))?;

            case.actual = Some(result.clone());
            prior = Some(result);
        }
        Ok(())
    }

    fn advance(&mut self, next: Phase) {
        info!(conversation = %self.name, from = %self.phase, to = %next, "phase change");
        self.phase = next;
    }
}

/// Handle on one declared turn.
pub struct Turn<'a> {
    conversation: &'a mut Conversation,
    index: usize,
}

impl<'a> Turn<'a> {
    /// Assertions on the tag-stripped spoken text.
    pub fn plain_response(self) -> ResponseAssertions<'a> {
        ResponseAssertions::new(self, OutputKind::Plain)
    }

    /// Assertions on the raw markup.
    pub fn ssml_response(self) -> ResponseAssertions<'a> {
        ResponseAssertions::new(self, OutputKind::Ssml)
    }

    /// Declare the next user turn.
    pub fn user_says(self, intent: impl Into<String>, slots: impl Into<Slots>) -> Turn<'a> {
        self.conversation.user_says(intent, slots)
    }

    /// Zero-based position in the conversation.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn case(&self) -> &TestCase {
        &self.conversation.cases[self.index]
    }

    pub(crate) fn config(&self) -> &ConversationConfig {
        self.conversation.config()
    }

    pub(crate) fn push_expectation(&mut self, expectation: Expectation) {
        self.conversation.cases[self.index].expectations.push(expectation);
    }
}
