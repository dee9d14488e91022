//! Stub skill handlers and result builders.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use serde_json::{Map, Value, json};

use crate::handler::{Completion, SkillHandler};
use crate::request::Request;

/// A handler result carrying spoken text, an optional reprompt and session attributes.
#[must_use]
pub fn speech_result(speech: &str, reprompt: Option<&str>, attributes: Option<Value>) -> Value {
    let mut response = json!({
        "outputSpeech": {"type": "SSML", "ssml": format!("<speak>{speech}</speak>")}
    });
    if let Some(reprompt) = reprompt {
        response["reprompt"] = json!({
            "outputSpeech": {"type": "SSML", "ssml": format!("<speak>{reprompt}</speak>")}
        });
    }

    let mut result = Map::new();
    result.insert("version".to_string(), json!("1.0"));
    result.insert("response".to_string(), response);
    if let Some(attributes) = attributes {
        result.insert("sessionAttributes".to_string(), attributes);
    }
    Value::Object(result)
}

/// Plain-text variant of [`speech_result`].
#[must_use]
pub fn text_result(text: &str) -> Value {
    json!({"version": "1.0", "response": {"outputSpeech": {"type": "PlainText", "text": text}}})
}

/// Responds to each intent with a canned result; unknown intents fail.
#[derive(Debug, Clone, Default)]
pub struct StubSkill {
    responses: HashMap<String, Value>,
}

impl StubSkill {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on(mut self, intent: &str, result: Value) -> Self {
        self.responses.insert(intent.to_string(), result);
        self
    }
}

impl SkillHandler for StubSkill {
    fn handle(&self, request: Request, completion: Completion) {
        match self.responses.get(request.intent_name()) {
            Some(result) => completion.succeed(result.clone()),
            None => completion.fail(anyhow!("no stub response for intent {}", request.intent_name())),
        }
    }
}

/// Wraps a handler and keeps a copy of every request it receives.
pub struct RecordingHandler<H> {
    inner: Arc<H>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl<H> Clone for RecordingHandler<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            requests: Arc::clone(&self.requests),
        }
    }
}

impl<H: SkillHandler> RecordingHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner: Arc::new(inner),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared view of the recorded requests, usable after the handler moved.
    #[must_use]
    pub fn requests(&self) -> Arc<Mutex<Vec<Request>>> {
        Arc::clone(&self.requests)
    }
}

impl<H: SkillHandler> SkillHandler for RecordingHandler<H> {
    fn handle(&self, request: Request, completion: Completion) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.inner.handle(request, completion);
    }
}
