//! Per-conversation request synthesis.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ConversationConfig;
use crate::error::{ConverseError, Result};

use super::context::resolve_context;
use super::slots::Slots;
use super::types::{
    Application, INTENT_REQUEST, Intent, IntentRequest, REQUEST_VERSION, Request, Session, User,
};

/// Builds one request per turn, tracking whether the session is new.
///
/// One builder belongs to one conversation; the first successful build
/// opens the session and every later build continues it.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: ConversationConfig,
    is_new: bool,
}

impl RequestBuilder {
    #[must_use]
    pub const fn new(config: ConversationConfig) -> Self {
        Self {
            config,
            is_new: true,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// Whether the next built request will open the session.
    #[must_use]
    pub const fn next_is_new(&self) -> bool {
        self.is_new
    }

    /// Build the request for `intent_name`, continuing from `prior` (the
    /// previous turn's raw result) when there is one.
    pub fn build(&mut self, intent_name: &str, slots: &Slots, prior: Option<&Value>) -> Result<Request> {
        if !self.config.has_app_id() {
            return Err(ConverseError::Config(
                "application id not specified; set app_id before building a request".to_string(),
            ));
        }

        let request = Request {
            session: Session {
                session_id: self.config.session_id.clone(),
                application: Application {
                    application_id: self.config.app_id.clone(),
                },
                attributes: session_attributes(prior),
                user: User {
                    user_id: self.config.user_id.clone(),
                    access_token: self.config.access_token.clone(),
                },
                is_new: self.is_new,
            },
            context: Some(resolve_context(&self.config)),
            request: IntentRequest {
                kind: INTENT_REQUEST.to_string(),
                request_id: self.config.request_id.clone(),
                locale: self.config.locale.clone(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                intent: Intent {
                    name: intent_name.to_string(),
                    slots: slots.materialize(),
                },
            },
            version: REQUEST_VERSION.to_string(),
        };

        debug!(
            intent = intent_name,
            slots = slots.len(),
            new_session = self.is_new,
            attributes = request.session.attributes.len(),
            "built intent request"
        );

        self.is_new = false;
        Ok(request)
    }
}

/// Session attributes carried over from the previous turn's result.
fn session_attributes(prior: Option<&Value>) -> Map<String, Value> {
    match prior.and_then(|result| result.get("sessionAttributes")) {
        Some(Value::Object(attributes)) => attributes.clone(),
        None | Some(Value::Null) => Map::new(),
        Some(other) => {
            warn!(
                value = %other,
                "sessionAttributes is not an object; starting the turn with empty attributes"
            );
            Map::new()
        }
    }
}
