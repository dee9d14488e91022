//! Wire shape of a synthesized intent request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const REQUEST_VERSION: &str = "1.0";
pub const INTENT_REQUEST: &str = "IntentRequest";

/// A complete request as delivered to the handler under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub session: Session,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub request: IntentRequest,
    pub version: String,
}

impl Request {
    /// Serialize to the JSON value a skill would receive.
    pub fn to_json(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    #[must_use]
    pub fn intent_name(&self) -> &str {
        &self.request.intent.name
    }

    #[must_use]
    pub const fn is_new_session(&self) -> bool {
        self.session.is_new
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub application: Application,
    pub attributes: Map<String, Value>,
    pub user: User,
    #[serde(rename = "new")]
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub request_id: String,
    pub locale: String,
    /// ISO-8601, UTC, millisecond precision.
    pub timestamp: String,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    /// Materialized slots keyed by slot name.
    pub slots: BTreeMap<String, Value>,
}
