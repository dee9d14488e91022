//! Default device/platform context block.

use serde_json::{Value, json};

use crate::config::ConversationConfig;

/// Static context describing an audio-capable device with an active player.
#[must_use]
pub fn default_context(config: &ConversationConfig) -> Value {
    json!({
        "System": {
            "device": {
                "deviceId": "deviceId",
                "supportedInterfaces": {
                    "AudioPlayer": {}
                }
            },
            "application": {
                "applicationId": config.app_id
            },
            "user": {
                "userId": config.user_id,
                "accessToken": config.access_token,
                "permissions": {
                    "consentToken": "ContentTokenZZZZZ"
                }
            },
            "apiEndpoint": "https://api.amazonalexa.com",
            "apiAccessToken": "AxThk..."
        },
        "AudioPlayer": {
            "playerActivity": "PLAYING",
            "token": "audioplayer-token",
            "offsetInMilliseconds": 0
        }
    })
}

/// The context a request should carry: the override verbatim, else the default.
#[must_use]
pub fn resolve_context(config: &ConversationConfig) -> Value {
    config
        .context_override
        .clone()
        .unwrap_or_else(|| default_context(config))
}
