use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConverseError, Result};

pub const DEFAULT_SESSION_ID: &str = "SessionId.ee2e2123-75dc-4b32-bf87-8633ba72c294";
pub const DEFAULT_USER_ID: &str = "amzn1.ask.account.AHEYQEFEHVSPRHPZS4ZKSLDADKC62MMFTEC7MVZ636U56XIFWCFUAJ2Q2RJE47PNDHDBEEMMDTEQXWFSK3OPALF4G2D2QAJW4SDMEI5DCULK5G4R32T76G5SZIWDMJ2ZZQ37UYH2BIXBQ3GIGEBIRW4M4YV5QOQG3JXHB73CTH6AAPYZBOIQE5N3IKUETT54HMTRUX2EILTFGWQ";
pub const DEFAULT_ACCESS_TOKEN: &str =
    "0b42d14150e71fb356f2abc42f5bc261dd18573a86a84aa5d7a74592b505a0b7";
pub const DEFAULT_REQUEST_ID: &str = "EdwRequestId.33ac9138-640f-4e6e-ab71-b9619b2c2210";
pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.93;

/// Settings for one simulated conversation.
///
/// The handler under test is not part of this value; it is handed to
/// [`crate::ConversationBuilder`] directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_access_token")]
    pub access_token: String,
    #[serde(default = "default_request_id")]
    pub request_id: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub fix_spaces: bool,
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    /// Replaces the generated `context` block verbatim when set.
    #[serde(default)]
    pub context_override: Option<Value>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            session_id: default_session_id(),
            user_id: default_user_id(),
            access_token: default_access_token(),
            request_id: default_request_id(),
            locale: default_locale(),
            fix_spaces: false,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            context_override: None,
        }
    }
}

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_access_token() -> String {
    DEFAULT_ACCESS_TOKEN.to_string()
}

fn default_request_id() -> String {
    DEFAULT_REQUEST_ID.to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

const fn default_fuzzy_threshold() -> f64 {
    DEFAULT_FUZZY_THRESHOLD
}

impl ConversationConfig {
    #[must_use]
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self.access_token = access_token.into();
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub const fn with_fix_spaces(mut self, fix_spaces: bool) -> Self {
        self.fix_spaces = fix_spaces;
        self
    }

    #[must_use]
    pub const fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_context_override(mut self, context: Value) -> Self {
        self.context_override = Some(context);
        self
    }

    /// Load configuration from disk and the environment.
    ///
    /// An explicit path (or `CONVERSE_CONFIG`) replaces the global and
    /// project files. Environment overrides are applied last.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("CONVERSE_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                ConverseError::MissingConfig(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_root.join("converse.toml"))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a complete configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let patch: ConfigPatch = toml::from_str(raw)
            .map_err(|err| ConverseError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("converse/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)?;
        let patch = toml::from_str(&raw).map_err(|err| {
            ConverseError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(value) = patch.app_id {
            self.app_id = value;
        }
        if let Some(value) = patch.session_id {
            self.session_id = value;
        }
        if let Some(value) = patch.user_id {
            self.user_id = value;
        }
        if let Some(value) = patch.access_token {
            self.access_token = value;
        }
        if let Some(value) = patch.request_id {
            self.request_id = value;
        }
        if let Some(value) = patch.locale {
            self.locale = value;
        }
        if let Some(value) = patch.fix_spaces {
            self.fix_spaces = value;
        }
        if let Some(value) = patch.fuzzy_threshold {
            self.fuzzy_threshold = value;
        }
        if let Some(value) = patch.context_override {
            self.context_override = Some(value);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `CONVERSE_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CONVERSE_APP_ID") {
            self.app_id = value;
        }
        if let Some(value) = lookup("CONVERSE_SESSION_ID") {
            self.session_id = value;
        }
        if let Some(value) = lookup("CONVERSE_USER_ID") {
            self.user_id = value;
        }
        if let Some(value) = lookup("CONVERSE_ACCESS_TOKEN") {
            self.access_token = value;
        }
        if let Some(value) = lookup("CONVERSE_REQUEST_ID") {
            self.request_id = value;
        }
        if let Some(value) = lookup("CONVERSE_LOCALE") {
            self.locale = value;
        }
        if let Some(value) = lookup("CONVERSE_FIX_SPACES") {
            self.fix_spaces = parse_bool(&value);
        }
        if let Some(value) = lookup("CONVERSE_FUZZY_THRESHOLD") {
            self.fuzzy_threshold = value.parse::<f64>().map_err(|err| {
                ConverseError::Config(format!(
                    "invalid CONVERSE_FUZZY_THRESHOLD value {value}: {err}"
                ))
            })?;
        }
        Ok(())
    }

    /// Check values that would make matching meaningless.
    ///
    /// A missing `app_id` is not rejected here; it fails when the
    /// conversation is built.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(ConverseError::Config(format!(
                "fuzzy_threshold must be within [0, 1], got {}",
                self.fuzzy_threshold
            )));
        }
        if self.locale.trim().is_empty() {
            return Err(ConverseError::Config("locale must not be empty".to_string()));
        }
        Ok(())
    }

    /// Whether an application id has been configured.
    #[must_use]
    pub fn has_app_id(&self) -> bool {
        !self.app_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub app_id: Option<String>,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub access_token: Option<String>,
    pub request_id: Option<String>,
    pub locale: Option<String>,
    pub fix_spaces: Option<bool>,
    pub fuzzy_threshold: Option<f64>,
    pub context_override: Option<Value>,
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
