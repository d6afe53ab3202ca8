//! Setting definitions: a plugin's declared configuration surface.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value kind of a setting.
///
/// The kind drives two behaviors at resolution time: format checking of the
/// resolved value, and whether the value is a secret that must never be
/// printed in plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    /// Free-form string. The default when `kind` is omitted.
    #[default]
    String,
    Integer,
    Boolean,
    /// ISO-8601 calendar date or timestamp.
    DateIso8601,
    Email,
    /// Secret credential. Redacted in all output.
    Password,
    /// Internal plumbing value, hidden from interactive surfaces and
    /// redacted like a password.
    Hidden,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::String => "string",
            SettingKind::Integer => "integer",
            SettingKind::Boolean => "boolean",
            SettingKind::DateIso8601 => "date_iso8601",
            SettingKind::Email => "email",
            SettingKind::Password => "password",
            SettingKind::Hidden => "hidden",
        }
    }

    /// True for kinds whose values must never appear in plaintext output.
    pub fn is_secret(&self) -> bool {
        matches!(self, SettingKind::Password | SettingKind::Hidden)
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_required() -> bool {
    true
}

/// One setting definition in a plugin's configuration surface.
///
/// Settings are named with dot-paths ("oauth_credentials.client_id") that
/// mirror the nested config object the plugin ultimately receives. A setting
/// is required unless the declaration says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDecl {
    /// Setting name as a dot-path into the plugin's config object.
    pub name: String,

    /// Value kind. Omitted means `string`.
    #[serde(default)]
    pub kind: SettingKind,

    /// Human-readable label for interactive surfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Extra environment variable names that satisfy this setting, checked
    /// in order after the canonical variable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_aliases: Vec<String>,

    /// Whether the setting must resolve to a value. Omitted means required.
    #[serde(default = "default_required")]
    pub required: bool,

    /// Declared default, used when nothing else supplies a value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_yaml::Value>,
}

impl SettingDecl {
    /// True if this setting's resolved value must never be printed in
    /// plaintext.
    pub fn is_secret(&self) -> bool {
        self.kind.is_secret()
    }

    /// Canonical environment variable for this setting under `plugin_name`.
    pub fn canonical_env_var(&self, plugin_name: &str) -> String {
        env_var_name(plugin_name, &self.name)
    }
}

/// Mangle a plugin and setting name into the canonical environment variable:
/// both parts uppercased, every non-alphanumeric character mapped to `_`.
///
/// `env_var_name("tap-googleads", "oauth_credentials.client_id")` yields
/// `TAP_GOOGLEADS_OAUTH_CREDENTIALS_CLIENT_ID`.
pub fn env_var_name(plugin_name: &str, setting_name: &str) -> String {
    fn mangle(part: &str) -> String {
        part.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    format!("{}_{}", mangle(plugin_name), mangle(setting_name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
