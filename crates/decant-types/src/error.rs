//! Structured error and report types shared by validation and resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Success,
    Failed,
    Warning,
}

/// Result of one validation check, as reported by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    /// Human-readable detail. Empty on success.
    #[serde(default)]
    pub message: String,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            status: ValidationStatus::Success,
            message: String::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Failed,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Warning,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ValidationStatus::Success
    }
}

/// Classification of a setting failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingErrorCategory {
    /// A required setting resolved to no value at all.
    Missing,
    /// A value was found but does not satisfy the setting's kind.
    InvalidValue,
    /// A declared env alias is not a legal environment variable name.
    Alias,
}

impl SettingErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingErrorCategory::Missing => "missing",
            SettingErrorCategory::InvalidValue => "invalid_value",
            SettingErrorCategory::Alias => "alias",
        }
    }
}

impl fmt::Display for SettingErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for one setting of one plugin.
///
/// Serializable so the CLI can emit machine-readable reports; the `Display`
/// form is what lands in logs and terminal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("[{category}] {plugin}/{setting}: {message}")]
pub struct SettingError {
    pub category: SettingErrorCategory,
    /// Name of the plugin the setting belongs to.
    pub plugin: String,
    /// Setting name as declared in the manifest.
    pub setting: String,
    pub message: String,
}

impl SettingError {
    pub fn missing(
        plugin: impl Into<String>,
        setting: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: SettingErrorCategory::Missing,
            plugin: plugin.into(),
            setting: setting.into(),
            message: message.into(),
        }
    }

    pub fn invalid_value(
        plugin: impl Into<String>,
        setting: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: SettingErrorCategory::InvalidValue,
            plugin: plugin.into(),
            setting: setting.into(),
            message: message.into(),
        }
    }

    pub fn alias(
        plugin: impl Into<String>,
        setting: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: SettingErrorCategory::Alias,
            plugin: plugin.into(),
            setting: setting.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
