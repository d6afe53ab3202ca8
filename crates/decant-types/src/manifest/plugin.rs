//! Plugin declarations: one entry in the manifest's extractor or loader list.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::manifest::SettingDecl;

/// Which manifest list a plugin declaration lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginType {
    Extractor,
    Loader,
}

impl PluginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginType::Extractor => "extractor",
            PluginType::Loader => "loader",
        }
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A feature a plugin advertises support for.
///
/// The set is closed: an unrecognized capability string is a parse error,
/// not a silently-ignored extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Accepts a catalog file that selects and shapes streams.
    Catalog,
    /// Can run in discovery mode and print its catalog.
    Discover,
    /// Emits and accepts incremental replication state.
    State,
    /// Legacy spelling of catalog selection.
    Properties,
    /// Can describe itself (version, docs url) on request.
    About,
    /// Supports inline stream-map transforms.
    StreamMaps,
    /// Supports activate-version/soft-delete semantics.
    ActivateVersion,
    /// Supports a connection test mode.
    Test,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Catalog => "catalog",
            Capability::Discover => "discover",
            Capability::State => "state",
            Capability::Properties => "properties",
            Capability::About => "about",
            Capability::StreamMaps => "stream-maps",
            Capability::ActivateVersion => "activate-version",
            Capability::Test => "test",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One plugin declaration.
///
/// A plugin is installable when it has a `pip_url`, directly runnable when it
/// has an `executable`, and must have at least one of the two. Everything a
/// runtime needs to configure the plugin lives in `settings`; `config` holds
/// inline values for those settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDecl {
    /// Plugin name, e.g. "tap-googleads". Unique within its list.
    pub name: String,

    /// Namespace for grouping and catalog lookup, e.g. "tap_googleads".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Which published variant of the plugin this declaration pins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Executable a runtime invokes directly, e.g. "./tap-googleads.sh".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Package locator handed to the runtime's installer. Opaque to decant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pip_url: Option<String>,

    /// Human-readable display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Capability flags the plugin advertises.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,

    /// The plugin's configuration surface.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<SettingDecl>,

    /// Inline setting values, keyed by setting name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, serde_yaml::Value>,
}

impl PluginDecl {
    /// Check whether this plugin declares a capability.
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Find a setting definition by name.
    pub fn setting(&self, name: &str) -> Option<&SettingDecl> {
        self.settings.iter().find(|s| s.name == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
