//! Project manifest types: the parsed form of a `decant.yml` document.

mod plugin;
mod setting;

pub use plugin::{Capability, PluginDecl, PluginType};
pub use setting::{env_var_name, SettingDecl, SettingKind};

use serde::{Deserialize, Serialize};

/// Document schema version understood by this build.
pub const SUPPORTED_VERSION: u32 = 1;

fn default_version() -> u32 {
    SUPPORTED_VERSION
}

fn default_send_anonymous_usage_stats() -> bool {
    true
}

/// A decant project manifest.
///
/// Declares the extractors and loaders a project uses, together with each
/// plugin's configuration surface (settings, env aliases, capability flags).
/// The document is parsed once and treated as immutable afterwards; nothing
/// in decant writes it back except `decant init`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Manifest schema version. Currently always `1`.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Whether an orchestration runtime may phone home anonymous usage
    /// counts. Defaults to true, matching the hosted runtime's behavior.
    #[serde(default = "default_send_anonymous_usage_stats")]
    pub send_anonymous_usage_stats: bool,

    /// Project identifier. `decant init` generates a v4 UUID; hand-written
    /// files may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Declared plugins, grouped by type.
    #[serde(default)]
    pub plugins: Plugins,
}

impl Default for ProjectManifest {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            send_anonymous_usage_stats: true,
            project_id: None,
            plugins: Plugins::default(),
        }
    }
}

/// Plugin declarations grouped by plugin type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Plugins {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extractors: Vec<PluginDecl>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub loaders: Vec<PluginDecl>,
}

impl ProjectManifest {
    /// Iterate over every declared plugin, extractors first.
    pub fn iter_plugins(&self) -> impl Iterator<Item = (PluginType, &PluginDecl)> {
        self.plugins
            .extractors
            .iter()
            .map(|p| (PluginType::Extractor, p))
            .chain(self.plugins.loaders.iter().map(|p| (PluginType::Loader, p)))
    }

    /// Look up a plugin by name across both lists.
    pub fn find_plugin(&self, name: &str) -> Option<(PluginType, &PluginDecl)> {
        self.iter_plugins().find(|(_, p)| p.name == name)
    }

    /// Total number of declared plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.extractors.len() + self.plugins.loaders.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document_applies_defaults() {
        let yaml = "version: 1\n";
        let manifest: ProjectManifest = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(manifest.version, 1);
        assert!(manifest.send_anonymous_usage_stats);
        assert!(manifest.project_id.is_none());
        assert_eq!(manifest.plugin_count(), 0);
    }

    #[test]
    fn test_full_document_parses() {
        let yaml = r#"
version: 1
send_anonymous_usage_stats: false
project_id: 1c3f9b0a-7a40-4edb-9f5e-2b8a6f6c9d11
plugins:
  extractors:
  - name: tap-demo
    namespace: tap_demo
    capabilities: [state, discover]
    settings:
    - name: api_key
      kind: password
  loaders:
  - name: target-jsonl
    variant: andyh1203
    pip_url: target-jsonl
"#;
        let manifest: ProjectManifest = serde_yaml::from_str(yaml).unwrap();

        assert!(!manifest.send_anonymous_usage_stats);
        assert_eq!(manifest.plugin_count(), 2);

        let (ptype, tap) = manifest.find_plugin("tap-demo").unwrap();
        assert_eq!(ptype, PluginType::Extractor);
        assert_eq!(tap.namespace.as_deref(), Some("tap_demo"));
        assert!(tap.supports(Capability::State));

        let (ptype, target) = manifest.find_plugin("target-jsonl").unwrap();
        assert_eq!(ptype, PluginType::Loader);
        assert_eq!(target.variant.as_deref(), Some("andyh1203"));
    }

    #[test]
    fn test_iter_plugins_orders_extractors_first() {
        let yaml = r#"
version: 1
plugins:
  extractors:
  - name: tap-a
  loaders:
  - name: target-b
"#;
        let manifest: ProjectManifest = serde_yaml::from_str(yaml).unwrap();
        let names: Vec<_> = manifest.iter_plugins().map(|(_, p)| p.name.as_str()).collect();
        assert_eq!(names, vec!["tap-a", "target-b"]);
    }

    #[test]
    fn test_find_plugin_unknown_name() {
        let manifest = ProjectManifest::default();
        assert!(manifest.find_plugin("tap-nope").is_none());
    }

    #[test]
    fn test_serialize_skips_empty_sections() {
        let manifest = ProjectManifest::default();
        let yaml = serde_yaml::to_string(&manifest).unwrap();

        assert!(yaml.contains("version: 1"));
        assert!(!yaml.contains("project_id"));
        assert!(!yaml.contains("extractors"));
    }
}
