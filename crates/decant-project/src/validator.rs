//! Semantic validation of a parsed project manifest.
//!
//! Runs after the structural schema check and collects every problem before
//! failing, so a broken file is fixed in one pass rather than one error at
//! a time.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;

use decant_types::manifest::{PluginDecl, PluginType, ProjectManifest, SUPPORTED_VERSION};

use crate::resolve::{check_value, value_to_string};

static ENV_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid env name regex"));

/// Validate a project manifest.
///
/// # Errors
///
/// Returns a single error listing every semantic problem found: unsupported
/// version, malformed project id, duplicate plugin or setting names, plugins
/// with no way to run, illegal env aliases, and declared defaults that do
/// not match their setting's kind.
pub fn validate_project(manifest: &ProjectManifest) -> Result<()> {
    let mut errors = Vec::new();

    if manifest.version != SUPPORTED_VERSION {
        errors.push(format!(
            "Unsupported document version {} (this build understands version {})",
            manifest.version, SUPPORTED_VERSION
        ));
    }

    if let Some(project_id) = &manifest.project_id {
        if uuid::Uuid::parse_str(project_id).is_err() {
            errors.push(format!("project_id '{project_id}' is not a valid UUID"));
        }
    }

    check_unique_names(PluginType::Extractor, &manifest.plugins.extractors, &mut errors);
    check_unique_names(PluginType::Loader, &manifest.plugins.loaders, &mut errors);

    for (plugin_type, plugin) in manifest.iter_plugins() {
        validate_plugin(plugin_type, plugin, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        bail!("Project validation failed:\n  - {}", errors.join("\n  - "));
    }
}

fn check_unique_names(plugin_type: PluginType, plugins: &[PluginDecl], errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for plugin in plugins {
        if !plugin.name.trim().is_empty() && !seen.insert(plugin.name.as_str()) {
            errors.push(format!(
                "Duplicate {} name '{}'",
                plugin_type, plugin.name
            ));
        }
    }
}

fn validate_plugin(plugin_type: PluginType, plugin: &PluginDecl, errors: &mut Vec<String>) {
    if plugin.name.trim().is_empty() {
        errors.push(format!("A declared {plugin_type} has an empty name"));
        return;
    }
    let who = format!("{} '{}'", plugin_type, plugin.name);

    if plugin.executable.is_none() && plugin.pip_url.is_none() {
        errors.push(format!(
            "{who} declares neither an executable nor a pip_url, so no runtime could launch it"
        ));
    }

    let mut seen_settings = HashSet::new();
    for setting in &plugin.settings {
        if setting.name.trim().is_empty() {
            errors.push(format!("{who} has a setting with an empty name"));
            continue;
        }
        if !seen_settings.insert(setting.name.as_str()) {
            errors.push(format!(
                "{who} declares setting '{}' more than once",
                setting.name
            ));
        }

        for alias in &setting.env_aliases {
            if !ENV_NAME_RE.is_match(alias) {
                errors.push(format!(
                    "{who} setting '{}' has env alias '{alias}' which is not a legal environment variable name",
                    setting.name
                ));
            }
        }

        if let Some(default) = &setting.value {
            match value_to_string(default) {
                Some(raw) => {
                    if let Err(reason) = check_value(setting.kind, &raw) {
                        errors.push(format!(
                            "{who} setting '{}' declares a default that fails its {} check: {reason}",
                            setting.name, setting.kind
                        ));
                    }
                }
                None => errors.push(format!(
                    "{who} setting '{}' declares a null default; omit `value` instead",
                    setting.name
                )),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
