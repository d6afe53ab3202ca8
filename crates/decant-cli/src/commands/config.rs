//! `decant config`: show the configuration a plugin would receive.

use std::path::Path;

use anyhow::{bail, Result};
use clap::ValueEnum;

use decant_project::resolve;

/// Marker prefixing the machine-readable report line in text output, so
/// wrapping tools can grab the JSON without parsing the human part.
const CONFIG_JSON_MARKER: &str = "@@CONFIG_JSON@@";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run(
    plugin_name: &str,
    project: Option<&Path>,
    reveal: bool,
    format: OutputFormat,
) -> Result<()> {
    let (path, manifest) = super::load_project(project)?;

    let Some((plugin_type, plugin)) = manifest.find_plugin(plugin_name) else {
        bail!(
            "Plugin '{plugin_name}' is not declared in {}",
            path.display()
        );
    };

    let resolved = resolve::resolve_plugin(plugin_type, plugin);
    let report = resolved.to_json(reveal);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!(
                "Resolved configuration for {} '{}':\n",
                plugin_type, plugin.name
            );
            if resolved.settings.is_empty() {
                println!("  (no settings declared)");
            }
            for setting in &resolved.settings {
                println!(
                    "  {:<44} {:<24} {}",
                    setting.name,
                    setting.rendered_value(reveal),
                    setting.source
                );
            }
            if !resolved.errors.is_empty() {
                println!();
                for err in &resolved.errors {
                    println!("  ! {err}");
                }
            }
            println!();
            println!("{CONFIG_JSON_MARKER}{}", serde_json::to_string(&report)?);
        }
    }

    Ok(())
}
