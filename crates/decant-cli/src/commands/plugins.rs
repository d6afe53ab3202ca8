//! `decant plugins`: list the plugins the project declares.

use std::path::Path;

use anyhow::Result;

use decant_types::manifest::PluginDecl;

pub fn run(project: Option<&Path>) -> Result<()> {
    let (path, manifest) = super::load_project(project)?;

    if manifest.plugin_count() == 0 {
        println!("No plugins declared in {}", path.display());
        println!("Add extractors and loaders under the `plugins:` key.");
        return Ok(());
    }

    if !manifest.plugins.extractors.is_empty() {
        println!("Extractors:");
        for plugin in &manifest.plugins.extractors {
            print_plugin(plugin);
        }
    }

    if !manifest.plugins.loaders.is_empty() {
        if !manifest.plugins.extractors.is_empty() {
            println!();
        }
        println!("Loaders:");
        for plugin in &manifest.plugins.loaders {
            print_plugin(plugin);
        }
    }

    Ok(())
}

fn print_plugin(plugin: &PluginDecl) {
    match &plugin.variant {
        Some(variant) => println!("  {} ({variant})", plugin.name),
        None => println!("  {}", plugin.name),
    }
    if let Some(label) = &plugin.label {
        println!("    {label}");
    }
    if let Some(executable) = &plugin.executable {
        println!("    executable:   {executable}");
    }
    if let Some(pip_url) = &plugin.pip_url {
        println!("    package:      {pip_url}");
    }
    if !plugin.capabilities.is_empty() {
        let caps: Vec<&str> = plugin.capabilities.iter().map(|c| c.as_str()).collect();
        println!("    capabilities: [{}]", caps.join(", "));
    }
    if !plugin.settings.is_empty() {
        let required = plugin.settings.iter().filter(|s| s.required).count();
        println!(
            "    settings:     {} declared, {required} required",
            plugin.settings.len()
        );
    }
}
