//! `decant validate`: check the project file and report per-plugin status.

use std::path::Path;

use anyhow::{bail, Result};

use decant_project::{parser, resolve, schema, validator};
use decant_types::error::{ValidationResult, ValidationStatus};

/// Run the validate command.
///
/// A document that fails the schema check or semantic validation is an
/// error. Plugins whose required settings cannot be resolved from this
/// environment are reported as FAILED but only fail the command under
/// `--strict`, so a project file can be validated on a machine without
/// credentials.
pub fn run(project: Option<&Path>, strict: bool) -> Result<()> {
    let path = super::project_path(project)?;
    println!("Validating project: {}\n", path.display());

    // 1. Parse project YAML (env references expanded)
    let raw = parser::parse_raw(&path)?;
    print_check("Syntax", "OK");

    // 2. Structural schema check on the raw document
    schema::check_document(&raw)?;
    print_check("Document schema", "OK");

    // 3. Typed parse and semantic validation
    let manifest = parser::manifest_from_raw(raw)?;
    validator::validate_project(&manifest)?;
    print_check("Project rules", "OK");

    // 4. Resolve each plugin's settings against the environment
    println!();
    let mut failed = 0usize;
    for (plugin_type, plugin) in manifest.iter_plugins() {
        let resolved = resolve::resolve_plugin(plugin_type, plugin);
        let result = resolved.validation_result();
        print_validation(&format!("{} {}", plugin_type, plugin.name), &result);
        if result.status != ValidationStatus::Success {
            failed += 1;
        }
    }

    println!();
    if failed == 0 {
        tracing::info!(project = %path.display(), "Project is valid");
        println!("All checks passed.");
        Ok(())
    } else if strict {
        bail!("{failed} plugin(s) have unresolved or invalid settings");
    } else {
        println!(
            "Document is valid; {failed} plugin(s) are missing required settings in this environment."
        );
        Ok(())
    }
}

fn print_check(label: &str, status: &str) {
    println!("{:28} {}", format!("{label}:"), status);
}

fn print_validation(label: &str, result: &ValidationResult) {
    let status = match result.status {
        ValidationStatus::Success => "OK",
        ValidationStatus::Failed => "FAILED",
        ValidationStatus::Warning => "WARNING",
    };
    print_check(label, status);
    if !result.message.is_empty() {
        for part in result.message.split("; ") {
            println!("    {part}");
        }
    }
}
