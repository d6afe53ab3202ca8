//! Structural validation of the raw document against the bundled JSON Schema.

use std::sync::LazyLock;

use anyhow::{bail, Context, Result};

/// Draft-07 schema for the project document, bundled at compile time.
pub const PROJECT_SCHEMA_JSON: &str = include_str!("../schema/project.schema.json");

static PROJECT_SCHEMA: LazyLock<jsonschema::Validator> = LazyLock::new(|| {
    let schema: serde_json::Value =
        serde_json::from_str(PROJECT_SCHEMA_JSON).expect("bundled schema is valid JSON");
    jsonschema::validator_for(&schema).expect("bundled schema compiles")
});

/// Check a raw project document against the bundled schema.
///
/// # Errors
///
/// Returns a single error listing every schema violation found. Runs before
/// the typed parse is trusted, so shape problems surface with document paths
/// instead of serde messages.
pub fn check_document(doc: &serde_yaml::Value) -> Result<()> {
    let instance = serde_json::to_value(doc)
        .context("Project document is not representable as JSON")?;

    let errors: Vec<String> = PROJECT_SCHEMA
        .iter_errors(&instance)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{e} (at {path})")
            }
        })
        .collect();

    if !errors.is_empty() {
        bail!(
            "Project document failed schema validation:\n  - {}",
            errors.join("\n  - ")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
