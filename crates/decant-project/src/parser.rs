//! Project-file parser with environment variable substitution.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use decant_types::manifest::ProjectManifest;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Substitute `${VAR}` references with environment variable values.
///
/// An unset variable expands to the empty string with a warning, so a
/// project file that references deploy-time variables can still be parsed
/// and validated on a machine that does not have them exported.
pub fn substitute_env_vars(content: &str) -> String {
    ENV_VAR_RE
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!(
                        var = var_name,
                        "Environment variable not set, substituting empty string"
                    );
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Parse a project manifest from a YAML string.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or does not match the manifest
/// shape (unknown setting kinds and capabilities are parse errors).
pub fn parse_project_str(yaml_str: &str) -> Result<ProjectManifest> {
    let substituted = substitute_env_vars(yaml_str);
    let manifest: ProjectManifest =
        serde_yaml::from_str(&substituted).context("Failed to parse project YAML")?;
    Ok(manifest)
}

/// Parse a project file from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn parse_project(path: &Path) -> Result<ProjectManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {}", path.display()))?;
    parse_project_str(&content)
}

/// Parse a project file into its raw YAML document, with env references
/// expanded. The raw value feeds the structural schema check; callers turn
/// it into a typed manifest with [`manifest_from_raw`] once the shape is
/// known good, so shape problems surface with document paths instead of
/// serde messages.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub fn parse_raw(path: &Path) -> Result<serde_yaml::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {}", path.display()))?;
    let substituted = substitute_env_vars(&content);
    let raw: serde_yaml::Value =
        serde_yaml::from_str(&substituted).context("Failed to parse project YAML")?;
    Ok(raw)
}

/// Build the typed manifest from a raw document.
///
/// # Errors
///
/// Returns an error if the document does not match the manifest shape.
pub fn manifest_from_raw(raw: serde_yaml::Value) -> Result<ProjectManifest> {
    let manifest: ProjectManifest =
        serde_yaml::from_value(raw).context("Failed to parse project YAML")?;
    Ok(manifest)
}

/// Parse a project file, returning both the raw YAML document and the typed
/// manifest. Both come from the same substituted text, so env references
/// are expanded exactly once.
///
/// # Errors
///
/// Returns an error if the file cannot be read or either parse fails.
pub fn parse_project_with_raw(path: &Path) -> Result<(serde_yaml::Value, ProjectManifest)> {
    let raw = parse_raw(path)?;
    let manifest = manifest_from_raw(raw.clone())?;
    Ok((raw, manifest))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("DECANT_PARSER_TEST_VAR", "tap-googleads");
        let result = substitute_env_vars("name: ${DECANT_PARSER_TEST_VAR}");
        assert_eq!(result, "name: tap-googleads");
        std::env::remove_var("DECANT_PARSER_TEST_VAR");
    }

    #[test]
    fn test_substitute_missing_var_expands_empty() {
        let result = substitute_env_vars("token: '${DECANT_PARSER_TEST_UNSET}'");
        assert_eq!(result, "token: ''");
    }

    #[test]
    fn test_substitute_multiple_vars() {
        std::env::set_var("DECANT_PARSER_TEST_A", "one");
        std::env::set_var("DECANT_PARSER_TEST_B", "two");
        let result = substitute_env_vars("${DECANT_PARSER_TEST_A}-${DECANT_PARSER_TEST_B}");
        assert_eq!(result, "one-two");
        std::env::remove_var("DECANT_PARSER_TEST_A");
        std::env::remove_var("DECANT_PARSER_TEST_B");
    }

    #[test]
    fn test_no_substitution_needed() {
        let input = "version: 1\nplugins: {}\n";
        assert_eq!(substitute_env_vars(input), input);
    }

    #[test]
    fn test_dollar_without_braces_left_alone() {
        let input = "pip_url: git+https://host/repo.git@$REF";
        assert_eq!(substitute_env_vars(input), input);
    }

    #[test]
    fn test_parse_project_str_minimal() {
        let manifest = parse_project_str("version: 1\n").unwrap();
        assert_eq!(manifest.version, 1);
        assert_eq!(manifest.plugin_count(), 0);
    }

    #[test]
    fn test_parse_project_str_with_substitution() {
        std::env::set_var("DECANT_PARSER_TEST_VARIANT", "andyh1203");
        let yaml = r#"
version: 1
plugins:
  loaders:
  - name: target-jsonl
    variant: ${DECANT_PARSER_TEST_VARIANT}
    pip_url: target-jsonl
"#;
        let manifest = parse_project_str(yaml).unwrap();
        assert_eq!(
            manifest.plugins.loaders[0].variant.as_deref(),
            Some("andyh1203")
        );
        std::env::remove_var("DECANT_PARSER_TEST_VARIANT");
    }

    #[test]
    fn test_parse_project_str_malformed_yaml() {
        let result = parse_project_str("version: 1\nplugins: [not: a: mapping\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_project_str_unknown_kind_rejected() {
        let yaml = r#"
version: 1
plugins:
  extractors:
  - name: tap-x
    settings:
    - name: token
      kind: secret
"#;
        let err = parse_project_str(yaml).unwrap_err();
        assert!(format!("{err:#}").contains("unknown variant"));
    }

    #[test]
    fn test_parse_project_missing_file() {
        let err = parse_project(Path::new("/nonexistent/decant.yml")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read project file"));
    }

    #[test]
    fn test_manifest_from_raw() {
        let raw: serde_yaml::Value = serde_yaml::from_str(
            "version: 1\nplugins:\n  loaders:\n  - name: target-jsonl\n    pip_url: target-jsonl\n",
        )
        .unwrap();
        let manifest = manifest_from_raw(raw).unwrap();
        assert_eq!(manifest.plugins.loaders[0].name, "target-jsonl");
    }

    #[test]
    fn test_raw_parse_tolerates_unknown_kind() {
        // Shape problems are the schema check's business; the raw parse only
        // rejects YAML that is not YAML.
        let raw = serde_yaml::from_str::<serde_yaml::Value>(
            "version: 1\nplugins:\n  extractors:\n  - name: tap-x\n    settings:\n    - name: token\n      kind: nope\n",
        )
        .unwrap();
        assert!(manifest_from_raw(raw).is_err());
    }
}
