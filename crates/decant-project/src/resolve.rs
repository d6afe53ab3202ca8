//! Settings resolution: compute the configuration each plugin would receive
//! from the current environment, inline config, and declared defaults.
//!
//! Precedence per setting, highest first:
//!   1. canonical env var (`<PLUGIN>_<SETTING>` mangled to uppercase)
//!   2. declared env aliases, in declaration order
//!   3. inline `config` entry in the plugin declaration
//!   4. declared default `value` on the setting
//! A required setting that falls through every tier is a `missing` error;
//! a value that fails its kind's format check is an `invalid_value` error.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use decant_types::error::{SettingError, ValidationResult};
use decant_types::manifest::{PluginDecl, PluginType, SettingDecl, SettingKind};

/// Placeholder printed in place of secret values.
pub const REDACTED: &str = "(redacted)";

/// Where a resolved setting value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "from", content = "var")]
pub enum SettingSource {
    /// The canonical environment variable for the plugin/setting pair.
    Env(String),
    /// One of the setting's declared alias variables.
    EnvAlias(String),
    /// Inline `config` entry in the plugin declaration.
    ConfigFile,
    /// Declared default `value` on the setting definition.
    Default,
    /// No tier produced a value.
    Unset,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingSource::Env(var) => write!(f, "env ${var}"),
            SettingSource::EnvAlias(var) => write!(f, "env ${var} (alias)"),
            SettingSource::ConfigFile => write!(f, "project file config"),
            SettingSource::Default => write!(f, "declared default"),
            SettingSource::Unset => write!(f, "unset"),
        }
    }
}

/// One setting after resolution.
///
/// Holds the raw value; anything that renders it must go through
/// [`ResolvedSetting::rendered_value`] or [`ResolvedSetting::to_json`] so
/// secrets stay redacted by default.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSetting {
    pub name: String,
    pub kind: SettingKind,
    pub required: bool,
    pub value: Option<String>,
    pub source: SettingSource,
}

impl ResolvedSetting {
    /// Value as safe for output. Secrets render as [`REDACTED`] unless
    /// `reveal` is set; an absent value renders as "(unset)".
    pub fn rendered_value(&self, reveal: bool) -> String {
        match &self.value {
            None => "(unset)".to_string(),
            Some(_) if self.kind.is_secret() && !reveal => REDACTED.to_string(),
            Some(v) => v.clone(),
        }
    }

    /// JSON form of this setting with the same redaction rules.
    pub fn to_json(&self, reveal: bool) -> serde_json::Value {
        let value = match &self.value {
            None => serde_json::Value::Null,
            Some(_) if self.kind.is_secret() && !reveal => {
                serde_json::Value::String(REDACTED.to_string())
            }
            Some(v) => serde_json::Value::String(v.clone()),
        };
        serde_json::json!({
            "name": self.name,
            "kind": self.kind,
            "required": self.required,
            "value": value,
            "source": self.source,
        })
    }
}

/// Resolved configuration for one plugin, plus every problem found while
/// resolving it.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub plugin: String,
    pub plugin_type: PluginType,
    pub settings: Vec<ResolvedSetting>,
    pub errors: Vec<SettingError>,
}

impl ResolvedConfig {
    /// True when every required setting resolved and every resolved value
    /// passed its kind check.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Require a complete resolution.
    ///
    /// # Errors
    ///
    /// Returns every missing or invalid setting at once, so a caller can
    /// report the full list instead of the first problem.
    pub fn require_complete(&self) -> Result<(), Vec<SettingError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.clone())
        }
    }

    /// Summary in the shape the CLI reports per plugin.
    pub fn validation_result(&self) -> ValidationResult {
        if self.errors.is_empty() {
            ValidationResult::success()
        } else {
            let detail: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
            ValidationResult::failed(detail.join("; "))
        }
    }

    /// Resolved (name, value) pairs, skipping settings with no value.
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings
            .iter()
            .filter_map(|s| s.value.as_deref().map(|v| (s.name.as_str(), v)))
    }

    /// JSON report of the whole resolution, redacting secrets unless
    /// `reveal` is set.
    pub fn to_json(&self, reveal: bool) -> serde_json::Value {
        serde_json::json!({
            "plugin": self.plugin,
            "plugin_type": self.plugin_type,
            "settings": self.settings.iter().map(|s| s.to_json(reveal)).collect::<Vec<_>>(),
            "errors": self.errors,
        })
    }
}

/// Resolve a plugin's settings against the current process environment.
///
/// Environment entries that are not valid unicode are treated as unset;
/// `std::env::vars()` would panic on them.
pub fn resolve_plugin(plugin_type: PluginType, plugin: &PluginDecl) -> ResolvedConfig {
    let env: HashMap<String, String> = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();
    resolve_plugin_with_env(plugin_type, plugin, &env)
}

/// Resolve a plugin's settings against an explicit environment map.
///
/// Separated from [`resolve_plugin`] so resolution is deterministic under
/// test without mutating process state.
pub fn resolve_plugin_with_env(
    plugin_type: PluginType,
    plugin: &PluginDecl,
    env: &HashMap<String, String>,
) -> ResolvedConfig {
    let mut settings = Vec::with_capacity(plugin.settings.len());
    let mut errors = Vec::new();

    for decl in &plugin.settings {
        let resolved = resolve_setting(plugin, decl, env);

        if let Some(raw) = &resolved.value {
            if let Err(reason) = check_value(decl.kind, raw) {
                errors.push(SettingError::invalid_value(&plugin.name, &decl.name, reason));
            }
        } else if decl.required {
            errors.push(SettingError::missing(
                &plugin.name,
                &decl.name,
                missing_message(plugin, decl),
            ));
        }

        tracing::debug!(
            plugin = %plugin.name,
            setting = %decl.name,
            source = %resolved.source,
            "Resolved setting"
        );
        settings.push(resolved);
    }

    for name in plugin.config.keys() {
        if plugin.setting(name).is_none() {
            tracing::warn!(
                plugin = %plugin.name,
                setting = %name,
                "Inline config value has no matching setting declaration"
            );
        }
    }

    ResolvedConfig {
        plugin: plugin.name.clone(),
        plugin_type,
        settings,
        errors,
    }
}

fn resolve_setting(
    plugin: &PluginDecl,
    decl: &SettingDecl,
    env: &HashMap<String, String>,
) -> ResolvedSetting {
    let canonical = decl.canonical_env_var(&plugin.name);

    let (value, source) = if let Some(v) = env.get(&canonical) {
        (Some(v.clone()), SettingSource::Env(canonical))
    } else if let Some((alias, v)) = decl
        .env_aliases
        .iter()
        .find_map(|a| env.get(a).map(|v| (a.clone(), v.clone())))
    {
        (Some(v), SettingSource::EnvAlias(alias))
    } else if let Some(raw) = plugin.config.get(&decl.name).and_then(value_to_string) {
        (Some(raw), SettingSource::ConfigFile)
    } else if let Some(raw) = decl.value.as_ref().and_then(value_to_string) {
        (Some(raw), SettingSource::Default)
    } else {
        (None, SettingSource::Unset)
    };

    ResolvedSetting {
        name: decl.name.clone(),
        kind: decl.kind,
        required: decl.required,
        value,
        source,
    }
}

fn missing_message(plugin: &PluginDecl, decl: &SettingDecl) -> String {
    let mut tried = vec![format!("${}", decl.canonical_env_var(&plugin.name))];
    tried.extend(decl.env_aliases.iter().map(|a| format!("${a}")));
    format!("no value resolved; tried {}", tried.join(", "))
}

/// Render an inline YAML value as the string the plugin would receive.
/// Scalars use their natural form; structured values are JSON-encoded.
/// A null collapses to "no value".
pub(crate) fn value_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        other => {
            let json = serde_json::to_value(other).ok()?;
            serde_json::to_string(&json).ok()
        }
    }
}

/// Check a raw value against a setting kind's format.
///
/// # Errors
///
/// Returns a human-readable reason when the value does not satisfy the kind.
pub fn check_value(kind: SettingKind, raw: &str) -> Result<(), String> {
    match kind {
        SettingKind::String | SettingKind::Password | SettingKind::Hidden => Ok(()),
        SettingKind::Integer => match raw.trim().parse::<i64>() {
            Ok(_) => Ok(()),
            Err(_) => Err(format!("'{raw}' is not an integer")),
        },
        SettingKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "false" | "1" | "0" => Ok(()),
            _ => Err(format!("'{raw}' is not a boolean")),
        },
        SettingKind::DateIso8601 => {
            let raw = raw.trim();
            let ok = chrono::DateTime::parse_from_rfc3339(raw).is_ok()
                || chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").is_ok()
                || chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok();
            if ok {
                Ok(())
            } else {
                Err(format!("'{raw}' is not an ISO-8601 date"))
            }
        }
        SettingKind::Email => match raw.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(())
            }
            _ => Err(format!("'{raw}' is not an email address")),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_project_str;
    use decant_types::error::SettingErrorCategory;
    use decant_types::manifest::ProjectManifest;

    fn ads_manifest() -> ProjectManifest {
        parse_project_str(
            r#"
version: 1
plugins:
  extractors:
  - name: tap-googleads
    executable: ./tap-googleads.sh
    settings:
    - name: oauth_credentials.refresh_token
      kind: password
      required: false
      env_aliases: [OAUTH_REFRESH_TOKEN]
    - name: developer_token
      kind: password
    - name: customer_id
    - name: start_date
      kind: date_iso8601
      required: false
"#,
        )
        .unwrap()
    }

    fn extractor(manifest: &ProjectManifest) -> &PluginDecl {
        &manifest.plugins.extractors[0]
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_satisfied_plugin_is_complete() {
        let manifest = ads_manifest();
        let vars = env(&[
            ("TAP_GOOGLEADS_DEVELOPER_TOKEN", "dev-token"),
            ("TAP_GOOGLEADS_CUSTOMER_ID", "123-456-7890"),
        ]);

        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars);

        assert!(resolved.is_complete());
        let values: HashMap<_, _> = resolved.values().collect();
        assert_eq!(values["developer_token"], "dev-token");
        assert_eq!(values["customer_id"], "123-456-7890");
        assert!(!values.contains_key("start_date"));
    }

    #[test]
    fn test_missing_required_reported_with_tried_vars() {
        let manifest = ads_manifest();
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &env(&[]));

        assert!(!resolved.is_complete());
        let missing: Vec<_> = resolved
            .errors
            .iter()
            .filter(|e| e.category == SettingErrorCategory::Missing)
            .collect();
        assert_eq!(missing.len(), 2);
        assert!(missing
            .iter()
            .any(|e| e.setting == "developer_token"
                && e.message.contains("$TAP_GOOGLEADS_DEVELOPER_TOKEN")));
    }

    #[test]
    fn test_optional_settings_never_error() {
        let manifest = ads_manifest();
        let vars = env(&[
            ("TAP_GOOGLEADS_DEVELOPER_TOKEN", "t"),
            ("TAP_GOOGLEADS_CUSTOMER_ID", "c"),
        ]);
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars);

        let token = resolved
            .settings
            .iter()
            .find(|s| s.name == "oauth_credentials.refresh_token")
            .unwrap();
        assert_eq!(token.source, SettingSource::Unset);
        assert!(resolved.is_complete());
    }

    #[test]
    fn test_canonical_env_beats_alias() {
        let manifest = ads_manifest();
        let vars = env(&[
            ("TAP_GOOGLEADS_DEVELOPER_TOKEN", "t"),
            ("TAP_GOOGLEADS_CUSTOMER_ID", "c"),
            ("TAP_GOOGLEADS_OAUTH_CREDENTIALS_REFRESH_TOKEN", "canonical"),
            ("OAUTH_REFRESH_TOKEN", "aliased"),
        ]);
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars);

        let token = resolved
            .settings
            .iter()
            .find(|s| s.name == "oauth_credentials.refresh_token")
            .unwrap();
        assert_eq!(token.value.as_deref(), Some("canonical"));
        assert!(matches!(token.source, SettingSource::Env(_)));
    }

    #[test]
    fn test_alias_used_when_canonical_absent() {
        let manifest = ads_manifest();
        let vars = env(&[
            ("TAP_GOOGLEADS_DEVELOPER_TOKEN", "t"),
            ("TAP_GOOGLEADS_CUSTOMER_ID", "c"),
            ("OAUTH_REFRESH_TOKEN", "aliased"),
        ]);
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars);

        let token = resolved
            .settings
            .iter()
            .find(|s| s.name == "oauth_credentials.refresh_token")
            .unwrap();
        assert_eq!(token.value.as_deref(), Some("aliased"));
        assert_eq!(
            token.source,
            SettingSource::EnvAlias("OAUTH_REFRESH_TOKEN".into())
        );
    }

    #[test]
    fn test_config_and_default_tiers() {
        let manifest = parse_project_str(
            r#"
version: 1
plugins:
  extractors:
  - name: tap-demo
    executable: ./tap-demo
    config:
      customer_id: 123-456-7890
    settings:
    - name: customer_id
    - name: lookback_days
      kind: integer
      value: 7
"#,
        )
        .unwrap();

        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &env(&[]));

        assert!(resolved.is_complete());
        let by_name: HashMap<_, _> = resolved
            .settings
            .iter()
            .map(|s| (s.name.as_str(), s))
            .collect();
        assert_eq!(by_name["customer_id"].source, SettingSource::ConfigFile);
        assert_eq!(by_name["lookback_days"].value.as_deref(), Some("7"));
        assert_eq!(by_name["lookback_days"].source, SettingSource::Default);
    }

    #[test]
    fn test_env_beats_config_file() {
        let manifest = parse_project_str(
            r#"
version: 1
plugins:
  extractors:
  - name: tap-demo
    executable: ./tap-demo
    config:
      customer_id: from-config
    settings:
    - name: customer_id
"#,
        )
        .unwrap();

        let vars = env(&[("TAP_DEMO_CUSTOMER_ID", "from-env")]);
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars);

        assert_eq!(
            resolved.settings[0].value.as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_kind_check_failure_reported() {
        let manifest = ads_manifest();
        let vars = env(&[
            ("TAP_GOOGLEADS_DEVELOPER_TOKEN", "t"),
            ("TAP_GOOGLEADS_CUSTOMER_ID", "c"),
            ("TAP_GOOGLEADS_START_DATE", "soon"),
        ]);
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars);

        assert!(!resolved.is_complete());
        assert!(resolved.errors.iter().any(|e| {
            e.category == SettingErrorCategory::InvalidValue
                && e.setting == "start_date"
                && e.message.contains("ISO-8601")
        }));
    }

    #[test]
    fn test_check_value_kinds() {
        assert!(check_value(SettingKind::Integer, "42").is_ok());
        assert!(check_value(SettingKind::Integer, "-7").is_ok());
        assert!(check_value(SettingKind::Integer, "4.2").is_err());

        assert!(check_value(SettingKind::Boolean, "true").is_ok());
        assert!(check_value(SettingKind::Boolean, "FALSE").is_ok());
        assert!(check_value(SettingKind::Boolean, "0").is_ok());
        assert!(check_value(SettingKind::Boolean, "yes").is_err());

        assert!(check_value(SettingKind::DateIso8601, "2024-06-01").is_ok());
        assert!(check_value(SettingKind::DateIso8601, "2024-06-01T12:30:00").is_ok());
        assert!(check_value(SettingKind::DateIso8601, "2024-06-01T12:30:00Z").is_ok());
        assert!(check_value(SettingKind::DateIso8601, "June 1st").is_err());

        assert!(check_value(SettingKind::Email, "ops@example.com").is_ok());
        assert!(check_value(SettingKind::Email, "not-an-email").is_err());

        assert!(check_value(SettingKind::Password, "anything at all").is_ok());
    }

    #[test]
    fn test_secret_values_redacted_in_output() {
        let manifest = ads_manifest();
        let vars = env(&[
            ("TAP_GOOGLEADS_DEVELOPER_TOKEN", "super-secret"),
            ("TAP_GOOGLEADS_CUSTOMER_ID", "123"),
        ]);
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars);

        let token = resolved
            .settings
            .iter()
            .find(|s| s.name == "developer_token")
            .unwrap();
        assert_eq!(token.rendered_value(false), REDACTED);
        assert_eq!(token.rendered_value(true), "super-secret");

        let json = resolved.to_json(false).to_string();
        assert!(!json.contains("super-secret"));
        assert!(json.contains(REDACTED));

        let revealed = resolved.to_json(true).to_string();
        assert!(revealed.contains("super-secret"));
    }

    #[test]
    fn test_plain_values_not_redacted() {
        let manifest = ads_manifest();
        let vars = env(&[
            ("TAP_GOOGLEADS_DEVELOPER_TOKEN", "t"),
            ("TAP_GOOGLEADS_CUSTOMER_ID", "123-456-7890"),
        ]);
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars);

        let customer = resolved
            .settings
            .iter()
            .find(|s| s.name == "customer_id")
            .unwrap();
        assert_eq!(customer.rendered_value(false), "123-456-7890");
    }

    #[test]
    fn test_value_to_string_forms() {
        let scalar: serde_yaml::Value = serde_yaml::from_str("123-456").unwrap();
        assert_eq!(value_to_string(&scalar).as_deref(), Some("123-456"));

        let number: serde_yaml::Value = serde_yaml::from_str("30").unwrap();
        assert_eq!(value_to_string(&number).as_deref(), Some("30"));

        let flag: serde_yaml::Value = serde_yaml::from_str("true").unwrap();
        assert_eq!(value_to_string(&flag).as_deref(), Some("true"));

        let null: serde_yaml::Value = serde_yaml::from_str("~").unwrap();
        assert_eq!(value_to_string(&null), None);

        let mapping: serde_yaml::Value = serde_yaml::from_str("{queries: [a, b]}").unwrap();
        assert_eq!(
            value_to_string(&mapping).as_deref(),
            Some(r#"{"queries":["a","b"]}"#)
        );
    }

    #[test]
    fn test_validation_result_shape() {
        let manifest = ads_manifest();
        let resolved =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &env(&[]));
        let result = resolved.validation_result();

        assert!(!result.is_success());
        assert!(result.message.contains("developer_token"));
        assert!(result.message.contains("customer_id"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_env_entries_treated_as_unset() {
        use std::os::unix::ffi::OsStringExt;

        let manifest = parse_project_str(
            r#"
version: 1
plugins:
  extractors:
  - name: tap-rawdemo
    executable: ./tap-rawdemo
    settings:
    - name: api_token
      kind: password
    - name: region
      required: false
"#,
        )
        .unwrap();
        let plugin = &manifest.plugins.extractors[0];

        // A stray non-unicode value anywhere in the environment must not
        // abort resolution, and a non-unicode value for a declared variable
        // counts as unset.
        std::env::set_var(
            "DECANT_RESOLVE_TEST_BINARY",
            std::ffi::OsString::from_vec(vec![0x80, 0x81]),
        );
        std::env::set_var(
            "TAP_RAWDEMO_REGION",
            std::ffi::OsString::from_vec(vec![0xff, 0xfe]),
        );
        std::env::set_var("TAP_RAWDEMO_API_TOKEN", "tok");

        let resolved = resolve_plugin(PluginType::Extractor, plugin);

        std::env::remove_var("DECANT_RESOLVE_TEST_BINARY");
        std::env::remove_var("TAP_RAWDEMO_REGION");
        std::env::remove_var("TAP_RAWDEMO_API_TOKEN");

        assert!(resolved.is_complete());
        let by_name: HashMap<_, _> = resolved
            .settings
            .iter()
            .map(|s| (s.name.as_str(), s))
            .collect();
        assert_eq!(by_name["api_token"].value.as_deref(), Some("tok"));
        assert_eq!(by_name["region"].source, SettingSource::Unset);
    }

    #[test]
    fn test_require_complete() {
        let manifest = ads_manifest();
        let vars = env(&[
            ("TAP_GOOGLEADS_DEVELOPER_TOKEN", "t"),
            ("TAP_GOOGLEADS_CUSTOMER_ID", "c"),
        ]);
        resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &vars)
            .require_complete()
            .unwrap();

        let errors =
            resolve_plugin_with_env(PluginType::Extractor, extractor(&manifest), &env(&[]))
                .require_complete()
                .unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
