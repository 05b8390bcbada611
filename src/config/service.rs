//! Service configuration schema.
//!
//! A service's `configuration.yml` is kept as an open value tree so that
//! arbitrary keys pass through the merge untouched. The handful of fields the
//! pipeline depends on are pulled out and checked once, here.

use crate::error::{ConfigError, Result};
use serde_yaml::Value;

/// File name that marks a service configuration on disk.
pub const CONFIG_FILE_NAME: &str = "configuration.yml";

/// Fields every service configuration must define.
pub const REQUIRED_FIELDS: &[&str] = &["service.name", "deployment.image"];

/// A validated service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Service name (`service.name`).
    pub name: String,
    /// Container image (`deployment.image`).
    pub image: String,
    /// Chart version (`version`), if set.
    pub version: Option<String>,
    /// Application version (`appVersion`), if set.
    pub app_version: Option<String>,
    /// The full configuration tree, including passthrough keys.
    values: Value,
}

impl ServiceConfig {
    /// Validates a loaded configuration tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming every required field
    /// that is absent, not only the first.
    pub fn from_values(values: Value) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| required_str(&values, field).is_none())
            .map(|field| (*field).to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::ValidationError { missing }.into());
        }

        let name = required_str(&values, "service.name").unwrap_or_default().to_string();
        validate_name(&name)?;
        let image = required_str(&values, "deployment.image")
            .unwrap_or_default()
            .to_string();
        let version = lookup_scalar(&values, "version");
        let app_version = lookup_scalar(&values, "appVersion");

        Ok(Self {
            name,
            image,
            version,
            app_version,
            values,
        })
    }

    /// Returns the full configuration tree.
    #[must_use]
    pub const fn values(&self) -> &Value {
        &self.values
    }
}

/// Returns the non-empty `service.name` of a raw tree, if any.
///
/// Discovery uses this to decide whether a file is a service at all before
/// full validation runs.
#[must_use]
pub fn service_name(values: &Value) -> Option<&str> {
    required_str(values, "service.name")
}

/// Follows a dotted path through nested mappings.
#[must_use]
pub fn lookup<'a>(values: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(values, |node, segment| node.get(segment))
}

/// Follows a dotted path and returns the string found there.
#[must_use]
pub fn lookup_str<'a>(values: &'a Value, path: &str) -> Option<&'a str> {
    lookup(values, path).and_then(Value::as_str)
}

/// Follows a dotted path and renders the string or number found there.
///
/// Versions are often written unquoted (`version: 2`), which YAML reads as a
/// number.
#[must_use]
pub fn lookup_scalar(values: &Value, path: &str) -> Option<String> {
    match lookup(values, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Checks that `name` is usable as a single directory name.
///
/// Follows the Helm chart name rule: ASCII letters, digits, `.`, `_` and `-`.
/// `.` and `..` are rejected outright.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidName`] for any other name.
pub fn validate_name(name: &str) -> Result<()> {
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if name.is_empty() || !allowed || name == "." || name == ".." {
        return Err(ConfigError::InvalidName {
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Required fields must be strings; names must also be non-empty.
fn required_str<'a>(values: &'a Value, path: &str) -> Option<&'a str> {
    lookup_str(values, path).filter(|s| path != "service.name" || !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::error::ChartforgeError;

    fn parse(yaml: &str) -> Value {
        ConfigLoader::new().parse_str(yaml, None).expect("valid yaml")
    }

    fn missing_fields(yaml: &str) -> Vec<String> {
        match ServiceConfig::from_values(parse(yaml)) {
            Err(ChartforgeError::Config(ConfigError::ValidationError { missing })) => missing,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_configuration() {
        let config = ServiceConfig::from_values(parse(
            r#"
service:
  name: orders
  port: 8080
deployment:
  image: ghcr.io/acme/orders:1.2.0
version: "0.3.0"
appVersion: "1.2.0"
"#,
        ))
        .expect("valid config");

        assert_eq!(config.name, "orders");
        assert_eq!(config.image, "ghcr.io/acme/orders:1.2.0");
        assert_eq!(config.version.as_deref(), Some("0.3.0"));
        assert_eq!(config.app_version.as_deref(), Some("1.2.0"));
        assert_eq!(config.values()["service"]["port"].as_u64(), Some(8080));
    }

    #[test]
    fn test_missing_image_is_reported() {
        let missing = missing_fields("service:\n  name: orders\n");
        assert_eq!(missing, vec![String::from("deployment.image")]);
    }

    #[test]
    fn test_all_missing_fields_are_reported() {
        let missing = missing_fields("replicas: 2\n");
        assert_eq!(
            missing,
            vec![String::from("service.name"), String::from("deployment.image")]
        );
    }

    #[test]
    fn test_empty_name_counts_as_missing() {
        let missing = missing_fields("service:\n  name: \"\"\ndeployment:\n  image: nginx\n");
        assert_eq!(missing, vec![String::from("service.name")]);
    }

    #[test]
    fn test_numeric_versions_are_rendered() {
        let config = ServiceConfig::from_values(parse(
            "service:\n  name: orders\ndeployment:\n  image: nginx\nversion: 2\nappVersion: 1.5\n",
        ))
        .expect("valid config");

        assert_eq!(config.version.as_deref(), Some("2"));
        assert_eq!(config.app_version.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_path_like_names_are_rejected() {
        for name in ["..", ".", "a/b", "../../precious", "a\\b"] {
            let yaml = format!("service:\n  name: '{name}'\ndeployment:\n  image: nginx\n");
            match ServiceConfig::from_values(parse(&yaml)) {
                Err(ChartforgeError::Config(ConfigError::InvalidName { name: rejected })) => {
                    assert_eq!(rejected, name);
                }
                other => panic!("expected {name:?} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_chart_style_names_are_accepted() {
        for name in ["orders", "orders-api", "orders_v2", "orders.internal"] {
            assert!(validate_name(name).is_ok(), "{name} should be accepted");
        }
        assert!(validate_name("").is_err());
        assert!(validate_name("orders api").is_err());
    }

    #[test]
    fn test_lookup_dotted_path() {
        let values = parse("ingress:\n  tls:\n    secret: orders-tls\n");

        assert_eq!(lookup_str(&values, "ingress.tls.secret"), Some("orders-tls"));
        assert!(lookup(&values, "ingress.hosts").is_none());
        assert!(service_name(&values).is_none());
    }
}
