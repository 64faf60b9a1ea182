//! Read-only run configuration.
//!
//! Endpoint, user agent and namespace prefixes are carried in a
//! [`CheckerConfig`] value that every pipeline stage borrows. It can be
//! loaded from TOML; every field has a default matching the public
//! Wikidata Query Service.

use std::path::Path;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

/// Errors from configuration and input validation.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(covibot::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path}: {message}")]
    #[diagnostic(
        code(covibot::config::parse),
        help("Check the TOML syntax. Unknown keys are rejected.")
    )]
    Parse { path: String, message: String },

    #[error("invalid property identifier: \"{value}\"")]
    #[diagnostic(
        code(covibot::config::invalid_property),
        help("Property identifiers look like `P227`: an upper-case P followed by digits.")
    )]
    InvalidProperty { value: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings shared by every property check in a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckerConfig {
    /// SPARQL endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Identifying `User-Agent` header sent with every query.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// IRI prefix of entities (items and properties).
    #[serde(default = "default_entity_namespace")]
    pub entity_namespace: String,
    /// IRI prefix of statement nodes.
    #[serde(default = "default_statement_namespace")]
    pub statement_namespace: String,
    /// IRI prefix of qualifier predicates.
    #[serde(default = "default_qualifier_namespace")]
    pub qualifier_namespace: String,
    /// Leading marker of subject identifiers that are kept in reports.
    #[serde(default = "default_entity_marker")]
    pub entity_marker: String,
}

fn default_endpoint() -> String {
    "https://query.wikidata.org/bigdata/namespace/wdq/sparql".into()
}
fn default_user_agent() -> String {
    concat!(
        "covibot/",
        env!("CARGO_PKG_VERSION"),
        " (Wikidata constraint report bot)"
    )
    .into()
}
fn default_entity_namespace() -> String {
    "http://www.wikidata.org/entity/".into()
}
fn default_statement_namespace() -> String {
    "http://www.wikidata.org/entity/statement/".into()
}
fn default_qualifier_namespace() -> String {
    "http://www.wikidata.org/prop/qualifier/".into()
}
fn default_entity_marker() -> String {
    "Q".into()
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            entity_namespace: default_entity_namespace(),
            statement_namespace: default_statement_namespace(),
            qualifier_namespace: default_qualifier_namespace(),
            entity_marker: default_entity_marker(),
        }
    }
}

impl CheckerConfig {
    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Return a copy pointing at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = CheckerConfig::from_toml("").unwrap();
        assert_eq!(config, CheckerConfig::default());
        assert!(config.user_agent.starts_with("covibot/"));
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = CheckerConfig::from_toml(
            r#"
endpoint = "http://localhost:9999/sparql"
entity_marker = "L"
"#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:9999/sparql");
        assert_eq!(config.entity_marker, "L");
        assert_eq!(config.entity_namespace, default_entity_namespace());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = CheckerConfig::from_toml("endpont = \"typo\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reports_path_on_parse_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("covibot.toml");
        std::fs::write(&path, "endpoint = [").unwrap();
        match CheckerConfig::load(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert!(p.ends_with("covibot.toml")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = CheckerConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn with_endpoint_replaces_endpoint() {
        let config = CheckerConfig::default().with_endpoint("http://fake/sparql");
        assert_eq!(config.endpoint, "http://fake/sparql");
    }
}
