//! YAML configuration.
//!
//! ```yaml
//! logger:
//!   enable: true
//!   level: debug
//!   format: compact
//! ontology:
//!   namespace: http://ex.org/
//!   path: ontology.owl
//! gazetteer:
//!   username: demo
//!   country: IN
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{logger, Error, Result};

/// Environment variable overriding [`GazetteerSettings::username`].
pub const USERNAME_ENV: &str = "GEONAMES_USERNAME";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logger: Logger,
    pub ontology: OntologySettings,
    #[serde(default)]
    pub gazetteer: GazetteerSettings,
}

/// Logger configuration
///
/// Example (development):
/// ```yaml
/// logger:
///   enable: true
///   level: debug
///   format: compact
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logger {
    /// Enable log write to stdout
    #[serde(default = "default_true")]
    pub enable: bool,

    /// Set the logger level.
    ///
    /// * options: `trace` | `debug` | `info` | `warn` | `error`
    #[serde(default)]
    pub level: logger::LogLevel,

    /// Set the logger format.
    ///
    /// * options: `compact` | `pretty` | `json`
    #[serde(default)]
    pub format: logger::Format,

    /// Full `tracing` filter directive replacing the level, e.g.
    /// `ontoedit=trace,reqwest=warn`.
    pub override_filter: Option<String>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            enable: true,
            level: logger::LogLevel::default(),
            format: logger::Format::default(),
            override_filter: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OntologySettings {
    /// Prefix every minted identifier starts with.
    pub namespace: String,
    /// Default ontology document used by the CLI.
    #[serde(default = "default_document")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GazetteerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    /// ISO country code searches are scoped to.
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Directory receiving the `name | IRI` listings.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for GazetteerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: String::new(),
            country: default_country(),
            timeout_secs: default_timeout(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Reads and validates a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::Config(format!("cannot read `{}`: {err}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses YAML, then applies environment overrides.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            serde_yaml::from_str(content).map_err(|err| Error::Config(err.to_string()))?;
        if let Ok(username) = std::env::var(USERNAME_ENV) {
            if !username.trim().is_empty() {
                config.gazetteer.username = username;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Configuration for a namespace with every other section defaulted.
    #[must_use]
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            logger: Logger::default(),
            ontology: OntologySettings {
                namespace: namespace.into(),
                path: default_document(),
            },
            gazetteer: GazetteerSettings::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.ontology.namespace.trim().is_empty() {
            return Err(Error::Config(
                "`ontology.namespace` must be provided".to_string(),
            ));
        }
        if self.gazetteer.timeout_secs == 0 {
            return Err(Error::Config(
                "`gazetteer.timeout_secs` must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_document() -> PathBuf {
    PathBuf::from("ontology.owl")
}

fn default_base_url() -> String {
    "http://api.geonames.org".to_string()
}

fn default_country() -> String {
    "IN".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("GeoNames_data")
}
