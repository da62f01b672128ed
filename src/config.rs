use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::parser::is_tag_name;

/// A scalar as it appears in a model file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Null(()),
    Bool(bool),
    Number(serde_json::Number),
    // Non-finite floats, which `serde_json::Number` cannot hold.
    Float(f64),
    String(String),
    Other(serde_json::Value),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),
    #[error("Value of {0:?} must be a string, number, boolean or null")]
    UnsupportedValue(String),
    #[error("Number for {0:?} cannot be represented exactly, quote it as a string")]
    InexactNumber(String),
    #[error("Invalid assignment {0:?}, expected NAME=VALUE")]
    InvalidAssignment(String),
}

/// A model loaded from a YAML or JSON mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFile {
    pub values: BTreeMap<String, String>,
}

impl ModelFile {
    /// Loads a model file, choosing the format from the extension.
    ///
    /// `.json` files are parsed as JSON, everything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading model from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let model = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        debug!("Loaded {} value(s) from {:?}", model.values.len(), path);
        Ok(model)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty YAML document is an empty model.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: BTreeMap<String, RawValue> = serde_yaml::from_str(content)?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, RawValue> = serde_json::from_str(content)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: BTreeMap<String, RawValue>) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            if !is_tag_name(&key) {
                return Err(ConfigError::InvalidTagName(key));
            }
            let text = match value {
                RawValue::Null(()) => String::new(),
                RawValue::Bool(b) => b.to_string(),
                RawValue::Number(n) => {
                    if !is_exact(&n) {
                        return Err(ConfigError::InexactNumber(key));
                    }
                    n.to_string()
                }
                RawValue::Float(f) => non_finite_text(f),
                RawValue::String(s) => s,
                RawValue::Other(other) => {
                    debug!("Rejecting value of {}: {}", key, other);
                    return Err(ConfigError::UnsupportedValue(key));
                }
            };
            values.insert(key, text);
        }
        Ok(Self { values })
    }

    /// Overlays `other` on top of this model; its values win.
    pub fn merge(&mut self, other: ModelFile) {
        self.values.extend(other.values);
    }

    /// Applies a `NAME=VALUE` override.
    pub fn set(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (name, value) = parse_assignment(assignment)?;
        debug!("Override {} from command line", name);
        self.values.insert(name, value);
        Ok(())
    }
}

/// Integers outside the 64-bit range are parsed as lossy floats.
fn is_exact(n: &serde_json::Number) -> bool {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.fract() != 0.0 || (f < u64::MAX as f64 && f >= i64::MIN as f64),
        _ => true,
    }
}

/// YAML spelling of a float that is not finite.
fn non_finite_text(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_sign_negative() {
        "-.inf".to_string()
    } else {
        ".inf".to_string()
    }
}

/// Splits `NAME=VALUE` at the first `=`.
pub fn parse_assignment(assignment: &str) -> Result<(String, String), ConfigError> {
    let Some((name, value)) = assignment.split_once('=') else {
        return Err(ConfigError::InvalidAssignment(assignment.to_string()));
    };
    let name = name.trim();
    if !is_tag_name(name) {
        return Err(ConfigError::InvalidAssignment(assignment.to_string()));
    }
    Ok((name.to_string(), value.to_string()))
}
