// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generator settings, loaded from an optional JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bootstrap::DEFAULT_MAX_WINDOW_EXTENT;

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading the config file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A value that cannot be placed in the generated source.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with its value.
        reason: String,
    },
}

/// Settings that vary between retracer builds without touching the quirks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Fully qualified name of the emitted dispatch table.
    pub table_name: String,
    /// Window class registered by the emitted `createWindow`.
    pub window_class: String,
    /// Maximum window width and height the emitted window procedure allows.
    /// Lands in `LONG` fields, so it must be positive and fit an `i32`.
    pub max_window_extent: i32,
    /// Headers included after the ones the API description asks for.
    pub extra_headers: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            table_name: "d3dretrace::d3d9_callbacks".to_owned(),
            window_class: "d3dretrace".to_owned(),
            max_window_extent: DEFAULT_MAX_WINDOW_EXTENT,
            extra_headers: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from JSON. Missing fields take their defaults; an empty
    /// document is the default config.
    pub fn from_json(json: &[u8]) -> Result<Self, ConfigError> {
        if json.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_slice(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    /// Check that every value can be emitted verbatim into C++.
    ///
    /// `table_name` must be a `::`-qualified identifier; `window_class` and
    /// headers end up inside string literals and must not need escaping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_qualified_ident(&self.table_name) {
            return Err(invalid(
                "table_name",
                format!("{:?} is not a C++ qualified identifier", self.table_name),
            ));
        }
        check_literal("window_class", &self.window_class)?;
        for header in &self.extra_headers {
            check_literal("extra_headers", header)?;
        }
        if self.max_window_extent <= 0 {
            return Err(invalid(
                "max_window_extent",
                format!("{} is not a positive extent", self.max_window_extent),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_qualified_ident(s: &str) -> bool {
    s.strip_prefix("::").unwrap_or(s).split("::").all(is_ident)
}

fn check_literal(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(invalid(field, "empty value".to_owned()));
    }
    if let Some(c) = value
        .chars()
        .find(|&c| c == '"' || c == '\\' || c.is_control())
    {
        return Err(invalid(field, format!("{value:?} contains {c:?}")));
    }
    Ok(())
}
