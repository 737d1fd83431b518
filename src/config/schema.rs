//! Configuration schema types for `emotecss.toml`
//!
//! Defines the structure and validation rules for extraction configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which ignored emotes to extract anyway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Emote identifiers (name plus suffix, e.g. `ajdance:hover`).
    /// A leading `/` is accepted, matching how emotes are linked.
    #[serde(default)]
    pub emotes: Vec<String>,
}

impl ExtractConfig {
    /// Identifiers normalised for lookup during extraction
    pub fn requested(&self) -> HashSet<String> {
        self.emotes.iter().map(|e| normalize_identifier(e)).collect()
    }
}

/// Catalog output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the JSON catalog
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: default_pretty() }
    }
}

fn default_pretty() -> bool {
    true
}

/// How diagnostics affect the exit status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Fail on warnings as well as errors
    #[serde(default)]
    pub strict: bool,
}

/// Root configuration structure for `emotecss.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmoteConfig {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "extract.emotes[2]")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "emotecss.toml: '{}' {}", self.field, self.message)
    }
}

impl EmoteConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        for (i, emote) in self.extract.emotes.iter().enumerate() {
            if normalize_identifier(emote).is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("extract.emotes[{}]", i),
                    message: "must name an emote".to_string(),
                });
            } else if emote.trim().contains(char::is_whitespace) {
                errors.push(ConfigValidationError {
                    field: format!("extract.emotes[{}]", i),
                    message: "must not contain whitespace".to_string(),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Strip surrounding whitespace and the leading `/` from an emote identifier.
pub fn normalize_identifier(identifier: &str) -> String {
    let trimmed = identifier.trim();
    trimmed.strip_prefix('/').unwrap_or(trimmed).to_string()
}
