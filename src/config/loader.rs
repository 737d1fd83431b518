//! Configuration loading and discovery for `emotecss.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::EmoteConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for when no config path is given
pub const CONFIG_FILE_NAME: &str = "emotecss.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse emotecss.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Additional emotes to extract from ignore regions
    pub extract: Vec<String>,
    /// Override pretty printing
    pub pretty: Option<bool>,
    /// Override strict mode
    pub strict: Option<bool>,
}

/// Find emotecss.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_config_from(cwd)
}

/// Find emotecss.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file (which must exist). Otherwise
/// `find_config()` is used, falling back to the default configuration when
/// nothing is found.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("skin/emotecss.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<EmoteConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(EmoteConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<EmoteConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: EmoteConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// Extract identifiers from the command line are added to the configured
/// ones; flags replace the configured values.
pub fn merge_cli_overrides(config: &mut EmoteConfig, overrides: &CliOverrides) {
    config.extract.emotes.extend(overrides.extract.iter().cloned());

    if let Some(pretty) = overrides.pretty {
        config.output.pretty = pretty;
    }

    if let Some(strict) = overrides.strict {
        config.diagnostics.strict = strict;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &[u8]) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents)
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"");

        let subdir = temp.path().join("skins").join("main");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            br#"
[extract]
emotes = ["/ajdance:hover"]

[diagnostics]
strict = true
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.extract.emotes, vec!["/ajdance:hover"]);
        assert!(config.diagnostics.strict);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[extract]\nemotes = [\"\"]\n");

        let result = load_config(Some(&config_path));
        match result {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("extract.emotes[0]"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = EmoteConfig::default();
        config.extract.emotes.push("a".to_string());

        let overrides = CliOverrides {
            extract: vec!["/b:hover".to_string()],
            pretty: Some(false),
            strict: None,
        };
        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.extract.emotes, vec!["a", "/b:hover"]);
        assert!(!config.output.pretty);
        assert!(!config.diagnostics.strict);
        assert!(config.extract.requested().contains("b:hover"));
    }
}
