//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `HB_*`
//! environment variables, and merging them with proper precedence rules:
//! built-in defaults < config files < environment.

use crate::error::HarmonicError;
use crate::types::{BatchConfig, MAX_WORKERS};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// workers = 20
/// search_page_size = 25
/// saved_search_page_size = 200
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Default values for `BatchConfig`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to `BatchConfig` fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// Worker pool size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Page size for keyword searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_page_size: Option<u32>,

    /// Page size for saved search results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_search_page_size: Option<u32>,
}

impl FileConfig {
    /// Overlay the values set in this file onto `config`.
    pub fn apply_to(&self, mut config: BatchConfig) -> BatchConfig {
        if let Some(defaults) = &self.defaults {
            if let Some(workers) = defaults.workers {
                config = config.with_workers(workers);
            }
            if let Some(page_size) = defaults.search_page_size {
                config = config.with_search_page_size(page_size);
            }
            if let Some(page_size) = defaults.saved_search_page_size {
                config = config.with_saved_search_page_size(page_size);
            }
        }
        config
    }
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Default)]
pub struct ConfigManager;

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if reading, parsing or
    /// validation fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, HarmonicError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HarmonicError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            HarmonicError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks in the XDG config directory, then the home directory, then the
    /// current directory. Later files override earlier ones field by field.
    /// Files that fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> FileConfig {
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        let mut merged_config = FileConfig::default();

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded configuration file");
                    merged_config = self.merge_configs(merged_config, config);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring configuration file");
                }
            }
        }

        merged_config
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./harmonic-batch.toml", "./.harmonic-batch.toml"];

        candidates
            .into_iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".harmonic-batch.toml", "harmonic-batch.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("harmonic-batch").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(lower_defaults), Some(higher_defaults)) => Some(DefaultsConfig {
                    workers: higher_defaults.workers.or(lower_defaults.workers),
                    search_page_size: higher_defaults
                        .search_page_size
                        .or(lower_defaults.search_page_size),
                    saved_search_page_size: higher_defaults
                        .saved_search_page_size
                        .or(lower_defaults.saved_search_page_size),
                }),
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), HarmonicError> {
        if let Some(defaults) = &config.defaults {
            if let Some(workers) = defaults.workers {
                if workers == 0 || workers > MAX_WORKERS {
                    return Err(HarmonicError::config(format!(
                        "workers must be between 1 and {}",
                        MAX_WORKERS
                    )));
                }
            }

            if defaults.search_page_size == Some(0) {
                return Err(HarmonicError::config(
                    "search_page_size must be greater than 0",
                ));
            }

            if defaults.saved_search_page_size == Some(0) {
                return Err(HarmonicError::config(
                    "saved_search_page_size must be greater than 0",
                ));
            }
        }

        Ok(())
    }
}

/// Configuration values read from `HB_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub workers: Option<usize>,
    pub search_page_size: Option<u32>,
    pub saved_search_page_size: Option<u32>,
    /// Explicit config file, bypassing discovery
    pub config: Option<String>,
}

impl EnvConfig {
    /// Overlay the values set in the environment onto `config`.
    pub fn apply_to(&self, mut config: BatchConfig) -> BatchConfig {
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(page_size) = self.search_page_size {
            config = config.with_search_page_size(page_size);
        }
        if let Some(page_size) = self.saved_search_page_size {
            config = config.with_saved_search_page_size(page_size);
        }
        config
    }
}

/// Load configuration from environment variables.
///
/// Recognised variables:
/// - `HB_WORKERS` - worker pool size (1-100)
/// - `HB_SEARCH_PAGE_SIZE` - default search page size
/// - `HB_SAVED_SEARCH_PAGE_SIZE` - default saved search page size
/// - `HB_CONFIG` - config file to load instead of discovering one
///
/// Invalid values are logged and ignored.
pub fn load_env_config() -> EnvConfig {
    load_config_from(|key| env::var(key).ok())
}

fn load_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(val) = lookup("HB_WORKERS") {
        match val.trim().parse::<usize>() {
            Ok(workers) if workers > 0 && workers <= MAX_WORKERS => {
                debug!(workers, "using HB_WORKERS");
                env_config.workers = Some(workers);
            }
            _ => warn!(value = %val, "invalid HB_WORKERS, must be 1-{}", MAX_WORKERS),
        }
    }

    if let Some(val) = lookup("HB_SEARCH_PAGE_SIZE") {
        match parse_page_size(&val) {
            Some(page_size) => env_config.search_page_size = Some(page_size),
            None => warn!(value = %val, "invalid HB_SEARCH_PAGE_SIZE, must be a positive integer"),
        }
    }

    if let Some(val) = lookup("HB_SAVED_SEARCH_PAGE_SIZE") {
        match parse_page_size(&val) {
            Some(page_size) => env_config.saved_search_page_size = Some(page_size),
            None => warn!(
                value = %val,
                "invalid HB_SAVED_SEARCH_PAGE_SIZE, must be a positive integer"
            ),
        }
    }

    if let Some(path) = lookup("HB_CONFIG") {
        if !path.trim().is_empty() {
            env_config.config = Some(path);
        }
    }

    env_config
}

fn parse_page_size(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|size| *size > 0)
}

/// Resolve the effective `BatchConfig` from defaults, files and environment.
///
/// When `HB_CONFIG` names a file, only that file is loaded and a failure to
/// load it is an error. Otherwise standard locations are searched.
pub fn resolve_config() -> Result<BatchConfig, HarmonicError> {
    let env_config = load_env_config();
    let manager = ConfigManager::new();

    let file_config = match &env_config.config {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load(),
    };

    let config = env_config.apply_to(file_config.apply_to(BatchConfig::default()));
    debug!(?config, "resolved batch configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[defaults]
workers = 25
search_page_size = 20
"#,
        );

        let config = ConfigManager::new().load_file(temp_file.path()).unwrap();
        let defaults = config.defaults.unwrap();
        assert_eq!(defaults.workers, Some(25));
        assert_eq!(defaults.search_page_size, Some(20));
        assert_eq!(defaults.saved_search_page_size, None);
    }

    #[test]
    fn test_invalid_workers() {
        let temp_file = write_config(
            r#"
[defaults]
workers = 0
"#,
        );

        let result = ConfigManager::new().load_file(temp_file.path());
        assert!(matches!(result, Err(HarmonicError::Config { .. })));

        let temp_file = write_config(
            r#"
[defaults]
workers = 101
"#,
        );
        assert!(ConfigManager::new().load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let temp_file = write_config(
            r#"
[defaults]
saved_search_page_size = 0
"#,
        );
        assert!(ConfigManager::new().load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let temp_file = write_config("[defaults\nworkers = ");
        let result = ConfigManager::new().load_file(temp_file.path());
        assert!(matches!(result, Err(HarmonicError::Config { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigManager::new().load_file("/definitely/not/here/harmonic-batch.toml");
        assert!(matches!(result, Err(HarmonicError::File { .. })));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new();

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                workers: Some(10),
                search_page_size: Some(30),
                ..Default::default()
            }),
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                workers: Some(40),
                saved_search_page_size: Some(250),
                ..Default::default()
            }),
        };

        let defaults = manager.merge_configs(lower, higher).defaults.unwrap();
        assert_eq!(defaults.workers, Some(40)); // Higher wins
        assert_eq!(defaults.search_page_size, Some(30)); // Lower preserved
        assert_eq!(defaults.saved_search_page_size, Some(250));
    }

    #[test]
    fn test_merge_with_missing_side() {
        let manager = ConfigManager::new();
        let only_lower = FileConfig {
            defaults: Some(DefaultsConfig {
                workers: Some(7),
                ..Default::default()
            }),
        };

        let merged = manager.merge_configs(only_lower.clone(), FileConfig::default());
        assert_eq!(merged, only_lower);
    }

    #[test]
    fn test_file_config_apply_to() {
        let file = FileConfig {
            defaults: Some(DefaultsConfig {
                workers: Some(3),
                ..Default::default()
            }),
        };
        let config = file.apply_to(BatchConfig::default());
        assert_eq!(config.workers, 3);
        assert_eq!(config.search_page_size, 50);
    }

    #[test]
    fn test_env_config_parsing() {
        let vars: HashMap<&str, &str> = [
            ("HB_WORKERS", "32"),
            ("HB_SEARCH_PAGE_SIZE", "15"),
            ("HB_SAVED_SEARCH_PAGE_SIZE", "not-a-number"),
            ("HB_CONFIG", "/etc/harmonic-batch.toml"),
        ]
        .into_iter()
        .collect();

        let env_config = load_config_from(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(env_config.workers, Some(32));
        assert_eq!(env_config.search_page_size, Some(15));
        assert_eq!(env_config.saved_search_page_size, None);
        assert_eq!(env_config.config.as_deref(), Some("/etc/harmonic-batch.toml"));
    }

    #[test]
    fn test_env_workers_out_of_range_ignored() {
        let env_config = load_config_from(|key| match key {
            "HB_WORKERS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(env_config.workers, None);

        let env_config = load_config_from(|key| match key {
            "HB_WORKERS" => Some("500".to_string()),
            _ => None,
        });
        assert_eq!(env_config.workers, None);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FileConfig {
            defaults: Some(DefaultsConfig {
                workers: Some(20),
                search_page_size: Some(40),
                ..Default::default()
            }),
        };
        let env_config = EnvConfig {
            workers: Some(5),
            ..Default::default()
        };

        let config = env_config.apply_to(file.apply_to(BatchConfig::default()));
        assert_eq!(config.workers, 5);
        assert_eq!(config.search_page_size, 40);
        assert_eq!(config.saved_search_page_size, 100);
    }
}
