//! Configuration types and parsing for dryflow.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration from dryflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the compiled manifest, relative to the project directory
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    /// Where the dry run report is written, relative to the project directory
    #[serde(default = "default_report_path")]
    pub report_path: String,

    /// Dry-run engine connection
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Dry-run engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQL executed once before the run, e.g. to attach catalogs or
    /// create the live tables of incremental models
    #[serde(default)]
    pub setup_sql: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            setup_sql: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            report_path: default_report_path(),
            database: DatabaseConfig::default(),
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_manifest_path() -> String {
    "target/manifest.json".to_string()
}

fn default_report_path() -> String {
    "target/dry_run_output.json".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for dryflow.yml or dryflow.yaml and falls back to the
    /// defaults when neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("dryflow.yml");
        let yaml_path = dir.join("dryflow.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            log::debug!("No dryflow.yml in {}, using defaults", dir.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.manifest_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "manifest_path cannot be empty".to_string(),
            });
        }
        if self.report_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "report_path cannot be empty".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty (use :memory: for in-memory)"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Manifest path resolved against the project directory
    pub fn manifest_path_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.manifest_path)
    }

    /// Report path resolved against the project directory
    pub fn report_path_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.report_path)
    }

    /// Database path resolved against the project directory, preferring
    /// `override_path`. `:memory:` is returned as is.
    pub fn database_path_in(&self, project_dir: &Path, override_path: Option<&str>) -> String {
        let path = override_path.unwrap_or(&self.database.path);
        if path == DEFAULT_DB_PATH {
            path.to_string()
        } else {
            project_dir.join(path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
