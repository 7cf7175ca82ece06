//! Configuration types and parsing for till.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file names probed in a project directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["till.yml", "till.yaml"];

/// Special DuckDB path for an in-memory database.
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Environment variable consulted when no `--target` flag is given.
pub const TARGET_ENV_VAR: &str = "TILL_TARGET";

/// Main project configuration from till.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Migration discovery and bookkeeping settings
    #[serde(default)]
    pub migrations: MigrationsConfig,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based, relative to the project root, or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Resolve `path` against the project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    pub fn resolved_path(&self, root: &Path) -> String {
        if self.path == MEMORY_DB_PATH || Path::new(&self.path).is_absolute() {
            return self.path.clone();
        }
        root.join(&self.path).display().to_string()
    }
}

/// Settings for migration discovery, splitting, and the ledger table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MigrationsConfig {
    /// Directory holding migration files, relative to the project root
    #[serde(default = "default_migrations_path")]
    pub path: String,

    /// File extension recognized as a migration (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Line token that separates batches inside one file
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Table recording applied migrations, optionally `schema.table`
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            path: default_migrations_path(),
            extension: default_extension(),
            separator: default_separator(),
            ledger_table: default_ledger_table(),
        }
    }
}

impl MigrationsConfig {
    /// Validate the migration settings
    pub fn validate(&self) -> CoreResult<()> {
        if self.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations.path cannot be empty".to_string(),
            });
        }
        for (field, value) in [
            ("migrations.extension", &self.extension),
            ("migrations.separator", &self.separator),
        ] {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{field} must be non-empty and contain no whitespace"),
                });
            }
        }
        if self.extension.starts_with('.') {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "migrations.extension '{}' must not start with '.'",
                    self.extension
                ),
            });
        }
        if !is_valid_relation_name(&self.ledger_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "migrations.ledger_table '{}' must be an identifier or schema.identifier",
                    self.ledger_table
                ),
            });
        }
        Ok(())
    }
}

/// Check that `name` is `ident` or `schema.ident` with plain SQL identifiers.
pub fn is_valid_relation_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 {
        return false;
    }
    parts.iter().all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_db_path() -> String {
    MEMORY_DB_PATH.to_string()
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

fn default_extension() -> String {
    "sql".to_string()
}

fn default_separator() -> String {
    "GO".to_string()
}

fn default_ledger_table() -> String {
    "till_migrations".to_string()
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
                path: path.display().to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for till.yml or till.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                log::debug!("Loading config from {}", path.display());
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        self.migrations.validate()
    }

    /// Absolute migrations directory for a project rooted at `root`
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations.path)
    }

    /// Get available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get database configuration, optionally applying target overrides
    ///
    /// If target is specified and exists, uses target's database config.
    /// Otherwise, uses the base database config.
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::TargetNotFound {
                            name: name.to_string(),
                            available: self.available_targets().join(", "),
                        })?;

                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Resolve target from CLI flag or TILL_TARGET environment variable
    ///
    /// Priority: CLI flag > TILL_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
