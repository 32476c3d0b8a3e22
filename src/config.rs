//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treestore/treestore.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `TREESTORE_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::cli::error::{CliError, CliResult};

/// How query results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON rows
    Json,
    /// Indented tree
    Tree,
    /// One line per row: path and fields
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Tree => "tree",
            OutputFormat::Table => "table",
        };
        write!(f, "{}", name)
    }
}

/// Unified configuration for treestore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Reject duplicate ids, dangling parents and cycles instead of tolerating them
    pub strict: bool,
    /// Output format for query results
    pub format: OutputFormat,
    /// Separator used when printing a path on one line
    pub path_separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict: false,
            format: OutputFormat::Json,
            path_separator: " / ".into(),
        }
    }
}

/// Get the XDG config directory for treestore.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treestore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treestore.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; must exist
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        Self::load_from(global_config_path().as_deref(), explicit)
    }

    /// Same as [`Settings::load`] with the global config location supplied.
    pub fn load_from(global: Option<&Path>, explicit: Option<&Path>) -> CliResult<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("strict", defaults.strict)
            .map_err(config_err)?
            .set_default("format", defaults.format.to_string())
            .map_err(config_err)?
            .set_default("path_separator", defaults.path_separator)
            .map_err(config_err)?;

        if let Some(global_path) = global {
            builder = builder.add_source(
                File::from(global_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(Environment::with_prefix("TREESTORE").try_parsing(true));

        builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_err)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treestore configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treestore/treestore.toml
#   File:   --config <path>
#   Env:    TREESTORE_* environment variables (e.g. TREESTORE_STRICT=true)

# Reject duplicate ids, dangling parents and cyclic ancestry
# strict = false

# Output format: "json", "tree" or "table"
# format = "json"

# Separator for single-line paths
# path_separator = " / "
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> CliError {
    CliError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_files_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_template_when_parsed_then_equals_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_toml() {
        let settings = Settings {
            strict: true,
            format: OutputFormat::Table,
            path_separator: "/".into(),
        };
        let text = settings.to_toml().unwrap();
        assert!(text.contains("format = \"table\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
