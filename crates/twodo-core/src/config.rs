//! Application configuration module
//!
//! Provides configuration management with TOML file support,
//! environment variable integration, and sensible defaults.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use crate::error::TwodoError;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub offset: OffsetConfig,
    #[serde(default)]
    pub todoist: TodoistConfig,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub colors: bool,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

/// Reminder offset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetConfig {
    /// Time of day (`HH:MM`) for due dates given without a time
    #[serde(default = "default_anchor_time")]
    pub anchor_time: String,
    #[serde(default)]
    pub default_minutes: Option<i64>,
}

/// Remote task store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoistConfig {
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default)]
    pub default_project: Option<String>,
    /// Projects shown when a listing names no project
    #[serde(default)]
    pub show_projects: Vec<String>,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_anchor_time() -> String {
    "09:00".to_string()
}

fn default_token_env() -> String {
    "TODOIST_API_TOKEN".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: default_true(),
            output_format: default_output_format(),
            date_format: default_date_format(),
        }
    }
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            anchor_time: default_anchor_time(),
            default_minutes: None,
        }
    }
}

impl Default for TodoistConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            default_project: None,
            show_projects: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the configuration directory path (~/.config/twodo/)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("twodo");
        Ok(config_dir)
    }

    /// Returns the configuration file path (~/.config/twodo/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or return default if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `config_path`, creating the directory if needed.
    ///
    /// On Unix systems the file is created with mode 0600 since it names the
    /// environment variable holding the API token.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent()
            && !config_dir.as_os_str().is_empty()
            && !config_dir.exists()
        {
            fs::create_dir_all(config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;

            #[cfg(unix)]
            {
                let dir_perms = std::fs::Permissions::from_mode(0o700);
                fs::set_permissions(config_dir, dir_perms)
                    .with_context(|| format!("Failed to set permissions on config directory: {}", config_dir.display()))?;
            }
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        fs::write(config_path, &content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        #[cfg(unix)]
        {
            let file_perms = std::fs::Permissions::from_mode(0o600);
            fs::set_permissions(config_path, file_perms)
                .with_context(|| format!("Failed to set permissions on config file: {}", config_path.display()))?;
        }

        Ok(())
    }

    /// Get the API token from the environment variable
    pub fn token(&self) -> Result<String> {
        env::var(&self.todoist.token_env)
            .with_context(|| format!("Environment variable {} not set", self.todoist.token_env))
    }

    /// Anchor time for date-only due expressions.
    pub fn anchor_time(&self) -> crate::Result<NaiveTime> {
        NaiveTime::parse_from_str(self.offset.anchor_time.trim(), "%H:%M").map_err(|e| {
            TwodoError::Config(format!(
                "Invalid offset.anchor_time '{}': expected HH:MM ({})",
                self.offset.anchor_time, e
            ))
        })
    }

    /// Add a project to the show list. Returns false if it was already there.
    pub fn add_show_project(&mut self, project: &str) -> bool {
        if self.todoist.show_projects.iter().any(|p| p == project) {
            return false;
        }
        self.todoist.show_projects.push(project.to_string());
        true
    }

    /// Remove a project from the show list. Returns false if it was not there.
    pub fn remove_show_project(&mut self, project: &str) -> bool {
        let before = self.todoist.show_projects.len();
        self.todoist.show_projects.retain(|p| p != project);
        self.todoist.show_projects.len() != before
    }

    pub fn clear_show_projects(&mut self) {
        self.todoist.show_projects.clear();
    }
}
