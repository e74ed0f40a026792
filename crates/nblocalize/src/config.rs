//! Configuration loading for nblocalize.
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (--owner, --repo, --notebook-name)
//! 2. Project config (<root>/.nblocalize.toml)
//! 3. User config (~/.nblocalize.toml)
//! 4. Built-in defaults

use anyhow::{Context, Result};
use nblocalize_core::{BadgeConfig, DEFAULT_OWNER, DEFAULT_REPO};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the project root and the home directory
pub const CONFIG_FILE_NAME: &str = ".nblocalize.toml";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub badges: Option<BadgeSection>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BadgeSection {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub notebook: Option<String>,
}

/// Badge values given on the command line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BadgeOverrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub notebook: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self =
            toml::from_str(&contents).context("Failed to parse config file as TOML")?;
        Ok(config)
    }

    /// Load a config file if it exists
    ///
    /// A file that cannot be read or parsed is reported and skipped.
    fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match Self::load_from_file(path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                Some(config)
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to load config from {}: {:#}. Ignoring it.",
                    path.display(),
                    err
                );
                None
            }
        }
    }

    /// Find, load and merge the user and project configs
    pub fn discover(root: &Path) -> Self {
        let user = user_config_path().and_then(|path| Self::load_optional(&path));
        let project = Self::load_optional(&root.join(CONFIG_FILE_NAME));
        Self::merge(user, project)
    }

    /// Merge configs field by field, project values over user values
    pub fn merge(user: Option<Self>, project: Option<Self>) -> Self {
        let mut merged = BadgeSection::default();

        for config in [user, project].into_iter().flatten() {
            let Some(badges) = config.badges else {
                continue;
            };
            if badges.owner.is_some() {
                merged.owner = badges.owner;
            }
            if badges.repo.is_some() {
                merged.repo = badges.repo;
            }
            if badges.notebook.is_some() {
                merged.notebook = badges.notebook;
            }
        }

        Self {
            badges: Some(merged),
        }
    }

    /// Resolve badge settings, applying command-line overrides last
    ///
    /// The notebook name follows the repository name unless set explicitly.
    pub fn badge_config(&self, overrides: &BadgeOverrides) -> BadgeConfig {
        let section = self.badges.clone().unwrap_or_default();

        let owner = overrides
            .owner
            .clone()
            .or(section.owner)
            .unwrap_or_else(|| DEFAULT_OWNER.to_string());
        let repo = overrides
            .repo
            .clone()
            .or(section.repo)
            .unwrap_or_else(|| DEFAULT_REPO.to_string());
        let notebook = overrides
            .notebook
            .clone()
            .or(section.notebook)
            .unwrap_or_else(|| format!("{repo}.ipynb"));

        BadgeConfig {
            owner,
            repo,
            notebook,
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}
