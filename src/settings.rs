//! Category settings: which kinds of nodes a scan collects
//!
//! Settings can be loaded from TOML. Categories not listed keep their
//! default (enabled):
//!
//! ```toml
//! [categories]
//! table = false
//! live-region = false
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::scan::Category;

/// Errors that can occur when loading category settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown category '{name}'")]
    UnknownCategory { name: String },
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    categories: BTreeMap<String, bool>,
}

/// Enabled flag per category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySettings {
    enabled: BTreeMap<Category, bool>,
}

impl Default for CategorySettings {
    fn default() -> Self {
        Self {
            enabled: Category::ALL.into_iter().map(|c| (c, true)).collect(),
        }
    }
}

impl CategorySettings {
    /// Every category enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Every category disabled
    pub fn none() -> Self {
        Self {
            enabled: Category::ALL.into_iter().map(|c| (c, false)).collect(),
        }
    }

    /// Enable or disable one category
    pub fn with(mut self, category: Category, enabled: bool) -> Self {
        self.enabled.insert(category, enabled);
        self
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled.get(&category).copied().unwrap_or(false)
    }

    /// Enabled categories in category order
    pub fn enabled(&self) -> impl Iterator<Item = Category> + '_ {
        self.enabled
            .iter()
            .filter(|&(_, &on)| on)
            .map(|(&category, _)| category)
    }

    /// Load settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = toml::from_str(content)?;
        let mut settings = Self::default();
        for (name, enabled) in file.categories {
            let category = name
                .parse::<Category>()
                .map_err(|name| SettingsError::UnknownCategory { name })?;
            settings = settings.with(category, enabled);
        }
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
