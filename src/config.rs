use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::aggregator::{Limits, DEFAULT_PAGE_SIZE};
use crate::error::{NudgeError, Result};
use crate::sort::SortMode;

/// Table columns that can be hidden from the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Type,
    Repository,
    Title,
    Reason,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub page_size: usize,
    pub max_total: usize,
    pub max_age_days: u32,
    pub sort: SortMode,
    /// One line per row; `false` adds a spacer line under each row
    pub compact: bool,
    /// Start with sections scoped to the working directory's repository
    pub smart_filtering: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_total: 0,
            max_age_days: 0,
            sort: SortMode::default(),
            compact: true,
            smart_filtering: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub hidden_columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionConfig {
    pub title: String,
    #[serde(default)]
    pub filters: String,
    pub page_size: Option<usize>,
}

impl SectionConfig {
    fn new(title: &str, filters: &str) -> Self {
        Self {
            title: title.to_string(),
            filters: filters.to_string(),
            page_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            layout: LayoutConfig::default(),
            sections: default_sections(),
        }
    }
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("All", ""),
        SectionConfig::new("Unread", "is:unread"),
    ]
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub filter: Option<String>,
    pub page_size: Option<usize>,
    pub max_total: Option<usize>,
    pub max_age_days: Option<u32>,
    pub sort: Option<SortMode>,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("nudge").join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location. A missing or broken file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        };

        match Config::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Config::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| NudgeError::Config(e.to_string()))?;
        if config.sections.is_empty() {
            config.sections = default_sections();
        }
        if config.defaults.page_size == 0 {
            return Err(NudgeError::Config("page_size must be at least 1".to_string()));
        }
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(filter) = overrides.filter {
            self.sections = vec![SectionConfig::new("Filtered", &filter)];
        }
        if let Some(page_size) = overrides.page_size {
            self.defaults.page_size = page_size.max(1);
        }
        if let Some(max_total) = overrides.max_total {
            self.defaults.max_total = max_total;
        }
        if let Some(max_age_days) = overrides.max_age_days {
            self.defaults.max_age_days = max_age_days;
        }
        if let Some(sort) = overrides.sort {
            self.defaults.sort = sort;
        }
        self
    }

    pub fn limits_for(&self, section: &SectionConfig) -> Limits {
        Limits {
            page_size: section.page_size.unwrap_or(self.defaults.page_size).max(1),
            max_total: self.defaults.max_total,
            max_age_days: self.defaults.max_age_days,
        }
    }

    pub fn item_height(&self) -> u16 {
        if self.defaults.compact {
            1
        } else {
            2
        }
    }
}
