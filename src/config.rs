use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::classify::ClassificationConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Minutes between automatic page reloads
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    /// Offset from UTC used when formatting publish times
    #[serde(default)]
    pub utc_offset_hours: i32,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    pub feeds: Vec<FeedConfig>,
}

fn default_refresh_interval() -> u64 {
    15
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_region_heading")]
    pub region_heading: String,
}

fn default_title() -> String {
    "Focused News Feed".to_string()
}

fn default_icon() -> String {
    "🎯".to_string()
}

fn default_region_heading() -> String {
    "地域のニュース".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            icon: default_icon(),
            region_heading: default_region_heading(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FilterConfig {
    #[serde(default)]
    pub watch_keywords: Vec<String>,
    #[serde(default)]
    pub region_token: String,
    #[serde(default)]
    pub excluded_title_substrings: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
    /// Every entry of a region feed counts as regional news
    #[serde(default)]
    pub region: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.refresh_interval == 0 {
            bail!("refresh_interval must be positive");
        }
        if !(-23..=23).contains(&self.utc_offset_hours) {
            bail!(
                "utc_offset_hours must be between -23 and 23, got {}",
                self.utc_offset_hours
            );
        }

        let mut names = HashSet::new();
        for feed in &self.feeds {
            if feed.name.trim().is_empty() {
                bail!("feed with url '{}' has an empty name", feed.url);
            }
            if feed.url.trim().is_empty() {
                bail!("feed '{}' has an empty url", feed.name);
            }
            // Entries are attributed to feeds by name
            if !names.insert(feed.name.as_str()) {
                bail!("duplicate feed name '{}'", feed.name);
            }
        }
        Ok(())
    }

    pub fn region_source_names(&self) -> HashSet<String> {
        self.feeds
            .iter()
            .filter(|f| f.region)
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn classification(&self) -> ClassificationConfig {
        ClassificationConfig {
            watch_keywords: self.filter.watch_keywords.clone(),
            region_token: self.filter.region_token.clone(),
            region_source_names: self.region_source_names(),
            excluded_title_substrings: self.filter.excluded_title_substrings.clone(),
        }
    }
}
