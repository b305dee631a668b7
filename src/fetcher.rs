use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use feed_rs::parser;
use reqwest::Client;
use tracing::{error, info, warn};

use crate::classify::FeedEntry;
use crate::config::FeedConfig;

const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to parse feed: {0}")]
    Parse(#[from] parser::ParseFeedError),
}

pub struct Fetcher {
    client: Client,
    offset: FixedOffset,
}

impl Fetcher {
    pub fn new(utc_offset_hours: i32) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("FocusedNews/1.0 (RSS Reader)")
            .build()?;

        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .ok_or_else(|| anyhow::anyhow!("invalid UTC offset: {} hours", utc_offset_hours))?;

        Ok(Self { client, offset })
    }

    /// Fetches every feed in order. Sources that fail are logged and skipped.
    pub async fn fetch_all(&self, feeds: &[FeedConfig]) -> Vec<FeedEntry> {
        info!("Fetching {} feeds", feeds.len());

        let mut entries = Vec::new();
        for feed in feeds {
            match self.fetch_feed(feed).await {
                Ok(mut fetched) => entries.append(&mut fetched),
                Err(e) => error!("Failed to fetch feed '{}': {}", feed.name, e),
            }
        }

        info!("Fetched {} entries", entries.len());
        entries
    }

    pub async fn fetch_feed(&self, feed: &FeedConfig) -> Result<Vec<FeedEntry>, FetchError> {
        info!("Fetching feed: {} ({})", feed.name, feed.url);

        let response = self.client.get(&feed.url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let entries = parse_entries(&feed.name, &bytes, self.offset)?;
        info!("Got {} entries from '{}'", entries.len(), feed.name);
        Ok(entries)
    }
}

/// Parses an RSS or Atom document into entries, keeping document order.
pub fn parse_entries(
    source_name: &str,
    bytes: &[u8],
    offset: FixedOffset,
) -> Result<Vec<FeedEntry>, FetchError> {
    let parsed = parser::parse(bytes)?;

    let mut entries = Vec::with_capacity(parsed.entries.len());
    for entry in parsed.entries {
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.trim().to_string())
            .unwrap_or_default();

        if title.is_empty() {
            warn!("Skipping untitled entry '{}' from '{}'", entry.id, source_name);
            continue;
        }

        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        if link.is_empty() {
            warn!("Skipping entry with no link: {}", title);
            continue;
        }

        let published = entry
            .published
            .or(entry.updated)
            .map(|dt| format_published(dt, offset));

        entries.push(FeedEntry {
            title,
            link,
            source_name: source_name.to_string(),
            published,
        });
    }

    Ok(entries)
}

pub fn format_published(dt: DateTime<Utc>, offset: FixedOffset) -> String {
    dt.with_timezone(&offset).format(PUBLISHED_FORMAT).to_string()
}
