use std::collections::HashSet;

/// Maximum number of regional entries shown on the page.
pub const REGION_DISPLAY_LIMIT: usize = 20;
/// Maximum number of remaining entries shown on the page.
pub const OTHER_DISPLAY_LIMIT: usize = 50;

/// One article as returned by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// Name of the configured feed this entry came from
    pub source_name: String,
    /// Pre-formatted publish time, if the feed carried one
    pub published: Option<String>,
}

impl FeedEntry {
    pub fn published_display(&self) -> &str {
        self.published.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationConfig {
    pub watch_keywords: Vec<String>,
    pub region_token: String,
    pub region_source_names: HashSet<String>,
    pub excluded_title_substrings: Vec<String>,
}

impl ClassificationConfig {
    fn is_excluded(&self, title: &str) -> bool {
        self.excluded_title_substrings
            .iter()
            .any(|s| !s.is_empty() && title.contains(s.as_str()))
    }

    /// Watch keywords found in `title`, in configuration order.
    pub fn matched_keywords(&self, title: &str) -> Vec<String> {
        self.watch_keywords
            .iter()
            .filter(|kw| !kw.is_empty() && title.contains(kw.as_str()))
            .cloned()
            .collect()
    }

    fn is_regional(&self, entry: &FeedEntry) -> bool {
        (!self.region_token.is_empty() && entry.title.contains(self.region_token.as_str()))
            || self.region_source_names.contains(&entry.source_name)
    }
}

/// A fetched entry together with the keywords that placed it in its section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub entry: FeedEntry,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub highlighted: Vec<ClassifiedEntry>,
    pub region: Vec<ClassifiedEntry>,
    pub other: Vec<ClassifiedEntry>,
}

impl ClassificationResult {
    pub fn len(&self) -> usize {
        self.highlighted.len() + self.region.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies the page caps. Highlighted entries are never cut.
    pub fn truncate_for_display(mut self) -> Self {
        self.region.truncate(REGION_DISPLAY_LIMIT);
        self.other.truncate(OTHER_DISPLAY_LIMIT);
        self
    }
}

/// Sorts `entries` into highlighted, regional and remaining sections.
///
/// Titles containing an excluded substring are dropped. Every surviving title
/// appears in exactly one section, at the position of its first occurrence.
/// Highlighting depends on the title alone, so a title can only conflict
/// between the regional and remaining sections; the regional section wins.
pub fn classify(entries: &[FeedEntry], config: &ClassificationConfig) -> ClassificationResult {
    let mut result = ClassificationResult::default();
    let mut seen_highlighted = HashSet::new();
    let mut seen_region = HashSet::new();
    let mut seen_other = HashSet::new();

    for entry in entries {
        if config.is_excluded(&entry.title) {
            continue;
        }

        let matched = config.matched_keywords(&entry.title);
        let (bucket, seen) = if !matched.is_empty() {
            (&mut result.highlighted, &mut seen_highlighted)
        } else if config.is_regional(entry) {
            (&mut result.region, &mut seen_region)
        } else {
            (&mut result.other, &mut seen_other)
        };

        if seen.insert(entry.title.as_str()) {
            bucket.push(ClassifiedEntry {
                entry: entry.clone(),
                matched_keywords: matched,
            });
        }
    }

    result.other.retain(|item| {
        let title = item.entry.title.as_str();
        !seen_highlighted.contains(title) && !seen_region.contains(title)
    });

    result
}
