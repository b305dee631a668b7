//! Integration tests for the focused-news page
//!
//! These tests exercise the public pipeline from configuration loading
//! through classification and the served page.

mod common {
    use focused_news::classify::FeedEntry;

    pub fn entry(title: &str, source: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: format!("https://{}.example.com/{}", source.to_lowercase(), title.len()),
            source_name: source.to_string(),
            published: None,
        }
    }

    pub const NEWS_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0"><channel><title>News</title>
            <item><title>大谷翔平 日本一</title><link>https://news.example.com/1</link></item>
            <item><title>栃木 祭り開催</title><link>https://news.example.com/2</link></item>
            <item><title>テレビの天気予報</title><link>https://news.example.com/3</link></item>
            <item><title>日銀 金利据え置き</title><link>https://news.example.com/4</link></item>
        </channel></rss>
    "#;

    pub const LOCAL_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0"><channel><title>Local</title>
            <item><title>栃木 祭り開催</title><link>https://local.example.com/1</link></item>
            <item><title>日銀 金利据え置き</title><link>https://local.example.com/2</link></item>
        </channel></rss>
    "#;
}

#[cfg(test)]
mod config_integration_tests {
    use focused_news::config::Config;

    #[test]
    fn test_load_actual_feeds_config() {
        let config = Config::load("feeds.toml");
        assert!(config.is_ok(), "Failed to load feeds.toml: {:?}", config.err());

        let config = config.unwrap();
        assert!(!config.feeds.is_empty(), "feeds.toml should have at least one feed");
        assert!(!config.filter.watch_keywords.is_empty());
        assert_eq!(config.filter.region_token, "栃木");

        let classification = config.classification();
        assert!(classification.region_source_names.contains("下野新聞（栃木）"));
    }
}

#[cfg(test)]
mod classification_properties {
    use super::common::entry;
    use focused_news::classify::{classify, ClassificationConfig};
    use std::collections::HashSet;

    fn config() -> ClassificationConfig {
        ClassificationConfig {
            watch_keywords: vec!["大谷翔平".to_string(), "物価高".to_string()],
            region_token: "栃木".to_string(),
            region_source_names: ["下野".to_string()].into_iter().collect(),
            excluded_title_substrings: vec!["の天気".to_string(), "予報".to_string()],
        }
    }

    fn sample() -> Vec<focused_news::classify::FeedEntry> {
        vec![
            entry("物価高 続く", "Yomiuri"),
            entry("栃木 新駅", "Yahoo"),
            entry("国会 閉会", "Yomiuri"),
            entry("大谷翔平 栃木で講演", "Yahoo"),
            entry("国会 閉会", "下野"),
            entry("週末の天気", "下野"),
            entry("物価高 続く", "Yahoo"),
            entry("為替 円安", "Yahoo"),
            entry("栃木 新駅", "下野"),
        ]
    }

    #[test]
    fn test_sections_partition_unique_titles() {
        let entries = sample();
        let result = classify(&entries, &config());

        let mut all = Vec::new();
        for section in [&result.highlighted, &result.region, &result.other] {
            all.extend(section.iter().map(|i| i.entry.title.clone()));
        }

        let unique: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(unique.len(), all.len(), "a title appeared twice: {:?}", all);

        let expected: HashSet<String> = entries
            .iter()
            .map(|e| e.title.clone())
            .filter(|t| !t.contains("の天気"))
            .collect();
        assert_eq!(unique, expected);
    }

    #[test]
    fn test_priority_and_order() {
        let result = classify(&sample(), &config());

        let highlighted: Vec<_> = result.highlighted.iter().map(|i| i.entry.title.as_str()).collect();
        let region: Vec<_> = result.region.iter().map(|i| i.entry.title.as_str()).collect();
        let other: Vec<_> = result.other.iter().map(|i| i.entry.title.as_str()).collect();

        assert_eq!(highlighted, vec!["物価高 続く", "大谷翔平 栃木で講演"]);
        assert_eq!(region, vec!["栃木 新駅", "国会 閉会"]);
        assert_eq!(other, vec!["為替 円安"]);

        assert_eq!(result.highlighted[0].entry.source_name, "Yomiuri");
        assert_eq!(result.region[1].entry.source_name, "下野");
    }

    #[test]
    fn test_input_is_untouched() {
        let entries = sample();
        let before = entries.clone();

        let first = classify(&entries, &config());
        let second = classify(&entries, &config());

        assert_eq!(entries, before);
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::common::{LOCAL_RSS, NEWS_RSS};
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;
    use focused_news::config::Config;
    use focused_news::fetcher::Fetcher;
    use focused_news::routes::{router, AppState};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn start(feeds_uri: &str) -> TestServer {
        let config = Config::from_str(&format!(
            r#"
            [filter]
            watch_keywords = ["大谷翔平"]
            region_token = "栃木"
            excluded_title_substrings = ["の天気", "予報"]

            [[feeds]]
            name = "News"
            url = "{0}/news.xml"

            [[feeds]]
            name = "Local"
            url = "{0}/local.xml"
            region = true
            "#,
            feeds_uri
        ))
        .unwrap();

        let state = Arc::new(AppState {
            fetcher: Fetcher::new(config.utc_offset_hours).unwrap(),
            config: Arc::new(config),
        });

        TestServer::new(router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_page_from_live_feeds() {
        let feeds = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_RSS))
            .mount(&feeds)
            .await;
        Mock::given(method("GET"))
            .and(path("/local.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOCAL_RSS))
            .mount(&feeds)
            .await;

        let server = start(&feeds.uri()).await;
        let response = server.get("/").await;
        response.assert_status_ok();

        let body = response.text();
        assert!(!body.contains("テレビの天気予報"));
        assert_eq!(body.matches("栃木 祭り開催").count(), 1);
        // First occurrence comes from the News feed
        assert!(body.contains("https://news.example.com/2"));
        assert!(!body.contains("https://local.example.com/1"));
        // Regional source wins over an earlier plain occurrence
        assert!(body.contains("https://local.example.com/2"));
        assert!(!body.contains("https://news.example.com/4"));
    }

    #[tokio::test]
    async fn test_page_with_unreachable_feeds() {
        let feeds = MockServer::start().await;

        let server = start(&feeds.uri()).await;
        let response = server.get("/").await;

        response.assert_status_ok();
        assert!(response.text().contains("見つかりませんでした"));
    }

    #[tokio::test]
    async fn test_refresh_then_health() {
        let feeds = MockServer::start().await;
        let server = start(&feeds.uri()).await;

        let response = server.post("/refresh").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/");

        let health = server.get("/health").await;
        health.assert_status_ok();
        health.assert_text("OK");
    }
}
