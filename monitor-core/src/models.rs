use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RssFeed {
    pub id: i64,
    pub url: String,
    pub name: Option<String>,
    pub fetch_interval_minutes: u32,
    pub is_active: bool,
    pub last_fetched: Option<DateTime<Utc>>,
}

impl RssFeed {
    /// Label shown in feed lists: the name when one was given, the URL otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.url)
    }

    pub fn display_last_fetched(&self) -> String {
        match self.last_fetched {
            Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
            None => "Never".to_string(),
        }
    }
}

/// A feed item that matched at least one active keyword. Produced by the
/// server-side ingestion pipeline; read-only from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultItem {
    pub title: Option<String>,
    pub link: String,
    pub summary: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    /// Comma-joined keyword names, as the server sends them.
    #[serde(default)]
    pub matched_keywords: String,
}

impl ResultItem {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("No Title")
    }

    pub fn display_summary(&self) -> &str {
        self.summary
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("No summary available.")
    }

    pub fn display_published(&self) -> String {
        match self.published_date {
            Some(ts) => ts.format("%Y-%m-%d").to_string(),
            None => "N/A".to_string(),
        }
    }

    /// Individual matched-keyword tags, split from the comma-joined field.
    pub fn keyword_tags(&self) -> Vec<&str> {
        self.matched_keywords
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// One server-computed page of results. Recomputed on every load, never
/// merged with a previous page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultPage {
    pub items: Vec<ResultItem>,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewKeyword {
    pub keyword: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewFeed {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fetch_interval_minutes: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_interval_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: Option<&str>, summary: Option<&str>, matched: &str) -> ResultItem {
        ResultItem {
            title: title.map(str::to_string),
            link: "http://example.com/a".into(),
            summary: summary.map(str::to_string),
            published_date: None,
            matched_keywords: matched.to_string(),
        }
    }

    #[test]
    fn display_fallbacks_for_missing_fields() {
        let it = item(None, None, "");
        assert_eq!(it.display_title(), "No Title");
        assert_eq!(it.display_summary(), "No summary available.");
        assert_eq!(it.display_published(), "N/A");
        assert!(it.keyword_tags().is_empty());
    }

    #[test]
    fn empty_strings_fall_back_like_missing_fields() {
        let it = item(Some(""), Some(""), "");
        assert_eq!(it.display_title(), "No Title");
        assert_eq!(it.display_summary(), "No summary available.");
    }

    #[test]
    fn keyword_tags_split_and_trim() {
        let it = item(Some("t"), None, "rust, async ,tokio,,");
        assert_eq!(it.keyword_tags(), vec!["rust", "async", "tokio"]);
    }

    #[test]
    fn feed_display_name_prefers_name_over_url() {
        let mut feed = RssFeed {
            id: 1,
            url: "http://example.com/rss".into(),
            name: Some("Example".into()),
            fetch_interval_minutes: 5,
            is_active: true,
            last_fetched: None,
        };
        assert_eq!(feed.display_name(), "Example");
        assert_eq!(feed.display_last_fetched(), "Never");
        feed.name = None;
        assert_eq!(feed.display_name(), "http://example.com/rss");
    }

    #[test]
    fn patch_serialization_skips_unset_fields() {
        let patch = KeywordPatch {
            keyword: None,
            is_active: Some(false),
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"is_active":false}"#);
    }
}
