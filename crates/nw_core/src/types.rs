use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Value stored in `source_url` when the provider gave no link.
pub const SOURCE_URL_SENTINEL: &str = "#";

/// Public path of the image shown when no mirrored copy is available.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.jpg";

pub const NO_ARTICLES_TITLE: &str = "No articles available right now";
pub const NO_ARTICLES_DESCRIPTION: &str = "Please check back later.";

/// A headline as held by the in-memory cache and rendered by the web layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// 1-based position in the fetch that produced this record.
    pub id: u32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub source_name: String,
    pub source_url: String,
    pub published_at: Option<DateTime<FixedOffset>>,
    /// Mirrored image path or the placeholder path, never empty.
    pub image_url: String,
    /// Body text extracted from the source page, `None` until enrichment succeeds.
    pub full_text: Option<String>,
}

impl Article {
    /// The single record served when the provider yields nothing.
    pub fn placeholder(image_url: impl Into<String>) -> Self {
        Self {
            id: 1,
            title: NO_ARTICLES_TITLE.to_string(),
            description: NO_ARTICLES_DESCRIPTION.to_string(),
            content: String::new(),
            source_name: String::new(),
            source_url: SOURCE_URL_SENTINEL.to_string(),
            published_at: None,
            image_url: image_url.into(),
            full_text: Some(String::new()),
        }
    }

    /// True when the record links to a real page that enrichment could fetch.
    pub fn has_source(&self) -> bool {
        !self.source_url.is_empty() && self.source_url != SOURCE_URL_SENTINEL
    }

    pub fn has_full_text(&self) -> bool {
        self.full_text.as_deref().is_some_and(|text| !text.is_empty())
    }

    /// Text shown on the detail page: full text, then content, then description.
    pub fn body(&self) -> &str {
        [
            self.full_text.as_deref().unwrap_or_default(),
            self.content.as_str(),
            self.description.as_str(),
        ]
        .into_iter()
        .find(|text| !text.is_empty())
        .unwrap_or_default()
    }
}
