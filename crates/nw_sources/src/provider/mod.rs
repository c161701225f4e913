use async_trait::async_trait;
use nw_core::Result;
use serde::Deserialize;

pub mod newsapi;

pub use newsapi::NewsApiProvider;

/// One entry of a provider's headline list. Every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub source: Option<ProviderSource>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSource {
    pub name: Option<String>,
}

impl ProviderArticle {
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|source| source.name.as_deref())
    }
}

#[async_trait]
pub trait HeadlineProvider: Send + Sync {
    /// Returns the name of the headline provider
    fn name(&self) -> &str;

    /// Fetches up to `limit` top headlines for `country`, in provider order
    async fn top_headlines(&self, country: &str, limit: usize) -> Result<Vec<ProviderArticle>>;
}
