use std::sync::Arc;

use nw_core::dates::parse_published_at;
use nw_core::{Article, Config, Error, Result, SOURCE_URL_SENTINEL};
use tracing::{error, info, instrument, warn};

use crate::mirror::ImageMirror;
use crate::provider::{HeadlineProvider, NewsApiProvider, ProviderArticle};

const UNTITLED: &str = "No title";

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Turns a provider's headline list into renderable article records.
#[derive(Clone)]
pub struct HeadlineFetcher {
    provider: Arc<dyn HeadlineProvider>,
    mirror: ImageMirror,
}

impl HeadlineFetcher {
    pub fn new(provider: Arc<dyn HeadlineProvider>, mirror: ImageMirror) -> Self {
        Self { provider, mirror }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(NewsApiProvider::from_config(config)?),
            ImageMirror::from_config(config)?,
        ))
    }

    pub fn mirror(&self) -> &ImageMirror {
        &self.mirror
    }

    /// Always returns between one and `page_size` records. Provider failures
    /// degrade to the single placeholder record.
    #[instrument(level = "info", skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch(&self, country: &str, page_size: usize) -> Vec<Article> {
        // Ask for extra entries in case some come back incomplete.
        let requested = page_size.saturating_mul(2);
        let entries = match self.provider.top_headlines(country, requested).await {
            Ok(entries) => entries,
            Err(Error::MissingCredential) => {
                warn!("No headline API key configured, serving placeholder");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch headlines");
                Vec::new()
            }
        };

        let mut articles = Vec::with_capacity(page_size.min(entries.len()));
        for (index, entry) in entries.into_iter().enumerate() {
            if articles.len() >= page_size {
                break;
            }
            let id = u32::try_from(index + 1).unwrap_or(u32::MAX);
            articles.push(self.normalize(id, entry).await);
        }

        if articles.is_empty() {
            articles.push(Article::placeholder(self.mirror.placeholder()));
        }

        info!(count = articles.len(), "Fetched headlines");
        articles
    }

    async fn normalize(&self, id: u32, entry: ProviderArticle) -> Article {
        let source_name = entry.source_name().unwrap_or_default().to_string();
        let published_at = entry.published_at.as_deref().and_then(parse_published_at);
        let image_url = match non_empty(entry.url_to_image) {
            Some(remote) => self.mirror.mirror(&remote, id).await,
            None => self.mirror.placeholder().to_string(),
        };

        Article {
            id,
            title: non_empty(entry.title).unwrap_or_else(|| UNTITLED.to_string()),
            description: entry.description.unwrap_or_default(),
            content: entry.content.unwrap_or_default(),
            source_name,
            source_url: non_empty(entry.url).unwrap_or_else(|| SOURCE_URL_SENTINEL.to_string()),
            published_at,
            image_url,
            full_text: None,
        }
    }
}
