use std::path::PathBuf;

use nw_core::{Article, Config, Result};
use nw_sources::{ArticleEnricher, HeadlineFetcher};

use crate::cache::ArticleCache;

pub struct AppState {
    pub cache: ArticleCache,
    pub fetcher: HeadlineFetcher,
    pub enricher: ArticleEnricher,
    pub country: String,
    pub page_size: usize,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(fetcher: HeadlineFetcher, enricher: ArticleEnricher, config: &Config) -> Self {
        Self {
            cache: ArticleCache::new(),
            fetcher,
            enricher,
            country: config.country.clone(),
            page_size: config.page_size,
            static_dir: config.static_dir.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            HeadlineFetcher::from_config(config)?,
            ArticleEnricher::from_config(config)?,
            config,
        ))
    }

    /// Cached headlines, fetched on first call.
    pub async fn articles(&self) -> Vec<Article> {
        self.cache
            .get_or_populate(|| self.fetcher.fetch(&self.country, self.page_size))
            .await
    }

    pub async fn article(&self, id: u32) -> Option<Article> {
        self.cache.ensure_enriched(id, &self.enricher).await
    }
}
