use std::future::Future;

use nw_core::Article;
use nw_sources::{ArticleEnricher, Enrichment};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Headlines held for the lifetime of the process.
///
/// The list is filled on first use and never refreshed on its own; `reset`
/// empties it so the next reader fetches again. Population is serialized, so
/// concurrent first readers share a single fetch.
#[derive(Default)]
pub struct ArticleCache {
    articles: RwLock<Vec<Article>>,
    populate_lock: Mutex<()>,
}

impl ArticleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: RwLock::new(articles),
            populate_lock: Mutex::new(()),
        }
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<Article> {
        self.articles.read().await.clone()
    }

    /// Returns the cached list, running `populate` first if the cache is empty.
    pub async fn get_or_populate<F, Fut>(&self, populate: F) -> Vec<Article>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<Article>>,
    {
        {
            let articles = self.articles.read().await;
            if !articles.is_empty() {
                return articles.clone();
            }
        }

        let _guard = self.populate_lock.lock().await;
        {
            let articles = self.articles.read().await;
            if !articles.is_empty() {
                return articles.clone();
            }
        }

        let fresh = populate().await;
        info!(count = fresh.len(), "Populated article cache");
        let mut articles = self.articles.write().await;
        *articles = fresh;
        articles.clone()
    }

    pub async fn get(&self, id: u32) -> Option<Article> {
        self.articles
            .read()
            .await
            .iter()
            .find(|article| article.id == id)
            .cloned()
    }

    /// Looks up `id` and fills in its full text if missing. `None` means the id
    /// is unknown, in which case no enrichment is attempted. Enrichment failures
    /// are logged and the cached record is returned as is.
    pub async fn ensure_enriched(&self, id: u32, enricher: &ArticleEnricher) -> Option<Article> {
        let mut article = self.get(id).await?;
        if article.has_full_text() {
            return Some(article);
        }

        match enricher.enrich(&mut article).await {
            Ok(Enrichment::Populated) => {}
            Ok(Enrichment::Skipped) => return Some(article),
            Err(e) => {
                info!(id, url = %article.source_url, error = %e, "Could not enrich article");
                return Some(article);
            }
        }

        // The page fetch ran without the lock held, so keep whichever text
        // landed first.
        let mut articles = self.articles.write().await;
        match articles
            .iter_mut()
            .find(|cached| cached.id == id && cached.source_url == article.source_url)
        {
            Some(cached) => {
                if !cached.has_full_text() {
                    cached.full_text = article.full_text.take();
                    debug!(id, "Stored enriched article text");
                }
                Some(cached.clone())
            }
            None => Some(article),
        }
    }

    pub async fn reset(&self) {
        let _guard = self.populate_lock.lock().await;
        self.articles.write().await.clear();
    }
}
