use nw_core::{Article, Config, Error, Language, Result};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::extract::extract_main_text;
use crate::http::browser_client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    /// Nothing to do: no source page, text already present, or nothing usable found.
    Skipped,
    /// `full_text` was set.
    Populated,
}

/// Fills in an article's full text from its source page.
#[derive(Debug, Clone)]
pub struct ArticleEnricher {
    client: Client,
    language: Language,
}

impl ArticleEnricher {
    pub fn new(client: Client, language: Language) -> Self {
        Self { client, language }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(browser_client(config.request_timeout)?, config.language))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// On error the article is left exactly as it was.
    #[instrument(level = "debug", skip_all, fields(id = article.id, url = %article.source_url))]
    pub async fn enrich(&self, article: &mut Article) -> Result<Enrichment> {
        if !article.has_source() || article.has_full_text() {
            return Ok(Enrichment::Skipped);
        }

        let html = self.fetch_page(&article.source_url).await?;
        let extracted = extract_main_text(&html, self.language)?;
        debug!(chars = extracted.len(), "Extracted article body");

        let full_text = [
            extracted.as_str(),
            article.content.as_str(),
            article.description.as_str(),
        ]
        .into_iter()
        .find(|text| !text.is_empty())
        .map(str::to_string);

        match full_text {
            Some(text) => {
                article.full_text = Some(text);
                Ok(Enrichment::Populated)
            }
            None => Ok(Enrichment::Skipped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::spawn_server;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::Html;
    use axum::routing::get;
    use axum::Router;
    use nw_core::{PLACEHOLDER_IMAGE, SOURCE_URL_SENTINEL};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const PAGE: &str = r#"<html><body><article>
        <p>The mayor said that the new bridge will open to traffic at the end of the year.</p>
        <p>Engineers have been working on the project for more than a decade.</p>
    </article></body></html>"#;

    fn enricher() -> ArticleEnricher {
        ArticleEnricher::new(
            browser_client(Duration::from_secs(2)).unwrap(),
            Language::English,
        )
    }

    fn article(source_url: &str) -> Article {
        Article {
            id: 1,
            title: "Bridge".to_string(),
            description: "A bridge opens".to_string(),
            content: "The mayor said [+300 chars]".to_string(),
            source_name: "Local".to_string(),
            source_url: source_url.to_string(),
            published_at: None,
            image_url: PLACEHOLDER_IMAGE.to_string(),
            full_text: None,
        }
    }

    async fn page_server(agents: Arc<Mutex<Vec<String>>>) -> String {
        let app = Router::new()
            .route(
                "/story",
                get(move |headers: HeaderMap| {
                    let agents = agents.clone();
                    async move {
                        let agent = headers
                            .get("user-agent")
                            .and_then(|value| value.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        agents.lock().unwrap().push(agent);
                        Html(PAGE)
                    }
                }),
            )
            .route("/empty", get(|| async { Html("<html><body><p>Menu</p></body></html>") }))
            .route("/gone", get(|| async { StatusCode::GONE }));
        spawn_server(app).await
    }

    #[tokio::test]
    async fn test_enrich_populates_full_text() {
        let agents = Arc::new(Mutex::new(Vec::new()));
        let base = page_server(agents.clone()).await;
        let mut article = article(&format!("{}/story", base));

        let outcome = enricher().enrich(&mut article).await.unwrap();

        assert_eq!(outcome, Enrichment::Populated);
        let text = article.full_text.as_deref().unwrap();
        assert!(text.starts_with("The mayor said that the new bridge"));
        assert!(text.contains("\n\nEngineers"));
        assert_eq!(agents.lock().unwrap().as_slice(), ["Mozilla/5.0".to_string()]);
    }

    #[tokio::test]
    async fn test_enrich_falls_back_to_content_then_description() {
        let base = page_server(Arc::new(Mutex::new(Vec::new()))).await;

        let mut with_content = article(&format!("{}/empty", base));
        enricher().enrich(&mut with_content).await.unwrap();
        assert_eq!(with_content.full_text.as_deref(), Some("The mayor said [+300 chars]"));

        let mut description_only = article(&format!("{}/empty", base));
        description_only.content.clear();
        enricher().enrich(&mut description_only).await.unwrap();
        assert_eq!(description_only.full_text.as_deref(), Some("A bridge opens"));

        let mut nothing = article(&format!("{}/empty", base));
        nothing.content.clear();
        nothing.description.clear();
        let outcome = enricher().enrich(&mut nothing).await.unwrap();
        assert_eq!(outcome, Enrichment::Skipped);
        assert!(nothing.full_text.is_none());
    }

    #[tokio::test]
    async fn test_sentinel_source_is_skipped() {
        let mut article = article(SOURCE_URL_SENTINEL);
        let outcome = enricher().enrich(&mut article).await.unwrap();
        assert_eq!(outcome, Enrichment::Skipped);
        assert!(article.full_text.is_none());
    }

    #[tokio::test]
    async fn test_error_status_leaves_article_unchanged() {
        let base = page_server(Arc::new(Mutex::new(Vec::new()))).await;
        let mut article = article(&format!("{}/gone", base));
        let before = article.clone();

        let err = enricher().enrich(&mut article).await.unwrap_err();

        assert!(matches!(err, Error::UpstreamStatus { status: 410, .. }));
        assert_eq!(article, before);
    }

    #[tokio::test]
    async fn test_unreachable_source_leaves_article_unchanged() {
        let mut article = article("http://127.0.0.1:9/story");
        assert!(enricher().enrich(&mut article).await.is_err());
        assert!(article.full_text.is_none());
    }
}
