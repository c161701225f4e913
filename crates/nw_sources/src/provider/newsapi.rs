use async_trait::async_trait;
use nw_core::{Config, Error, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{HeadlineProvider, ProviderArticle};
use crate::http::build_client;

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<ProviderArticle>,
}

/// Client for a NewsAPI-compatible `top-headlines` endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl NewsApiProvider {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            build_client(config.request_timeout)?,
            config.endpoint.clone(),
            config.api_key().map(str::to_string),
        ))
    }
}

#[async_trait]
impl HeadlineProvider for NewsApiProvider {
    fn name(&self) -> &str {
        "newsapi"
    }

    #[instrument(level = "debug", skip(self), fields(endpoint = %self.endpoint))]
    async fn top_headlines(&self, country: &str, limit: usize) -> Result<Vec<ProviderArticle>> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingCredential)?;
        let page_size = limit.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apiKey", api_key),
                ("country", country),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body: HeadlinesResponse = response.json().await?;
        debug!(count = body.articles.len(), "Decoded headline response");
        Ok(body.articles)
    }
}
