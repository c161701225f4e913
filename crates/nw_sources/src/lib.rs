pub mod enricher;
pub mod extract;
pub mod fetcher;
pub mod http;
pub mod mirror;
pub mod provider;

#[cfg(test)]
pub(crate) mod test_utils;

pub use enricher::{ArticleEnricher, Enrichment};
pub use fetcher::HeadlineFetcher;
pub use mirror::{ImageMirror, MirroredImage};
pub use provider::{HeadlineProvider, NewsApiProvider, ProviderArticle};

pub mod prelude {
    pub use super::provider::HeadlineProvider;
    pub use nw_core::{Article, Error, Result};
}
