use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use nw_core::config::{
    DEFAULT_BIND, DEFAULT_COUNTRY, DEFAULT_ENDPOINT, DEFAULT_IMAGE_TIMEOUT_SECS,
    DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_STATIC_DIR,
};
use nw_core::{Article, Config, Language};
use nw_sources::HeadlineFetcher;
use nw_web::{create_app, AppState};
use tracing::{debug, info, warn};

mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "newswire",
    author,
    version,
    about = "Top headlines front-end with local image mirroring and on-demand full text"
)]
struct Cli {
    /// API key for the headline provider.
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Top-headlines endpoint of the provider.
    #[arg(long, env = "NEWSAPI_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Two-letter country code to fetch headlines for.
    #[arg(long, env = "COUNTRY", default_value = DEFAULT_COUNTRY)]
    country: String,

    /// Number of headlines kept in the cache.
    #[arg(long, env = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Seconds before headline and article page requests time out.
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout: u64,

    /// Seconds before image downloads time out.
    #[arg(long, env = "IMAGE_TIMEOUT", default_value_t = DEFAULT_IMAGE_TIMEOUT_SECS)]
    image_timeout: u64,

    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "NEWSWIRE_BIND", default_value_t = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Directory served under /static; mirrored images go to images/news inside it.
    #[arg(long, env = "NEWSWIRE_STATIC_DIR", default_value = DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,

    /// Language of the article pages, used by full-text extraction (en, es).
    #[arg(long, env = "ARTICLE_LANGUAGE", default_value = "en")]
    language: Language,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the web front-end (default)
    Serve,
    /// Fetch headlines once and print them
    Headlines {
        /// Print the article records as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            country: self.country.clone(),
            page_size: self.page_size,
            request_timeout: Duration::from_secs(self.request_timeout),
            image_timeout: Duration::from_secs(self.image_timeout),
            bind: self.bind,
            static_dir: self.static_dir.clone(),
            language: self.language,
        }
    }
}

fn print_headlines(articles: &[Article]) {
    for article in articles {
        if article.source_name.is_empty() {
            println!("{:>3}. {}", article.id, article.title);
        } else {
            println!("{:>3}. {} ({})", article.id, article.title, article.source_name);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Variables already set in the environment win over the file.
    let env_file = dotenvy::dotenv().ok();
    logging::init_logging();
    if let Some(path) = env_file {
        debug!(path = %path.display(), "Loaded environment file");
    }
    let cli = Cli::parse();
    let config = cli.config();
    config.validate().context("invalid configuration")?;

    if config.api_key().is_none() {
        warn!("NEWSAPI_KEY not set (export it or add it to .env), only the placeholder article will be shown");
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!(
                country = %config.country,
                page_size = config.page_size,
                language = %config.language,
                static_dir = %config.static_dir.display(),
                "🗞️ Starting newswire"
            );
            let state = AppState::from_config(&config).context("failed to build HTTP clients")?;
            nw_web::serve(create_app(state), config.bind).await?;
        }
        Commands::Headlines { json } => {
            let fetcher = HeadlineFetcher::from_config(&config).context("failed to build HTTP clients")?;
            let articles = fetcher.fetch(&config.country, config.page_size).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else {
                print_headlines(&articles);
            }
        }
    }

    Ok(())
}
