use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 6;
pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5000));
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Language the article text extractor is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "es" | "spanish" => Ok(Language::Spanish),
            other => Err(Error::Config(format!("Unsupported article language: {}", other))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Runtime settings, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub country: String,
    pub page_size: usize,
    pub request_timeout: Duration,
    pub image_timeout: Duration,
    pub bind: SocketAddr,
    pub static_dir: PathBuf,
    pub language: Language,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            image_timeout: Duration::from_secs(DEFAULT_IMAGE_TIMEOUT_SECS),
            bind: DEFAULT_BIND,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            language: Language::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page size must be at least 1".to_string()));
        }
        if self.request_timeout.is_zero() || self.image_timeout.is_zero() {
            return Err(Error::Config("timeouts must be greater than zero".to_string()));
        }
        url::Url::parse(&self.endpoint)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;
        Ok(())
    }

    /// Blank keys count as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    /// Directory mirrored images are written to.
    pub fn image_dir(&self) -> PathBuf {
        self.static_dir.join("images").join("news")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.country, "us");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(6));
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.bind.to_string(), "127.0.0.1:5000");
        assert_eq!(config.image_dir(), PathBuf::from("static/images/news"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = Config {
            endpoint: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = Config {
            api_key: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("ES".parse::<Language>().unwrap(), Language::Spanish);
        assert!("xx".parse::<Language>().is_err());
    }
}
