//! Local copies of article images.
//!
//! Images are stored as `{id}.{ext}` under the mirror directory and served by
//! the web layer from `public_prefix`. An existing file is reused without
//! touching the network; any failure falls back to the placeholder image.

use std::path::{Path, PathBuf};

use nw_core::{Config, Error, Result, PLACEHOLDER_IMAGE};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};
use url::Url;

use crate::http::build_client;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
const DEFAULT_EXTENSION: &str = "jpg";

pub const DEFAULT_PUBLIC_PREFIX: &str = "/static/images/news";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirroredImage {
    /// The file was already on disk.
    Existing(String),
    /// The file was fetched during this call.
    Downloaded(String),
}

impl MirroredImage {
    pub fn public_path(&self) -> &str {
        match self {
            MirroredImage::Existing(path) | MirroredImage::Downloaded(path) => path,
        }
    }

    pub fn into_public_path(self) -> String {
        match self {
            MirroredImage::Existing(path) | MirroredImage::Downloaded(path) => path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageMirror {
    client: Client,
    dir: PathBuf,
    public_prefix: String,
    placeholder: String,
}

impl ImageMirror {
    pub fn new(client: Client, dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            client,
            dir: dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
            placeholder: PLACEHOLDER_IMAGE.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            build_client(config.image_timeout)?,
            config.image_dir(),
            DEFAULT_PUBLIC_PREFIX,
        ))
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(id: u32, extension: &str) -> String {
        format!("{}.{}", id, extension)
    }

    /// Returns a servable path for the image, never failing.
    pub async fn mirror(&self, remote_url: &str, id: u32) -> String {
        if remote_url.trim().is_empty() {
            return self.placeholder.clone();
        }

        match self.try_mirror(remote_url, id).await {
            Ok(image) => image.into_public_path(),
            Err(e) => {
                info!(id, url = remote_url, error = %e, "Failed to mirror image, using placeholder");
                self.placeholder.clone()
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn try_mirror(&self, remote_url: &str, id: u32) -> Result<MirroredImage> {
        let remote_url = remote_url.trim();
        if remote_url.is_empty() {
            return Err(Error::InvalidUrl("empty image URL".to_string()));
        }

        let file_name = Self::file_name(id, image_extension(remote_url));
        let local_path = self.dir.join(&file_name);
        let public_path = format!("{}/{}", self.public_prefix, file_name);

        if tokio::fs::try_exists(&local_path).await? {
            debug!(path = %local_path.display(), "Image already mirrored");
            return Ok(MirroredImage::Existing(public_path));
        }

        let response = self.client.get(remote_url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url: remote_url.to_string(),
            });
        }
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let partial = self.dir.join(format!("{}.part", file_name));
        if let Err(e) = write_then_rename(&partial, &local_path, &bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        debug!(path = %local_path.display(), bytes = bytes.len(), "Mirrored image");
        Ok(MirroredImage::Downloaded(public_path))
    }
}

async fn write_then_rename(partial: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(partial, bytes).await?;
    tokio::fs::rename(partial, target).await?;
    Ok(())
}

/// File extension for a mirrored image, taken from the last path segment of
/// `remote_url`. Anything outside the raster whitelist maps to `jpg`.
pub fn image_extension(remote_url: &str) -> &'static str {
    let segment = match Url::parse(remote_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string(),
        Err(_) => {
            let path = remote_url.split(['?', '#']).next().unwrap_or_default();
            path.rsplit('/').next().unwrap_or_default().to_string()
        }
    };

    segment
        .rsplit_once('.')
        .and_then(|(_, ext)| {
            ALLOWED_EXTENSIONS
                .into_iter()
                .find(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(DEFAULT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::spawn_server;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

    fn mirror_in(dir: &Path) -> ImageMirror {
        ImageMirror::new(
            build_client(Duration::from_secs(2)).unwrap(),
            dir.join("images").join("news"),
            DEFAULT_PUBLIC_PREFIX,
        )
    }

    async fn image_server(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new()
            .route(
                "/img/photo.png",
                get(move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        PNG_BYTES
                    }
                }),
            )
            .route("/missing.jpg", get(|| async { AxumStatus::NOT_FOUND }));
        spawn_server(app).await
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("https://cdn.example.com/a/b/photo.PNG?w=600"), "png");
        assert_eq!(image_extension("https://cdn.example.com/photo.jpeg#frag"), "jpeg");
        assert_eq!(image_extension("https://cdn.example.com/photo.webp"), "webp");
        assert_eq!(image_extension("https://cdn.example.com/photo.gif"), "jpg");
        assert_eq!(image_extension("https://cdn.example.com/image?id=1.png"), "jpg");
        assert_eq!(image_extension("https://cdn.example.com/"), "jpg");
        assert_eq!(image_extension("//cdn.example.com/photo.png?x=1"), "png");
    }

    #[tokio::test]
    async fn test_empty_url_returns_placeholder_without_io() {
        let tmp = tempfile::tempdir().unwrap();
        let mirror = mirror_in(tmp.path());

        assert_eq!(mirror.mirror("", 1).await, PLACEHOLDER_IMAGE);
        assert_eq!(mirror.mirror("   ", 2).await, PLACEHOLDER_IMAGE);
        assert!(!mirror.dir().exists());
    }

    #[tokio::test]
    async fn test_mirror_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let base = image_server(hits.clone()).await;
        let mirror = mirror_in(tmp.path());
        let url = format!("{}/img/photo.png?size=large", base);

        let first = mirror.try_mirror(&url, 7).await.unwrap();
        assert_eq!(first, MirroredImage::Downloaded("/static/images/news/7.png".to_string()));

        let second = mirror.try_mirror(&url, 7).await.unwrap();
        assert_eq!(second, MirroredImage::Existing("/static/images/news/7.png".to_string()));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        let stored = std::fs::read(mirror.dir().join("7.png")).unwrap();
        assert_eq!(stored, PNG_BYTES);
        assert!(!mirror.dir().join("7.png.part").exists());
    }

    #[tokio::test]
    async fn test_existing_file_skips_network() {
        let tmp = tempfile::tempdir().unwrap();
        let mirror = mirror_in(tmp.path());
        std::fs::create_dir_all(mirror.dir()).unwrap();
        std::fs::write(mirror.dir().join("4.jpg"), b"cached").unwrap();

        // Nothing listens on the discard port, so a fetch would fail.
        let path = mirror.mirror("http://127.0.0.1:9/whatever.jpg", 4).await;
        assert_eq!(path, "/static/images/news/4.jpg");
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_placeholder() {
        let tmp = tempfile::tempdir().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let base = image_server(hits).await;
        let mirror = mirror_in(tmp.path()).with_placeholder("/static/images/fallback.jpg");

        let path = mirror.mirror(&format!("{}/missing.jpg", base), 3).await;
        assert_eq!(path, "/static/images/fallback.jpg");
        assert!(!mirror.dir().join("3.jpg").exists());

        let err = mirror
            .try_mirror(&format!("{}/missing.jpg", base), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_falls_back_to_placeholder() {
        let tmp = tempfile::tempdir().unwrap();
        let mirror = mirror_in(tmp.path());
        let path = mirror.mirror("http://127.0.0.1:9/photo.png", 5).await;
        assert_eq!(path, PLACEHOLDER_IMAGE);
    }
}
