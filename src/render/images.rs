use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{header, Client, Response};

use crate::error::Result;

/// Images larger than this are not inlined.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;
pub const AVATAR_SIZE_PX: u32 = 160;

/// An image that may or may not have made it into the render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSlot {
    /// `data:` URI ready to drop into an `<image href>`.
    Embedded(String),
    #[default]
    Unavailable,
}

impl ImageSlot {
    pub fn data_uri(&self) -> Option<&str> {
        match self {
            ImageSlot::Embedded(uri) => Some(uri),
            ImageSlot::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedImages {
    pub avatar: ImageSlot,
    pub card_art: ImageSlot,
}

/// Fetches remote images for inlining with a hard per-request timeout.
#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent("gitcard/0.1")
            .build()?;
        Ok(Self { client })
    }

    /// Fetches both images concurrently. Either one failing leaves its slot
    /// [`ImageSlot::Unavailable`].
    pub async fn fetch_embedded_images(
        &self,
        avatar_url: Option<&str>,
        card_art_url: Option<&str>,
    ) -> EmbeddedImages {
        let avatar = async {
            match avatar_url {
                Some(url) => self.fetch(&sized_avatar_url(url)).await,
                None => ImageSlot::Unavailable,
            }
        };
        let card_art = async {
            match card_art_url {
                Some(url) => self.fetch(url).await,
                None => ImageSlot::Unavailable,
            }
        };

        let (avatar, card_art) = tokio::join!(avatar, card_art);
        EmbeddedImages { avatar, card_art }
    }

    /// Timeouts, non-2xx responses and oversized bodies all come back as
    /// [`ImageSlot::Unavailable`].
    pub async fn fetch(&self, url: &str) -> ImageSlot {
        match self.try_fetch(url).await {
            Ok(Some(uri)) => ImageSlot::Embedded(uri),
            Ok(None) => ImageSlot::Unavailable,
            Err(e) => {
                tracing::warn!("Image fetch failed for {}: {}", url, e);
                ImageSlot::Unavailable
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Option<String>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            tracing::debug!("Image {} returned {}", url, response.status());
            return Ok(None);
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| "image/png".to_string());

        if let Some(length) = response.content_length() {
            if length > MAX_IMAGE_BYTES as u64 {
                tracing::debug!("Image {} skipped ({} bytes advertised)", url, length);
                return Ok(None);
            }
        }

        let Some(bytes) = read_capped(response, MAX_IMAGE_BYTES).await? else {
            tracing::debug!("Image {} skipped (over {} bytes)", url, MAX_IMAGE_BYTES);
            return Ok(None);
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        Ok(Some(to_data_uri(&content_type, &bytes)))
    }
}

/// Reads the body chunk by chunk, giving up as soon as it passes `limit`.
async fn read_capped(mut response: Response, limit: usize) -> Result<Option<Vec<u8>>> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Ok(None);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Some(body))
}

pub fn to_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

/// GitHub avatar URLs accept an `s` size parameter.
fn sized_avatar_url(url: &str) -> String {
    let separator = if url.contains('?') { "&" } else { "?" };
    format!("{}{}s={}", url, separator, AVATAR_SIZE_PX)
}

/// Card art location for a theme type, e.g. `{base}/metal.png`.
pub fn card_art_url(base_url: &str, type_label: &str) -> String {
    format!(
        "{}/{}.png",
        base_url.trim_end_matches('/'),
        type_label.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri() {
        assert_eq!(to_data_uri("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_sized_avatar_url() {
        assert_eq!(
            sized_avatar_url("https://avatars.githubusercontent.com/u/1?v=4"),
            "https://avatars.githubusercontent.com/u/1?v=4&s=160"
        );
        assert_eq!(sized_avatar_url("https://x/a"), "https://x/a?s=160");
    }

    #[test]
    fn test_card_art_url() {
        assert_eq!(card_art_url("https://cdn/art/", "Metal"), "https://cdn/art/metal.png");
    }

    #[tokio::test]
    async fn test_unreachable_image_is_unavailable() {
        let fetcher = ImageFetcher::new(Duration::from_millis(200)).unwrap();
        let images = fetcher
            .fetch_embedded_images(Some("http://127.0.0.1:9/avatar.png"), None)
            .await;
        assert_eq!(images, EmbeddedImages::default());
    }

    #[tokio::test]
    async fn test_oversized_images_are_unavailable() {
        use std::io::Write;

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/large.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(vec![0u8; MAX_IMAGE_BYTES + 1])
            .create_async()
            .await;
        server
            .mock("GET", "/streamed.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_chunked_body(|w| {
                let chunk = [0u8; 64 * 1024];
                for _ in 0..20 {
                    w.write_all(&chunk)?;
                }
                Ok(())
            })
            .create_async()
            .await;
        server
            .mock("GET", "/small.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(b"abc")
            .create_async()
            .await;

        let fetcher = ImageFetcher::new(Duration::from_secs(5)).unwrap();
        let url = |path: &str| format!("{}{}", server.url(), path);

        assert_eq!(fetcher.fetch(&url("/large.png")).await, ImageSlot::Unavailable);
        assert_eq!(fetcher.fetch(&url("/streamed.png")).await, ImageSlot::Unavailable);
        assert_eq!(
            fetcher.fetch(&url("/small.png")).await,
            ImageSlot::Embedded("data:image/png;base64,YWJj".to_string())
        );
    }
}
