use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub struct Paginator<'a> {
    client: &'a Client,
    cache_hint: &'a str,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, cache_hint: &'a str) -> Self {
        Self { client, cache_hint }
    }

    /// Fetches pages until one comes back short or `max_pages` is reached.
    ///
    /// A failure on the first page is returned as an error. Later failures
    /// end pagination early and keep what was already collected.
    pub async fn fetch_pages<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
        max_pages: u32,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let separator = if base_url.contains('?') { "&" } else { "?" };
            let url = format!("{}{}per_page={}&page={}", base_url, separator, per_page, page);

            tracing::debug!("Fetching: {}", url);
            let items: Vec<T> = match self.fetch_page(&url).await {
                Ok(items) => items,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!("Stopping pagination at page {}: {}", page, e);
                    break;
                }
            };

            let items_count = items.len();
            all_items.extend(items);

            if items_count < per_page as usize || page >= max_pages {
                break;
            }

            page += 1;
        }

        Ok(all_items)
    }

    async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, self.cache_hint)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!("{} - {}", status, body)));
        }

        Ok(response.json().await?)
    }
}
