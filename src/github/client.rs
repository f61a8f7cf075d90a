use reqwest::{header, Client, Response, StatusCode};

use crate::config::DEFAULT_GITHUB_API_URL;
use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::models::{GitHubUser, LanguageByteMap, Repository};

pub const REPOS_PER_PAGE: u32 = 100;

/// Revalidation hint sent with every API call.
const CACHE_HINT: &str = "max-age=3600";

pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_GITHUB_API_URL)
    }

    pub fn with_base_url(token: Option<&str>, base_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gitcard/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::info!("Fetching user: {}", username);

        let response = self.get(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(username.to_string()));
        }

        if let Some(reset_in) = rate_limit_reset(&response) {
            return Err(Error::RateLimited(reset_in));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch user {}: {} - {}",
                username, status, body
            )));
        }

        Ok(response.json().await?)
    }

    pub async fn get_user_repos(&self, username: &str, max_pages: u32) -> Result<Vec<Repository>> {
        let url = format!("{}/users/{}/repos?sort=updated", self.base_url, username);
        let paginator = Paginator::new(&self.client, CACHE_HINT);
        tracing::info!("Fetching repositories for: {}", username);
        paginator.fetch_pages(&url, REPOS_PER_PAGE, max_pages).await
    }

    /// Never fails: any error yields an empty map so one repository cannot
    /// abort aggregation for the rest.
    pub async fn get_repo_languages(&self, owner: &str, repo: &str) -> LanguageByteMap {
        match self.try_get_repo_languages(owner, repo).await {
            Ok(languages) => languages,
            Err(e) => {
                tracing::warn!("Language fetch failed for {}/{}: {}", owner, repo, e);
                LanguageByteMap::new()
            }
        }
    }

    async fn try_get_repo_languages(&self, owner: &str, repo: &str) -> Result<LanguageByteMap> {
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);
        tracing::debug!("Fetching languages for: {}/{}", owner, repo);

        let response = self.get(&url).await?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "languages returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn get(&self, url: &str) -> Result<Response> {
        Ok(self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, CACHE_HINT)
            .send()
            .await?)
    }
}

/// Seconds until the quota resets when the response is a primary rate-limit
/// rejection.
fn rate_limit_reset(response: &Response) -> Option<u64> {
    let status = response.status();
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }

    let headers = response.headers();
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if remaining != Some(0) {
        return None;
    }

    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    let now = chrono::Utc::now().timestamp();
    Some((reset - now).max(0) as u64)
}
