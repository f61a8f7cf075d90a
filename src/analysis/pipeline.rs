use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::analysis::card_builder::{build_card_data, build_light_card_data};
use crate::analysis::languages::calculate_language_stats;
use crate::analysis::source::{CardSource, RenderedCard};
use crate::analysis::stats::{derive_stats, select_language_repos};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::github::GitHubClient;
use crate::models::{LanguageByteMap, PokemonCardData, Repository, UserStats};
use crate::render::images::card_art_url;
use crate::render::{
    render_badge_svg, render_card_svg, render_error_badge, render_error_card, ImageFetcher,
};
use crate::taxonomy::get_language_theme;

/// Fetch → aggregate → derive → build → render.
pub struct CardPipeline {
    github: Arc<GitHubClient>,
    images: ImageFetcher,
    config: PipelineConfig,
}

impl CardPipeline {
    /// Fails with [`Error::Config`] when `concurrency_limit` is zero.
    pub fn new(github: GitHubClient, config: PipelineConfig) -> Result<Self> {
        if config.concurrency_limit == 0 {
            return Err(Error::Config("concurrency_limit must be at least 1".to_string()));
        }

        Ok(Self {
            github: Arc::new(github),
            images: ImageFetcher::new(config.image_timeout)?,
            config,
        })
    }

    pub async fn analyze_user(&self, username: &str) -> Result<UserStats> {
        tracing::info!("Fetching GitHub profile for: {}", username);
        let (user, repos) = tokio::join!(
            self.github.get_user(username),
            self.github.get_user_repos(username, self.config.max_repo_pages),
        );
        let user = user?;
        let repos = repos.unwrap_or_else(|e| {
            tracing::warn!("Repository list for {} unavailable: {}", username, e);
            Vec::new()
        });

        let language_maps = self.fetch_language_maps(&repos).await;
        tracing::info!(
            "Fetched languages for {} of {} repositories",
            language_maps.len(),
            repos.len()
        );

        let languages = calculate_language_stats(&language_maps);
        Ok(derive_stats(user, repos, languages, Utc::now()))
    }

    async fn fetch_language_maps(&self, repos: &[Repository]) -> Vec<LanguageByteMap> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit));

        let mut language_futures = Vec::new();

        for repo in select_language_repos(repos, self.config.max_language_repos) {
            let github = self.github.clone();
            let sem = semaphore.clone();
            let owner = repo.owner.login.clone();
            let name = repo.name.clone();

            language_futures.push(async move {
                let _permit = sem.acquire().await.ok()?;
                Some(github.get_repo_languages(&owner, &name).await)
            });
        }

        join_all(language_futures)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Card data from per-repository language breakdowns.
    pub async fn build_card(&self, username: &str) -> Result<PokemonCardData> {
        let stats = self.analyze_user(username).await?;
        Ok(build_card_data(&stats))
    }

    /// Card data from the user and a single page of repositories.
    pub async fn fetch_card_data(&self, username: &str) -> Result<PokemonCardData> {
        let (user, repos) = tokio::join!(
            self.github.get_user(username),
            self.github.get_user_repos(username, 1),
        );
        let user = user?;
        let repos = repos.unwrap_or_else(|e| {
            tracing::warn!("Repository list for {} unavailable: {}", username, e);
            Vec::new()
        });
        Ok(build_light_card_data(&user, &repos, Utc::now()))
    }

    async fn render_card_data(&self, data: &PokemonCardData) -> String {
        let theme = get_language_theme(&data.top_language);
        let art_url = self
            .config
            .card_art_base_url
            .as_deref()
            .map(|base| card_art_url(base, theme.type_label));
        let avatar_url = Some(data.avatar_url.as_str()).filter(|u| !u.is_empty());

        let images = self
            .images
            .fetch_embedded_images(avatar_url, art_url.as_deref())
            .await;

        render_card_svg(
            data,
            theme,
            get_language_theme(&data.least_used_language),
            get_language_theme(&data.resistance_language),
            &images,
        )
    }

    pub async fn render_card(&self, username: &str, full: bool) -> RenderedCard {
        let data = if full {
            self.build_card(username).await
        } else {
            self.fetch_card_data(username).await
        };

        match data {
            Ok(data) => RenderedCard::ok(self.render_card_data(&data).await),
            Err(e) => {
                tracing::warn!("Rendering error card for {}: {}", username, e);
                RenderedCard::error(render_error_card(username, &e.public_message()))
            }
        }
    }

    pub async fn render_badge(&self, username: &str) -> RenderedCard {
        match self.fetch_card_data(username).await {
            Ok(data) => {
                RenderedCard::ok(render_badge_svg(&data, get_language_theme(&data.top_language)))
            }
            Err(e) => {
                tracing::warn!("Rendering error badge for {}: {}", username, e);
                RenderedCard::error(render_error_badge(&e.public_message()))
            }
        }
    }
}

#[async_trait]
impl CardSource for CardPipeline {
    async fn card_data(&self, username: &str, full: bool) -> Result<PokemonCardData> {
        if full {
            self.build_card(username).await
        } else {
            self.fetch_card_data(username).await
        }
    }

    async fn user_stats(&self, username: &str) -> Result<UserStats> {
        self.analyze_user(username).await
    }

    async fn render_card(&self, username: &str, full: bool) -> RenderedCard {
        CardPipeline::render_card(self, username, full).await
    }

    async fn render_badge(&self, username: &str) -> RenderedCard {
        CardPipeline::render_badge(self, username).await
    }
}
