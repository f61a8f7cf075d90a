use async_trait::async_trait;

use crate::error::Result;
use crate::models::{PokemonCardData, UserStats};

/// SVG output plus whether the error variant was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub svg: String,
    pub is_error: bool,
}

impl RenderedCard {
    pub fn ok(svg: String) -> Self {
        Self { svg, is_error: false }
    }

    pub fn error(svg: String) -> Self {
        Self { svg, is_error: true }
    }
}

#[async_trait]
pub trait CardSource: Send + Sync {
    async fn card_data(&self, username: &str, full: bool) -> Result<PokemonCardData>;
    async fn user_stats(&self, username: &str) -> Result<UserStats>;
    /// Never fails; lookup errors come back as the error card.
    async fn render_card(&self, username: &str, full: bool) -> RenderedCard;
    async fn render_badge(&self, username: &str) -> RenderedCard;
}
