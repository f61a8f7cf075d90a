pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod taxonomy;
pub mod analysis;
pub mod render;
pub mod server;
pub mod text;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use analysis::{CardPipeline, CardSource, RenderedCard};
pub use server::{create_router, AppState};
