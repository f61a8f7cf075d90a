pub mod card_builder;
pub mod languages;
pub mod pipeline;
pub mod source;
pub mod stats;

pub use card_builder::{build_card_data, build_light_card_data};
pub use languages::calculate_language_stats;
pub use pipeline::CardPipeline;
pub use source::{CardSource, RenderedCard};
pub use stats::derive_stats;
