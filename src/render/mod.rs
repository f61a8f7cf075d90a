pub mod badge;
pub mod card;
pub mod images;
pub mod svg;

pub use badge::{render_badge_svg, render_error_badge};
pub use card::{render_card_svg, render_error_card};
pub use images::{EmbeddedImages, ImageFetcher, ImageSlot};
pub use svg::escape_xml;
