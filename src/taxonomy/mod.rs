pub mod languages;
pub mod themes;

pub use languages::{is_markup, language_color, reclassify};
pub use themes::{get_language_theme, LanguageCardTheme, DEFAULT_THEME};
