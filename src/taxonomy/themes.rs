use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCardTheme {
    pub border_color: &'static str,
    pub accent_color: &'static str,
    pub background_color: &'static str,
    pub emoji: &'static str,
    pub type_label: &'static str,
}

const fn theme(
    border_color: &'static str,
    accent_color: &'static str,
    background_color: &'static str,
    emoji: &'static str,
    type_label: &'static str,
) -> LanguageCardTheme {
    LanguageCardTheme {
        border_color,
        accent_color,
        background_color,
        emoji,
        type_label,
    }
}

pub static DEFAULT_THEME: LanguageCardTheme =
    theme("#9ca3af", "#6b7280", "#f3f4f6", "⭐", "Colorless");

static THEMES: Lazy<HashMap<&'static str, LanguageCardTheme>> = Lazy::new(|| {
    [
        ("Rust", theme("#b7410e", "#dea584", "#fbeee6", "🦀", "Metal")),
        ("Python", theme("#3572a5", "#ffd43b", "#eef4fb", "🐍", "Psychic")),
        ("JavaScript", theme("#d4b106", "#f1e05a", "#fffbe6", "⚡", "Lightning")),
        ("TypeScript", theme("#235a97", "#3178c6", "#eaf1fb", "💎", "Water")),
        ("Go", theme("#007d9c", "#00add8", "#e6f7fb", "🐹", "Water")),
        ("Java", theme("#b07219", "#e76f00", "#fdf3e7", "☕", "Fire")),
        ("Kotlin", theme("#7f52ff", "#a97bff", "#f3eeff", "🔮", "Psychic")),
        ("C", theme("#555555", "#a8b9cc", "#f1f3f5", "⚙️", "Metal")),
        ("C++", theme("#00599c", "#f34b7d", "#eaf2f8", "🛠️", "Fighting")),
        ("C#", theme("#178600", "#68217a", "#eaf6e8", "🎯", "Grass")),
        ("Swift", theme("#f05138", "#ff8c69", "#fff0ec", "🐦", "Flying")),
        ("Ruby", theme("#701516", "#cc342d", "#fbeaea", "💎", "Fire")),
        ("PHP", theme("#4f5d95", "#8892bf", "#eff0f7", "🐘", "Normal")),
        ("Elixir", theme("#4e2a8e", "#6e4a7e", "#f2ecf7", "💧", "Poison")),
        ("Haskell", theme("#5e5086", "#8f4e8b", "#f1eef6", "λ", "Dragon")),
        ("Scala", theme("#c22d40", "#dc322f", "#fbecee", "🔺", "Fire")),
        ("Dart", theme("#0175c2", "#00b4ab", "#e6f4fb", "🎯", "Water")),
        ("Shell", theme("#4eaa25", "#89e051", "#eef8e9", "🐚", "Ground")),
        ("Lua", theme("#000080", "#2c2d72", "#e9e9f5", "🌙", "Dark")),
        ("R", theme("#198ce7", "#276dc3", "#e8f3fd", "📊", "Psychic")),
        ("Julia", theme("#9558b2", "#a270ba", "#f4eef8", "🔬", "Psychic")),
        ("Zig", theme("#ec915c", "#f7a41d", "#fdf2ea", "⚡", "Lightning")),
        ("HTML", theme("#e34c26", "#f06529", "#fdeee9", "🌐", "Fire")),
        ("CSS", theme("#563d7c", "#264de4", "#f0ecf6", "🎨", "Fairy")),
        ("Vue", theme("#41b883", "#35495e", "#ebf8f2", "🌿", "Grass")),
        ("Svelte", theme("#ff3e00", "#ff7a45", "#fff0ea", "🔥", "Fire")),
        ("Dockerfile", theme("#384d54", "#2496ed", "#ecf0f1", "🐳", "Water")),
        ("HCL", theme("#5c4ee5", "#844fba", "#efedfc", "🏗️", "Rock")),
        ("Nix", theme("#5277c3", "#7e7eff", "#edf1fa", "❄️", "Ice")),
        ("Solidity", theme("#363636", "#aa6746", "#f0eeec", "⛓️", "Steel")),
    ]
    .into_iter()
    .collect()
});

/// Looks up the card theme for `language`. Falls back to a case-insensitive
/// match and then to [`DEFAULT_THEME`].
pub fn get_language_theme(language: &str) -> &'static LanguageCardTheme {
    if let Some(theme) = THEMES.get(language) {
        return theme;
    }

    THEMES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(language))
        .map(|(_, theme)| theme)
        .unwrap_or(&DEFAULT_THEME)
}
