use crate::models::PokemonCardData;
use crate::render::card::avatar_placeholder;
use crate::render::svg::{pill, sanitize};
use crate::taxonomy::LanguageCardTheme;
use crate::text::truncate;

pub const BADGE_WIDTH: u32 = 320;
pub const BADGE_HEIGHT: u32 = 80;
pub const ERROR_BADGE_WIDTH: u32 = 200;
pub const ERROR_BADGE_HEIGHT: u32 = 40;

/// Compact 320×80 profile badge.
pub fn render_badge_svg(data: &PokemonCardData, theme: &LanguageCardTheme) -> String {
    let (stage_pill, stage_width) = pill(76, 42, data.evolution_stage.label(), "#374151", "#ffffff");
    let language_label = format!("{} {}", theme.emoji, data.top_language);
    let (language_pill, _) = pill(76 + stage_width + 6, 42, &language_label, theme.accent_color, "#111827");

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{aria}">
<rect x="1" y="1" width="318" height="78" rx="10" fill="{bg}" stroke="{border}" stroke-width="2"/>
{avatar}
<text x="76" y="30" font-family="Helvetica, Arial, sans-serif" font-size="15" font-weight="700" fill="#111827">{name}</text>
<text x="306" y="30" font-family="Helvetica, Arial, sans-serif" font-size="12" font-weight="700" fill="#b91c1c" text-anchor="end">{hp} HP</text>
{stage_pill}{language_pill}
<text x="306" y="68" font-family="Helvetica, Arial, sans-serif" font-size="9" fill="#4b5563" text-anchor="end">★ {stars} · {repos} langs · XP {xp}</text>
</svg>"##,
        w = BADGE_WIDTH,
        h = BADGE_HEIGHT,
        aria = sanitize(&format!("{} badge", data.username)),
        bg = theme.background_color,
        border = theme.border_color,
        avatar = avatar_placeholder(&data.username, theme, 40, 40, 26),
        name = sanitize(&truncate(&data.display_name, 22)),
        hp = data.hp,
        stars = data.own_stars,
        repos = data.language_count,
        xp = data.xp,
    )
}

/// 200×40 badge shown when the user cannot be loaded.
pub fn render_error_badge(message: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="Badge unavailable">
<rect x="0" y="0" width="{w}" height="{h}" rx="6" fill="#f3f4f6" stroke="#9ca3af"/>
<rect x="0" y="0" width="62" height="{h}" rx="6" fill="#6b7280"/>
<text x="31" y="24" font-family="Helvetica, Arial, sans-serif" font-size="11" font-weight="700" fill="#ffffff" text-anchor="middle">gitcard</text>
<text x="131" y="24" font-family="Helvetica, Arial, sans-serif" font-size="11" fill="#374151" text-anchor="middle">{message}</text>
</svg>"##,
        w = ERROR_BADGE_WIDTH,
        h = ERROR_BADGE_HEIGHT,
        message = sanitize(&truncate(message, 22)),
    )
}
