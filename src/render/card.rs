//! Trading-card SVG. Every card is a fixed 350×490 canvas.

use crate::models::{Attack, PokemonCardData, REPO_DESCRIPTION_MAX_CHARS};
use crate::render::images::{EmbeddedImages, ImageSlot};
use crate::render::svg::{clamp_icons, escape_xml, icon_row, pill, sanitize, wrap_two_lines};
use crate::taxonomy::LanguageCardTheme;
use crate::text::truncate;

pub const CARD_WIDTH: u32 = 350;
pub const CARD_HEIGHT: u32 = 490;

/// Ability descriptions longer than this wrap onto a second line.
pub const ABILITY_WRAP_CHARS: usize = 45;
/// Vertical shift applied below the ability when it wraps.
pub const ABILITY_WRAP_OFFSET: u32 = 12;
const BIO_LINE_CHARS: usize = 52;

const ART_X: u32 = 24;
const ART_Y: u32 = 44;
const ART_WIDTH: u32 = 302;
const ART_HEIGHT: u32 = 150;
const AVATAR_RADIUS: u32 = 46;

const ABILITY_Y: u32 = 236;
const ATTACKS_Y: u32 = 282;
const ATTACK_ROW_HEIGHT: u32 = 46;

pub fn render_card_svg(
    data: &PokemonCardData,
    theme: &LanguageCardTheme,
    weakness_theme: &LanguageCardTheme,
    resistance_theme: &LanguageCardTheme,
    images: &EmbeddedImages,
) -> String {
    let mut svg = String::with_capacity(8 * 1024);

    svg.push_str(&format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{label}">"##,
        w = CARD_WIDTH,
        h = CARD_HEIGHT,
        label = sanitize(&format!("{} trading card", data.username)),
    ));
    svg.push_str(&defs(theme));
    svg.push_str(&frame(theme));
    svg.push_str(&header(data, theme));
    svg.push_str(&art_window(data, theme, images));
    svg.push_str(&info_strip(data, theme));

    let (ability, offset) = ability_block(data);
    svg.push_str(&ability);

    for (slot, attack) in data.attacks.iter().enumerate() {
        let y = ATTACKS_Y + offset + slot as u32 * ATTACK_ROW_HEIGHT;
        svg.push_str(&attack_row(attack, theme, y));
    }

    svg.push_str(&battle_row(data, weakness_theme, resistance_theme, offset));
    svg.push_str(&footer(data, offset));
    svg.push_str("</svg>");
    svg
}

/// Fixed card shown when the user cannot be loaded.
pub fn render_error_card(username: &str, message: &str) -> String {
    let username = truncate(username, 28);
    let message = truncate(message, 48);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="Card unavailable">
<rect x="5" y="5" width="340" height="480" rx="18" fill="#f3f4f6" stroke="#9ca3af" stroke-width="10"/>
<text x="24" y="34" font-family="Helvetica, Arial, sans-serif" font-size="17" font-weight="700" fill="#374151">MissingNo.</text>
<text x="326" y="34" font-family="Helvetica, Arial, sans-serif" font-size="13" font-weight="700" fill="#b91c1c" text-anchor="end">0 HP</text>
<rect x="24" y="44" width="302" height="150" rx="6" fill="#e5e7eb" stroke="#9ca3af"/>
<text x="175" y="134" font-size="56" text-anchor="middle">?</text>
<text x="175" y="240" font-family="Helvetica, Arial, sans-serif" font-size="16" font-weight="700" fill="#374151" text-anchor="middle">Trainer not found</text>
<text x="175" y="264" font-family="Helvetica, Arial, sans-serif" font-size="12" fill="#4b5563" text-anchor="middle">@{username}</text>
<text x="175" y="290" font-family="Helvetica, Arial, sans-serif" font-size="10" fill="#6b7280" text-anchor="middle">{message}</text>
<text x="175" y="470" font-family="Helvetica, Arial, sans-serif" font-size="8" fill="#9ca3af" text-anchor="middle">gitcard</text>
</svg>"##,
        w = CARD_WIDTH,
        h = CARD_HEIGHT,
        username = sanitize(&username),
        message = sanitize(&message),
    )
}

fn defs(theme: &LanguageCardTheme) -> String {
    format!(
        r##"<defs><linearGradient id="card-bg" x1="0" y1="0" x2="0" y2="1"><stop offset="0%" stop-color="{bg}"/><stop offset="100%" stop-color="#ffffff"/></linearGradient><linearGradient id="art-bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0%" stop-color="{accent}"/><stop offset="100%" stop-color="{border}"/></linearGradient><clipPath id="avatar-clip"><circle cx="{cx}" cy="{cy}" r="{r}"/></clipPath><clipPath id="art-clip"><rect x="{ax}" y="{ay}" width="{aw}" height="{ah}" rx="6"/></clipPath></defs>"##,
        bg = theme.background_color,
        accent = theme.accent_color,
        border = theme.border_color,
        cx = ART_X + ART_WIDTH / 2,
        cy = ART_Y + ART_HEIGHT / 2,
        r = AVATAR_RADIUS,
        ax = ART_X,
        ay = ART_Y,
        aw = ART_WIDTH,
        ah = ART_HEIGHT,
    )
}

fn frame(theme: &LanguageCardTheme) -> String {
    format!(
        r##"<rect x="5" y="5" width="340" height="480" rx="18" fill="url(#card-bg)" stroke="{}" stroke-width="10"/>"##,
        theme.border_color
    )
}

fn header(data: &PokemonCardData, theme: &LanguageCardTheme) -> String {
    let (stage_pill, stage_width) =
        pill(18, 16, data.evolution_stage.label(), "#374151", "#ffffff");
    let name_x = 18 + stage_width + 8;

    format!(
        r##"{stage_pill}<text x="{name_x}" y="29" font-family="Helvetica, Arial, sans-serif" font-size="16" font-weight="700" fill="#111827">{name}</text><text x="306" y="29" font-family="Helvetica, Arial, sans-serif" font-size="14" font-weight="700" fill="#b91c1c" text-anchor="end">{hp} HP</text><circle cx="320" cy="24" r="9" fill="{accent}"/><text x="320" y="28" font-size="11" text-anchor="middle">{emoji}</text>"##,
        name = sanitize(&data.display_name),
        hp = data.hp,
        accent = theme.accent_color,
        emoji = theme.emoji,
    )
}

fn art_window(
    data: &PokemonCardData,
    theme: &LanguageCardTheme,
    images: &EmbeddedImages,
) -> String {
    let cx = ART_X + ART_WIDTH / 2;
    let cy = ART_Y + ART_HEIGHT / 2;

    let background = match &images.card_art {
        ImageSlot::Embedded(uri) => format!(
            r##"<image href="{uri}" x="{ART_X}" y="{ART_Y}" width="{ART_WIDTH}" height="{ART_HEIGHT}" preserveAspectRatio="xMidYMid slice" clip-path="url(#art-clip)"/>"##,
            uri = escape_xml(uri),
        ),
        ImageSlot::Unavailable => format!(
            r##"<rect x="{ART_X}" y="{ART_Y}" width="{ART_WIDTH}" height="{ART_HEIGHT}" rx="6" fill="url(#art-bg)"/><text x="{ex}" y="{ey}" font-size="22" text-anchor="end" opacity="0.7">{emoji}</text>"##,
            ex = ART_X + ART_WIDTH - 10,
            ey = ART_Y + 28,
            emoji = theme.emoji,
        ),
    };

    let avatar = match &images.avatar {
        ImageSlot::Embedded(uri) => format!(
            r##"<image href="{uri}" x="{x}" y="{y}" width="{d}" height="{d}" clip-path="url(#avatar-clip)"/>"##,
            x = cx - AVATAR_RADIUS,
            y = cy - AVATAR_RADIUS,
            d = AVATAR_RADIUS * 2,
            uri = escape_xml(uri),
        ),
        ImageSlot::Unavailable => avatar_placeholder(&data.username, theme, cx, cy, AVATAR_RADIUS),
    };

    format!(
        r##"{background}{avatar}<circle cx="{cx}" cy="{cy}" r="{AVATAR_RADIUS}" fill="none" stroke="#ffffff" stroke-width="3"/><rect x="{ART_X}" y="{ART_Y}" width="{ART_WIDTH}" height="{ART_HEIGHT}" rx="6" fill="none" stroke="{border}" stroke-width="2"/>"##,
        border = theme.border_color,
    )
}

/// Colored circle with the username's first letter.
pub fn avatar_placeholder(
    username: &str,
    theme: &LanguageCardTheme,
    cx: u32,
    cy: u32,
    r: u32,
) -> String {
    let initial = username
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string());

    format!(
        r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}"/><text x="{cx}" y="{ty}" font-family="Helvetica, Arial, sans-serif" font-size="{fs}" font-weight="700" fill="#ffffff" text-anchor="middle">{initial}</text>"##,
        fill = theme.border_color,
        ty = cy + r * 2 / 5,
        fs = r,
        initial = sanitize(&initial),
    )
}

fn info_strip(data: &PokemonCardData, theme: &LanguageCardTheme) -> String {
    let mut info = format!(
        "{} type. {} yrs on GitHub. {} languages.",
        theme.type_label, data.account_age_years, data.language_count
    );
    if !data.location.is_empty() {
        info.push_str(&format!(" {}", data.location));
    }

    format!(
        r##"<rect x="40" y="198" width="270" height="14" rx="3" fill="{accent}" opacity="0.35"/><text x="175" y="208" font-family="Helvetica, Arial, sans-serif" font-size="8" font-style="italic" fill="#374151" text-anchor="middle">{info}</text>{icons}"##,
        accent = theme.accent_color,
        info = sanitize(&truncate(&info, 70)),
        icons = icon_row(24, 222, data.language_count as u32, theme.accent_color, 12),
    )
}

/// Returns the ability markup and the offset rows below it must shift by.
fn ability_block(data: &PokemonCardData) -> (String, u32) {
    let (label, label_width) = pill(24, ABILITY_Y, "Ability", "#b91c1c", "#ffffff");
    let (first, second) = wrap_two_lines(&data.ability.description, ABILITY_WRAP_CHARS);
    let wrapped = data.ability.description.chars().count() > ABILITY_WRAP_CHARS;

    let mut markup = format!(
        r##"{label}<text x="{nx}" y="{ny}" font-family="Helvetica, Arial, sans-serif" font-size="13" font-weight="700" fill="#b91c1c">{name}</text><text x="24" y="{d1}" font-family="Helvetica, Arial, sans-serif" font-size="9" fill="#1f2937">{first}</text>"##,
        nx = 24 + label_width + 8,
        ny = ABILITY_Y + 12,
        name = sanitize(&data.ability.name),
        d1 = ABILITY_Y + 30,
        first = sanitize(&first),
    );

    if let Some(second) = second {
        markup.push_str(&format!(
            r##"<text x="24" y="{}" font-family="Helvetica, Arial, sans-serif" font-size="9" fill="#1f2937">{}</text>"##,
            ABILITY_Y + 30 + ABILITY_WRAP_OFFSET,
            sanitize(&second),
        ));
    }

    let offset = if wrapped { ABILITY_WRAP_OFFSET } else { 0 };
    (markup, offset)
}

fn attack_row(attack: &Attack, theme: &LanguageCardTheme, y: u32) -> String {
    let icons = clamp_icons(attack.energy_cost);
    let name_x = 24 + icons * 12 + 6;

    format!(
        r##"{icons_markup}<text x="{name_x}" y="{ny}" font-family="Helvetica, Arial, sans-serif" font-size="13" font-weight="700" fill="#111827">{name}</text><text x="326" y="{ny}" font-family="Helvetica, Arial, sans-serif" font-size="15" font-weight="700" fill="#111827" text-anchor="end">{damage}</text><text x="24" y="{dy}" font-family="Helvetica, Arial, sans-serif" font-size="9" fill="#4b5563">{description}</text><line x1="24" y1="{ly}" x2="326" y2="{ly}" stroke="#d1d5db" stroke-width="1"/>"##,
        icons_markup = icon_row(30, y + 8, icons, theme.accent_color, 12),
        ny = y + 12,
        name = sanitize(&attack.name),
        damage = attack.damage,
        dy = y + 27,
        description = sanitize(&truncate(&attack.description, REPO_DESCRIPTION_MAX_CHARS)),
        ly = y + ATTACK_ROW_HEIGHT - 8,
    )
}

fn battle_row(
    data: &PokemonCardData,
    weakness: &LanguageCardTheme,
    resistance: &LanguageCardTheme,
    offset: u32,
) -> String {
    let y = ATTACKS_Y + 2 * ATTACK_ROW_HEIGHT + offset + 8;

    format!(
        r##"<text x="24" y="{ly}" font-family="Helvetica, Arial, sans-serif" font-size="8" fill="#6b7280">weakness</text><text x="130" y="{ly}" font-family="Helvetica, Arial, sans-serif" font-size="8" fill="#6b7280">resistance</text><text x="236" y="{ly}" font-family="Helvetica, Arial, sans-serif" font-size="8" fill="#6b7280">retreat cost</text><text x="24" y="{vy}" font-size="11">{weak_emoji}</text><text x="40" y="{vy}" font-family="Helvetica, Arial, sans-serif" font-size="10" font-weight="700" fill="#111827">{weak_lang} ×2</text><text x="130" y="{vy}" font-size="11">{res_emoji}</text><text x="146" y="{vy}" font-family="Helvetica, Arial, sans-serif" font-size="10" font-weight="700" fill="#111827">{res_lang} -20</text>{retreat}"##,
        ly = y,
        vy = y + 14,
        weak_emoji = weakness.emoji,
        weak_lang = sanitize(&truncate(&data.least_used_language, 12)),
        res_emoji = resistance.emoji,
        res_lang = sanitize(&truncate(&data.resistance_language, 12)),
        retreat = icon_row(241, y + 10, data.retreat_cost, "#9ca3af", 12),
    )
}

fn footer(data: &PokemonCardData, offset: u32) -> String {
    let y = ATTACKS_Y + 2 * ATTACK_ROW_HEIGHT + offset + 40;
    let mut markup = String::new();

    if !data.bio.is_empty() {
        let (first, second) = wrap_two_lines(&data.bio, BIO_LINE_CHARS);
        markup.push_str(&format!(
            r##"<rect x="24" y="{ry}" width="302" height="30" rx="4" fill="#ffffff" opacity="0.6"/><text x="30" y="{y1}" font-family="Helvetica, Arial, sans-serif" font-size="9" font-style="italic" fill="#374151">{first}</text>"##,
            ry = y - 10,
            y1 = y + 2,
            first = sanitize(&first),
        ));
        if let Some(second) = second {
            markup.push_str(&format!(
                r##"<text x="30" y="{}" font-family="Helvetica, Arial, sans-serif" font-size="9" font-style="italic" fill="#374151">{}</text>"##,
                y + 14,
                sanitize(&second),
            ));
        }
    }

    markup.push_str(&format!(
        r##"<text x="24" y="{sy}" font-family="Helvetica, Arial, sans-serif" font-size="9" fill="#374151">XP {xp} · Velocity {velocity}% · ★ {stars} · {followers} followers</text><text x="24" y="{fy}" font-family="Helvetica, Arial, sans-serif" font-size="8" fill="#6b7280">@{username}</text><text x="326" y="{fy}" font-family="Helvetica, Arial, sans-serif" font-size="8" fill="#6b7280" text-anchor="end">{zero} untouched repos</text>"##,
        sy = y + 36,
        fy = y + 52,
        xp = data.xp,
        velocity = data.velocity,
        stars = data.own_stars,
        followers = data.followers,
        username = sanitize(&data.username),
        zero = data.zero_star_repos,
    ));

    markup
}
