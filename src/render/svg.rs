use crate::text::{normalize_dashes, truncate};

pub const MIN_PILL_WIDTH: u32 = 44;
const PILL_CHAR_WIDTH: u32 = 7;
const PILL_PADDING: u32 = 16;

/// Upper bound on icons drawn in a single row.
pub const MAX_ENERGY_ICONS: u32 = 14;

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Normalizes dashes and escapes `text` for embedding in SVG.
pub fn sanitize(text: &str) -> String {
    escape_xml(&normalize_dashes(text))
}

pub fn pill_width(label: &str) -> u32 {
    (label.chars().count() as u32 * PILL_CHAR_WIDTH + PILL_PADDING).max(MIN_PILL_WIDTH)
}

pub fn clamp_icons(count: u32) -> u32 {
    count.min(MAX_ENERGY_ICONS)
}

/// Splits `text` into at most two lines of `width` chars, breaking on
/// whitespace. The second line is truncated with an ellipsis if needed.
pub fn wrap_two_lines(text: &str, width: usize) -> (String, Option<String>) {
    let text = text.trim();
    if text.chars().count() <= width {
        return (text.to_string(), None);
    }

    let mut first = String::new();
    let mut words = text.split_whitespace().peekable();
    while let Some(word) = words.peek() {
        let needed = if first.is_empty() {
            word.chars().count()
        } else {
            first.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            break;
        }
        if !first.is_empty() {
            first.push(' ');
        }
        first.push_str(word);
        words.next();
    }
    let mut rest = words.collect::<Vec<_>>().join(" ");

    if first.is_empty() {
        // A single word longer than the line.
        let chars: Vec<char> = text.chars().collect();
        first = chars[..width].iter().collect();
        rest = chars[width..].iter().collect();
    }

    let rest = truncate(&rest, width);
    if rest.is_empty() {
        (first, None)
    } else {
        (first, Some(rest))
    }
}

/// Row of small circles, left to right from `x`.
pub fn icon_row(x: u32, y: u32, count: u32, fill: &str, step: u32) -> String {
    (0..clamp_icons(count))
        .map(|i| {
            format!(
                r##"<circle cx="{}" cy="{}" r="5" fill="{}" stroke="#ffffff" stroke-width="1"/>"##,
                x + i * step,
                y,
                fill
            )
        })
        .collect()
}

/// Rounded label pill; returns the markup and its width.
pub fn pill(x: u32, y: u32, label: &str, fill: &str, text_color: &str) -> (String, u32) {
    let width = pill_width(label);
    let markup = format!(
        r#"<rect x="{x}" y="{y}" width="{width}" height="16" rx="8" fill="{fill}"/><text x="{tx}" y="{ty}" font-size="9" font-weight="700" fill="{text_color}" text-anchor="middle">{label}</text>"#,
        tx = x + width / 2,
        ty = y + 11,
        label = sanitize(label),
    );
    (markup, width)
}
