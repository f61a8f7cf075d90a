/// Suffix appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Cuts `text` to at most `max_chars` characters, ending in `...` when it had
/// to cut. Counts chars, not bytes.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut cut: String = text.chars().take(keep).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str(ELLIPSIS);
    cut
}

/// Replaces em and en dashes with a plain hyphen.
pub fn normalize_dashes(text: &str) -> String {
    text.replace(['\u{2014}', '\u{2013}'], "-")
}
