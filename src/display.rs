//! Text helpers shared by the table projections

/// First `max` characters of `text`
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// `text` cut to `max` characters followed by `...` when longer than `max`
pub fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", truncate(text, max))
    } else {
        text.to_string()
    }
}
