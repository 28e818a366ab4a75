//! Common helper functions for output formatting.

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;

/// Truncates an ID to 8 characters for display.
pub fn truncate_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a peso amount, `-` for zero.
pub fn format_amount(amount: u64) -> String {
    if amount == 0 {
        "-".to_string()
    } else {
        format!("₱{amount}")
    }
}

/// Formats a yes/no status in green or dimmed.
pub fn format_flag(value: bool, yes: &str, no: &str, use_colors: bool) -> String {
    match (value, use_colors) {
        (true, true) => yes.green().to_string(),
        (false, true) => no.dimmed().to_string(),
        (true, false) => yes.to_string(),
        (false, false) => no.to_string(),
    }
}

/// Formats a creation time in local time, empty when unknown.
pub fn format_created_at(created_at: Option<&DateTime<Utc>>) -> String {
    created_at
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Pads a possibly colored cell to `width` visible characters.
pub fn pad(cell: &str, visible: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_id() {
        assert_eq!(truncate_id("0f8a7c2e-1111"), "0f8a7c2e");
        assert_eq!(truncate_id("42"), "42");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("Malacañang Palace", 10), "Malacañ...");
        assert_eq!(truncate_str("Main", 10), "Main");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "-");
        assert_eq!(format_amount(240), "₱240");
    }

    #[test]
    fn test_format_flag_plain() {
        assert_eq!(format_flag(true, "paid", "unpaid", false), "paid");
        assert_eq!(format_flag(false, "paid", "unpaid", false), "unpaid");
    }

    #[test]
    fn test_pad_uses_visible_width() {
        let colored = "paid".green().to_string();
        let padded = pad(&colored, "paid", 8);
        assert!(padded.ends_with("    "));
        assert_eq!(pad("ab", "ab", 1), "ab");
    }

    #[test]
    fn test_format_created_at_none() {
        assert_eq!(format_created_at(None), "");
    }
}
