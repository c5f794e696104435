// Report output: plain-text reports, JSON/CSV exports, SVG charts and the
// coloured terminal summaries printed at the end of each run.

pub mod charts;
pub mod export;
pub mod report;
pub mod terminal;

/// The first `max_chars` characters of `text`, cut on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Like `truncate_chars`, with "..." appended when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let cut = truncate_chars(text, max_chars);
    if cut.len() < text.len() {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}

/// Comma-separated items, or "None" for an empty list.
pub fn format_list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("Québec fires", 3), "Qué");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_preview_marks_cut_text() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
    }

    #[test]
    fn test_format_list_empty_is_none() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(format_list(&empty), "None");
        assert_eq!(format_list(&["a", "b"]), "a, b");
    }
}
