//! Bubble text: citation suffix, truncation and word wrap

/// Third line is shortened when longer than this many characters
const LAST_LINE_LIMIT: usize = 20;
const LAST_LINE_KEEP: usize = 17;

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// `text [n]`, cut back to `max_len` characters.
///
/// Long text is truncated (at a word boundary when one falls in the last 30%
/// of the room left), followed by `...` and the citation marker.
pub fn display_text(text: &str, citation: u32, max_len: usize) -> String {
    let suffix = format!(" [{citation}]");
    let full = format!("{text}{suffix}");
    if full.chars().count() <= max_len {
        return full;
    }

    let available = max_len.saturating_sub(suffix.chars().count() + 3);
    let mut truncated = take_chars(text, available);
    if let Some(space) = truncated.rfind(' ') {
        let space_chars = truncated[..space].chars().count();
        if space_chars as f64 > available as f64 * 0.7 {
            truncated = &truncated[..space];
        }
    }
    format!("{truncated}...{suffix}")
}

/// Greedy word wrap by measured width, capped at `max_lines`.
///
/// A single word wider than `max_width` gets a line of its own.
pub fn wrap_text<F>(text: &str, max_width: f64, max_lines: usize, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            if last.chars().count() > LAST_LINE_LIMIT {
                *last = format!("{}...", take_chars(last, LAST_LINE_KEEP));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_chars(width: f64) -> impl FnMut(&str) -> f64 {
        move |s: &str| s.chars().count() as f64 * width
    }

    #[test]
    fn test_short_text_keeps_citation() {
        assert_eq!(display_text("great job", 3, 85), "great job [3]");
    }

    #[test]
    fn test_long_text_truncates_at_word() {
        let text = "word ".repeat(30);
        let out = display_text(text.trim(), 12, 85);
        assert!(out.ends_with("... [12]"));
        assert!(out.chars().count() <= 85);
        // cut lands on a word boundary
        assert!(out.trim_end_matches("... [12]").ends_with("word"));
    }

    #[test]
    fn test_long_word_hard_cut() {
        let text = "x".repeat(200);
        let out = display_text(&text, 1, 85);
        // 85 - " [1]" - "..."
        assert_eq!(out, format!("{}... [1]", "x".repeat(78)));
    }

    #[test]
    fn test_wrap_by_width() {
        let lines = wrap_text("aa bb cc dd", 50.0, 3, by_chars(10.0));
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn test_wrap_long_word_alone() {
        let lines = wrap_text("supercalifragilistic ok", 50.0, 3, by_chars(10.0));
        assert_eq!(lines, vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn test_wrap_caps_lines_and_ellipsizes() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi omicron";
        let lines = wrap_text(text, 250.0, 3, by_chars(10.0));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "iota kappa lambda...");
        assert_eq!(lines[2].chars().count(), 20);
    }

    #[test]
    fn test_wrap_short_third_line_unchanged() {
        let lines = wrap_text("aaaa bbbb cccc dddd", 40.0, 3, by_chars(10.0));
        assert_eq!(lines, vec!["aaaa", "bbbb", "cccc"]);
    }
}
