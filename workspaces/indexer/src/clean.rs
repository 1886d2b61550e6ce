use scraper::{Html, Selector};

/// Strips `script`/`style`/`noscript` subtrees and collapses what remains to
/// separator-joined visible text, mirroring the crawler's own extraction so
/// redelivered or hand-submitted payloads are cleaned the same way either
/// side of the queue produced them.
pub fn clean_text(text: &str) -> String {
    let fragment = Html::parse_fragment(text);
    let ignore_selector =
        Selector::parse("script, style, noscript").expect("static selector is valid");
    let all_selector = Selector::parse("*").expect("static selector is valid");

    let mut cleaned = String::new();

    for node in fragment.select(&all_selector) {
        if ignore_selector.matches(&node) {
            continue;
        }
        let piece = node.text().collect::<Vec<_>>().join(" ");
        let piece = piece.trim();
        if !piece.is_empty() {
            cleaned.push_str(piece);
            cleaned.push(' ');
        }
    }

    if cleaned.trim().is_empty() {
        // No element nodes at all (plain text fragment): fall back to the
        // fragment's own text content.
        return fragment
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
    }

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style() {
        let html = "<p>Hello</p><script>evil()</script><style>.x{}</style><p>World</p>";
        let cleaned = clean_text(html);
        assert!(cleaned.contains("Hello"));
        assert!(cleaned.contains("World"));
        assert!(!cleaned.contains("evil"));
    }

    #[test]
    fn passes_through_plain_text() {
        let cleaned = clean_text("just some   plain   text");
        assert_eq!(cleaned, "just some plain text");
    }
}
