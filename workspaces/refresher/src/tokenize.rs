use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("static regex is valid"));

/// Builds `keyword -> set of urls` from `(url, content)` pairs, lower-casing
/// every 3+ letter word token. A URL is added once per unique token it
/// contains, regardless of repetition within the page.
pub fn build_inverted_index<'a>(
    pages: impl Iterator<Item = (&'a str, &'a str)>,
) -> HashMap<String, HashSet<String>> {
    let mut inverted: HashMap<String, HashSet<String>> = HashMap::new();

    for (url, content) in pages {
        let lower = content.to_lowercase();
        let words: HashSet<&str> = WORD_RE.find_iter(&lower).map(|m| m.as_str()).collect();

        for word in words {
            inverted
                .entry(word.to_string())
                .or_default()
                .insert(url.to_string());
        }
    }

    inverted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_urls_by_keyword() {
        let pages = vec![
            ("https://a.com", "the quick fox"),
            ("https://b.com", "the slow fox"),
        ];

        let index = build_inverted_index(pages.into_iter());

        assert_eq!(
            index.get("fox").unwrap().clone(),
            HashSet::from(["https://a.com".to_string(), "https://b.com".to_string()])
        );
        assert_eq!(
            index.get("the").unwrap().clone(),
            HashSet::from(["https://a.com".to_string(), "https://b.com".to_string()])
        );
        // "quick" and "slow" are page-specific.
        assert_eq!(index.get("quick").unwrap().len(), 1);
    }

    #[test]
    fn drops_short_words() {
        let pages = vec![("https://a.com", "a an it is ok yes")];
        let index = build_inverted_index(pages.into_iter());
        assert!(!index.contains_key("a"));
        assert!(!index.contains_key("an"));
        assert!(!index.contains_key("it"));
        assert!(!index.contains_key("is"));
        assert!(!index.contains_key("ok"));
        assert!(index.contains_key("yes"));
    }
}
