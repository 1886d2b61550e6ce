use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("static regex is valid"));

/// A small fixed English stopword list, dropped from both documents and the
/// query before scoring so common words cannot dominate the cosine score.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old",
    "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use",
    "with", "this", "that", "from", "have", "been", "were", "they", "what", "when", "which",
    "their", "about",
];

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn term_frequencies(tokens: &[String]) -> HashMap<String, f64> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    let total = tokens.len() as f64;
    if total > 0.0 {
        for v in counts.values_mut() {
            *v /= total;
        }
    }
    counts
}

fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let mut dot = 0.0;
    for (term, a_weight) in a {
        if let Some(b_weight) = b.get(term) {
            dot += a_weight * b_weight;
        }
    }

    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// One scored document, identified by whatever key the caller supplied
/// (a URL, in this crate's only caller).
pub struct ScoredDocument<'a> {
    pub key: &'a str,
    pub score: f64,
}

/// Scores `documents` (key, text) against `query` using TF-IDF-weighted
/// cosine similarity, keeping only scores above `0.05`, sorted descending,
/// capped at 20 results.
pub fn search<'a>(documents: &[(&'a str, &str)], query: &str) -> Vec<ScoredDocument<'a>> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() || documents.is_empty() {
        return Vec::new();
    }

    let doc_tokens: Vec<Vec<String>> = documents.iter().map(|(_, text)| tokenize(text)).collect();
    let doc_count = doc_tokens.len() as f64;

    let mut doc_freq: HashMap<&str, f64> = HashMap::new();
    for tokens in &doc_tokens {
        let unique: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
        for term in unique {
            *doc_freq.entry(term).or_insert(0.0) += 1.0;
        }
    }
    // include the query itself as a document when computing idf, per the corpus+query convention
    let query_unique: HashSet<&str> = query_tokens.iter().map(|t| t.as_str()).collect();
    for term in &query_unique {
        *doc_freq.entry(term).or_insert(0.0) += 1.0;
    }
    let total_docs = doc_count + 1.0;

    let idf = |term: &str| -> f64 {
        let df = doc_freq.get(term).copied().unwrap_or(0.0);
        ((total_docs + 1.0) / (df + 1.0)).ln() + 1.0
    };

    let tf_idf_vector = |tf: &HashMap<String, f64>| -> HashMap<String, f64> {
        tf.iter()
            .map(|(term, freq)| (term.clone(), freq * idf(term)))
            .collect()
    };

    let query_vector = tf_idf_vector(&term_frequencies(&query_tokens));

    let mut scored: Vec<ScoredDocument> = documents
        .iter()
        .zip(doc_tokens.iter())
        .filter_map(|((key, _), tokens)| {
            let doc_vector = tf_idf_vector(&term_frequencies(tokens));
            let score = cosine_similarity(&query_vector, &doc_vector);
            if score > 0.05 {
                Some(ScoredDocument { key, score })
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(20);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_closer_document_first() {
        let docs = vec![
            ("https://a.com", "rust programming language systems programming"),
            ("https://b.com", "a story about a cat and a dog"),
        ];

        let results = search(&docs, "rust programming");
        assert_eq!(results[0].key, "https://a.com");
    }

    #[test]
    fn empty_query_yields_no_results() {
        let docs = vec![("https://a.com", "rust programming")];
        assert!(search(&docs, "   ").is_empty());
    }

    #[test]
    fn caps_at_twenty_results() {
        let docs: Vec<(String, String)> = (0..30)
            .map(|i| (format!("https://site{i}.com"), "rust programming language".to_string()))
            .collect();
        let docs_ref: Vec<(&str, &str)> = docs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

        let results = search(&docs_ref, "rust programming");
        assert!(results.len() <= 20);
    }
}
