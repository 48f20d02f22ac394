//! Local fallbacks used when the remote call cannot produce a result.

use std::collections::HashMap;

/// Returned by `summarize` when there are no messages at all.
pub(crate) const EMPTY_SUMMARY: &str = "No content to summarize.";

/// Returned by `summarize` when the model replies with an empty string.
pub(crate) const TOO_BRIEF_SUMMARY: &str = "Conversation too brief to summarize.";

/// Returned by `extract_topics` when the model reply parses to nothing.
pub(crate) const GENERIC_TOPIC: &str = "general discussion";

/// Common words excluded from the frequency heuristic. Words of three
/// characters or fewer are dropped before this list is consulted.
const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "also", "been", "before", "being", "both",
    "could", "does", "doing", "down", "each", "from", "have", "having",
    "here", "into", "just", "like", "make", "many", "more", "most", "much",
    "need", "only", "other", "over", "really", "same", "should", "some",
    "such", "than", "that", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "under", "until", "very", "want",
    "well", "were", "what", "when", "where", "which", "while", "will",
    "with", "would", "your",
];

/// Word-frequency topic extraction.
///
/// Lowercases and splits the text, drops stop words and short words, and
/// returns the most frequent remainder. Ties break alphabetically so the
/// result is deterministic.
pub(crate) fn keyword_topics(text: &str, max_keywords: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for word in lowered.split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if word.len() <= 3 || STOP_WORDS.contains(&word) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(max_keywords)
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Generic placeholder topics for unexpected failures.
pub(crate) fn placeholder_topics(max_keywords: usize) -> Vec<String> {
    ["conversation", "chat"]
        .iter()
        .take(max_keywords)
        .map(|s| s.to_string())
        .collect()
}

/// Templated summary used when the remote call cannot produce one.
pub(crate) fn count_summary(message_count: usize, word_count: usize) -> String {
    format!(
        "Chat conversation with {} messages and approximately {} words.",
        message_count, word_count
    )
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
