//! Follow-up query suggestions
//!
//! Title words from the best results plus the document categories on the
//! page. An empty page gets a fixed list of broad topics instead.

use super::fusion::FusedResult;
use crate::query::GENERIC_LEGISLATIVE_NOUNS;

/// Suggestions offered when nothing matched
pub const FALLBACK_SUGGESTIONS: &[&str] = &[
    "infrastructure spending",
    "healthcare reform",
    "defense authorization",
    "climate legislation",
    "tax reform",
];

/// Most suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

/// Most title words among the suggestions
const MAX_TITLE_WORDS: usize = 3;

/// Title words must be strictly longer than this
const MIN_TITLE_WORD_LEN: usize = 4;

/// Suggestions for a result page, in discovery order
pub fn generate_suggestions(results: &[FusedResult]) -> Vec<String> {
    if results.is_empty() {
        return FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }

    let mut suggestions: Vec<String> = Vec::new();

    'titles: for result in results.iter().take(3) {
        for raw in result.document.title.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if word.chars().count() <= MIN_TITLE_WORD_LEN
                || GENERIC_LEGISLATIVE_NOUNS.contains(&word.as_str())
                || suggestions.contains(&word)
            {
                continue;
            }
            suggestions.push(word);
            if suggestions.len() == MAX_TITLE_WORDS {
                break 'titles;
            }
        }
    }

    for result in results.iter().take(5) {
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
        if let Some(label) = result.document.document_type.category_label() {
            if !suggestions.iter().any(|s| s == label) {
                suggestions.push(label.to_string());
            }
        }
    }

    suggestions
}
