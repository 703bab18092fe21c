//! Query preprocessing
//!
//! Raw query → [`ProcessedQuery`]. Never fails: the worst case is a
//! processed text equal to the lowercased input.

use serde::Serialize;

use super::identifiers::extract_identifiers;
use super::intent::{content_words, is_conversational};
use super::names::extract_name_candidates;

// ============================================================================
// STATIC TABLES
// ============================================================================

/// Whole-token abbreviation expansions
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("eo", "executive order"),
    ("hr", "house resolution"),
    ("sr", "senate resolution"),
    ("va", "veterans affairs"),
];

/// Nouns too common in this corpus to help lexical matching
pub const GENERIC_LEGISLATIVE_NOUNS: &[&str] = &["bill", "act", "resolution", "order", "legislation"];

/// Phrases whose generic nouns are kept
pub const DEFAULT_PHRASE_ALLOW_LIST: &[&str] = &[
    "big beautiful bill",
    "one big beautiful",
    "jobs act",
    "infrastructure investment",
    "executive order",
    "house resolution",
    "senate resolution",
];

// ============================================================================
// PROCESSED QUERY
// ============================================================================

/// A query decomposed for the three strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedQuery {
    /// Input with whitespace collapsed, original casing kept
    pub original: String,
    /// Normalized matching text (lowercase, expanded, denoised)
    pub text: String,
    /// Canonical identifiers such as "HR-3684"
    pub identifiers: Vec<String>,
    /// Possible sponsor names in original casing
    pub name_candidates: Vec<String>,
    /// Query opened with a conversational stem
    pub conversational: bool,
}

impl ProcessedQuery {
    /// Whitespace tokens of the normalized text
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    /// Whether the metadata strategy has anything to look for
    pub fn has_structured_hints(&self) -> bool {
        !self.identifiers.is_empty() || !self.name_candidates.is_empty()
    }
}

// ============================================================================
// PREPROCESSOR
// ============================================================================

/// Normalizes raw queries
#[derive(Debug, Clone)]
pub struct QueryPreprocessor {
    abbreviations: Vec<(String, String)>,
    phrase_allow_list: Vec<Vec<String>>,
}

impl Default for QueryPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryPreprocessor {
    /// Preprocessor with the default abbreviation table and allow-list
    pub fn new() -> Self {
        Self::with_tables(
            DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
            DEFAULT_PHRASE_ALLOW_LIST.iter().map(|p| p.to_string()),
        )
    }

    /// Preprocessor with custom tables
    pub fn with_tables(
        abbreviations: impl IntoIterator<Item = (String, String)>,
        phrase_allow_list: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            abbreviations: abbreviations
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
                .collect(),
            phrase_allow_list: phrase_allow_list
                .into_iter()
                .map(|p| p.to_lowercase().split_whitespace().map(str::to_string).collect())
                .filter(|p: &Vec<String>| !p.is_empty())
                .collect(),
        }
    }

    /// Decompose a raw query
    pub fn process(&self, raw: &str) -> ProcessedQuery {
        let original = collapse_whitespace(raw);
        let identifiers = extract_identifiers(&original);
        let name_candidates = extract_name_candidates(&original);

        let lower = original.to_lowercase();
        let mut tokens: Vec<String> = lower
            .split_whitespace()
            .map(clean_token)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        tokens = self.expand_abbreviations(tokens);

        let conversational = is_conversational(&lower);
        if conversational {
            let words = content_words(&tokens.join(" "));
            if !words.is_empty() {
                tokens = words;
            }
        }

        tokens = self.remove_generic_nouns(tokens);

        let text = if tokens.is_empty() {
            lower
        } else {
            tokens.join(" ")
        };

        tracing::debug!(
            original = %original,
            processed = %text,
            identifiers = ?identifiers,
            names = ?name_candidates,
            conversational,
            "query preprocessed"
        );

        ProcessedQuery {
            original,
            text,
            identifiers,
            name_candidates,
            conversational,
        }
    }

    /// Replace tokens that are exactly an abbreviation
    ///
    /// Only whole tokens are expanded, so "hr-3684" stays as typed.
    fn expand_abbreviations(&self, tokens: Vec<String>) -> Vec<String> {
        let mut expanded = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.abbreviations.iter().find(|(short, _)| *short == token) {
                Some((_, long)) => expanded.extend(long.split_whitespace().map(str::to_string)),
                None => expanded.push(token),
            }
        }
        expanded
    }

    /// Drop generic legislative nouns outside allow-listed phrases
    ///
    /// If every token would be dropped, the tokens are returned unchanged.
    fn remove_generic_nouns(&self, tokens: Vec<String>) -> Vec<String> {
        let mut protected = vec![false; tokens.len()];
        for phrase in &self.phrase_allow_list {
            if phrase.len() > tokens.len() {
                continue;
            }
            for start in 0..=(tokens.len() - phrase.len()) {
                if tokens[start..start + phrase.len()] == phrase[..] {
                    protected[start..start + phrase.len()].fill(true);
                }
            }
        }

        let kept: Vec<String> = tokens
            .iter()
            .zip(&protected)
            .filter(|(token, keep)| **keep || !GENERIC_LEGISLATIVE_NOUNS.contains(&token.as_str()))
            .map(|(token, _)| token.clone())
            .collect();

        if kept.is_empty() { tokens } else { kept }
    }
}

/// Collapse runs of whitespace to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip leading/trailing punctuation, keeping inner hyphens and dots
fn clean_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

// ============================================================================
// TESTS
// ============================================================================
