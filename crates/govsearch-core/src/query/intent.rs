//! Conversational query detection
//!
//! "What is the latest on infrastructure spending?" carries four filler
//! words for every useful one. Conversational queries are reduced to a
//! handful of content words before they reach lexical matching.

/// Query intent, from the shape of the opening words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    /// "What is X?" / "Tell me about X"
    Conversational,
    /// Keywords, identifiers, titles
    Lookup,
}

/// Openings that mark a conversational query
const CONVERSATIONAL_STEMS: &[&str] = &[
    "what is",
    "what are",
    "what's",
    "what does",
    "what do",
    "what did",
    "what was",
    "tell me about",
    "tell me",
    "explain",
    "how does",
    "how do",
    "how will",
    "how would",
    "who is",
    "who are",
    "who sponsored",
    "is there",
    "are there",
    "show me",
    "can you",
    "i want to know",
];

/// Filler words never kept as content words
const FILLER_WORDS: &[&str] = &[
    "about", "tell", "explain", "which", "where", "there", "their", "these", "those", "would",
    "could", "should", "please", "anything", "something", "information", "happening",
    "going", "doing", "currently", "latest", "recent", "recently", "today", "right", "really",
    "think", "know", "being", "other", "sponsored",
];

/// Most content words kept from a conversational query
pub const MAX_CONTENT_WORDS: usize = 4;

/// Content words are strictly longer than this
pub const MIN_CONTENT_WORD_LEN: usize = 4;

/// Classify a lowercased query
pub fn classify_intent(lower: &str) -> QueryIntent {
    let trimmed = lower.trim_start();
    let conversational = CONVERSATIONAL_STEMS.iter().any(|stem| {
        trimmed.starts_with(stem)
            && trimmed[stem.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric())
    });

    if conversational {
        QueryIntent::Conversational
    } else {
        QueryIntent::Lookup
    }
}

/// Whether a lowercased query opens with a conversational stem
pub fn is_conversational(lower: &str) -> bool {
    classify_intent(lower) == QueryIntent::Conversational
}

/// Up to [`MAX_CONTENT_WORDS`] distinct content words, in query order
pub fn content_words(lower: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();

    for raw in lower.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if word.chars().count() <= MIN_CONTENT_WORD_LEN || FILLER_WORDS.contains(&word) {
            continue;
        }
        if !words.iter().any(|w| w == word) {
            words.push(word.to_string());
        }
        if words.len() == MAX_CONTENT_WORDS {
            break;
        }
    }

    words
}
