//! Query Preprocessing
//!
//! Turns a raw user query into a [`ProcessedQuery`]:
//! - normalized matching text for lexical and semantic search
//! - canonical identifiers ("HR-3684") for the metadata strategy
//! - sponsor name candidates ("Bernie Sanders")

mod identifiers;
mod intent;
mod names;
mod preprocess;

pub use identifiers::extract_identifiers;
pub use intent::{classify_intent, content_words, is_conversational, QueryIntent};
pub use names::extract_name_candidates;
pub use preprocess::{
    collapse_whitespace, ProcessedQuery, QueryPreprocessor, DEFAULT_ABBREVIATIONS,
    DEFAULT_PHRASE_ALLOW_LIST, GENERIC_LEGISLATIVE_NOUNS,
};
