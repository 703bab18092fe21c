//! Structured identifier extraction
//!
//! Recognizes bill and order numbers in their many spellings ("H.R. 123",
//! "hr123", "HR-3684-117", "EO 14001", "executive order 14001") and
//! canonicalizes them to `PREFIX-NUMBER[-CONGRESS]`.

use regex::Regex;
use std::sync::LazyLock;

/// Longer prefixes come first so "hres" is not read as "hr".
static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \b
        (?P<prefix>
            h\.?\s?con\.?\s?res
          | s\.?\s?con\.?\s?res
          | h\.?\s?j\.?\s?res
          | s\.?\s?j\.?\s?res
          | h\.?\s?res
          | s\.?\s?res
          | h\.?\s?r
          | e\.?\s?o
          | executive\s+order
          | house\s+resolution
          | senate\s+bill
          | s
        )
        \.?\s*-?\s*
        (?P<number>\d{1,5})
        (?:-(?P<congress>\d{2,3}))?
        \b",
    )
    .expect("identifier pattern is valid")
});

/// True when `prefix` is the last letter of a dotted abbreviation such as
/// "U.S." rather than a Senate bill prefix
fn is_abbreviation_tail(text: &str, prefix: &regex::Match<'_>) -> bool {
    if prefix.as_str().len() != 1 {
        return false;
    }
    let mut before = text[..prefix.start()].chars().rev();
    matches!(
        (before.next(), before.next()),
        (Some('.'), Some(c)) if c.is_alphabetic()
    )
}

/// Map a matched prefix spelling to its canonical form
fn canonical_prefix(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_uppercase();

    match compact.as_str() {
        "EXECUTIVEORDER" => "EO".to_string(),
        "HOUSERESOLUTION" => "HR".to_string(),
        "SENATEBILL" => "S".to_string(),
        _ => compact,
    }
}

/// Extract canonical identifiers in order of first appearance
///
/// ```
/// use govsearch_core::query::extract_identifiers;
///
/// assert_eq!(extract_identifiers("what is H.R. 3684?"), vec!["HR-3684"]);
/// assert_eq!(extract_identifiers("eo14001 and S 5-118"), vec!["EO-14001", "S-5-118"]);
/// ```
pub fn extract_identifiers(text: &str) -> Vec<String> {
    let mut identifiers: Vec<String> = Vec::new();

    for caps in IDENTIFIER_PATTERN.captures_iter(text) {
        let (Some(prefix), Some(number)) = (caps.name("prefix"), caps.name("number")) else {
            continue;
        };
        if is_abbreviation_tail(text, &prefix) {
            continue;
        }

        let mut identifier = format!("{}-{}", canonical_prefix(prefix.as_str()), number.as_str());
        if let Some(congress) = caps.name("congress") {
            identifier.push('-');
            identifier.push_str(congress.as_str());
        }

        if !identifiers.contains(&identifier) {
            identifiers.push(identifier);
        }
    }

    identifiers
}
