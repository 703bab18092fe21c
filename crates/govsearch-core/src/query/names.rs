//! Person-name candidate extraction
//!
//! Looks for runs of two or more capitalized words in the query as typed
//! ("bills from Bernie Sanders" → "Bernie Sanders"). Candidates feed the
//! metadata strategy's sponsor match.

/// Capitalized words that never start or continue a name
const NAME_STOPWORDS: &[&str] = &[
    "what", "who", "which", "when", "where", "why", "how", "tell", "show", "find", "list",
    "explain", "describe", "give", "me", "the", "a", "an", "of", "and", "or", "for", "on", "in",
    "is", "are", "did", "does", "do", "bill", "bills", "act", "acts", "resolution", "order",
    "orders", "legislation", "executive", "congress", "senate", "house", "president",
    "senator", "representative", "rep", "sen",
];

fn clean_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_name_word(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
        && token.chars().any(|c| c.is_lowercase())
        && !NAME_STOPWORDS.contains(&token.to_lowercase().as_str())
}

fn flush_run(run: &mut Vec<&str>, candidates: &mut Vec<String>) {
    if run.len() >= 2 {
        let candidate = run.join(" ");
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    run.clear();
}

/// Extract runs of 2+ consecutive capitalized words from the original text
///
/// All-caps tokens ("HR", "EO") are not names. Trailing commas and
/// semicolons end a run.
pub fn extract_name_candidates(text: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for raw in text.split_whitespace() {
        let token = clean_token(raw);
        if is_name_word(token) {
            run.push(token);
            if raw.ends_with([',', ';', ':']) {
                flush_run(&mut run, &mut candidates);
            }
        } else {
            flush_run(&mut run, &mut candidates);
        }
    }
    flush_run(&mut run, &mut candidates);

    candidates
}
