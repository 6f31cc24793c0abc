//! Analysis skill: key-point extraction, theme identification, synthesis.
//!
//! Extraction only: every key point is a sentence taken from the supplied
//! text, never invented. Deeper interpretation is left to the analyst's
//! inference call.

const THEME_LEXICON: [&str; 10] = [
    "technology",
    "business",
    "research",
    "development",
    "innovation",
    "market",
    "policy",
    "energy",
    "health",
    "environment",
];

const SYNTHESIS_CAP: usize = 4000;

/// Extract up to `max_points` key sentences from the text, in order of
/// appearance. Sentences under four words are skipped as fragments.
pub fn extract_key_points(text: &str, max_points: usize) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= 4)
        .take(max_points)
        .collect()
}

/// Identify themes by lexicon match against the text. Falls back to
/// `general` when nothing matches.
pub fn identify_themes(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let themes: Vec<String> = THEME_LEXICON
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();

    if themes.is_empty() {
        vec!["general".to_string()]
    } else {
        themes
    }
}

/// Combine text from multiple sources into one capped block for prompting.
pub fn synthesize(sources: &[String]) -> String {
    if sources.is_empty() {
        return "No data to synthesize.".to_string();
    }

    let combined = sources.join("\n\n");
    let mut synthesis = format!("Combined information from {} sources:\n\n", sources.len());
    synthesis.push_str(truncate_at_boundary(&combined, SYNTHESIS_CAP));
    synthesis
}

/// Split text into trimmed sentences. Markdown heading markers are stripped
/// so headings do not masquerade as prose.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(|s| s.trim().trim_start_matches('#').trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Truncate at a char boundary at or below `cap` bytes.
pub fn truncate_at_boundary(text: &str, cap: usize) -> &str {
    if text.len() <= cap {
        return text;
    }
    let mut end = cap;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
