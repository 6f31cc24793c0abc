//! Editing skill: readability metrics, structure and clarity review,
//! editing-report rendering.

use serde::{Deserialize, Serialize};

use crate::state::{Verdict, VerifiedClaim};

/// Readability metrics for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub total_words: usize,
    pub total_sentences: usize,
    pub avg_word_length: f64,
    pub avg_sentence_length: f64,
    /// `true` when average sentence length stays under 20 words.
    pub is_readable: bool,
}

/// One review finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Category: structure or clarity.
    pub kind: SuggestionKind,
    /// Where in the document the issue sits.
    pub location: String,
    /// What to do about it.
    pub advice: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Structure,
    Clarity,
}

const PASSIVE_INDICATORS: [&str; 4] = ["was", "were", "been", "being"];
const JARGON_WORDS: [&str; 4] = ["utilize", "leverage", "synergy", "paradigm"];

/// Compute readability metrics.
pub fn readability(text: &str) -> Readability {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();

    let avg_word_length = if words.is_empty() {
        0.0
    } else {
        words.iter().map(|w| w.len()).sum::<usize>() as f64 / words.len() as f64
    };
    let avg_sentence_length = if sentences == 0 {
        0.0
    } else {
        words.len() as f64 / sentences as f64
    };

    Readability {
        total_words: words.len(),
        total_sentences: sentences,
        avg_word_length,
        avg_sentence_length,
        is_readable: avg_sentence_length < 20.0,
    }
}

/// Review document structure: headings present, paragraphs not overlong.
pub fn structure_review(text: &str) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if !text.contains('#') {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Structure,
            location: "document".to_string(),
            advice: "Add section headings for better organization".to_string(),
        });
    }

    let long_paragraphs = text
        .split("\n\n")
        .filter(|p| p.split_whitespace().count() > 150)
        .count();
    if long_paragraphs > 0 {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Structure,
            location: "paragraphs".to_string(),
            advice: format!(
                "{long_paragraphs} paragraph(s) exceed 150 words; consider splitting them"
            ),
        });
    }

    suggestions
}

/// Review clarity: excessive passive voice, jargon.
pub fn clarity_review(text: &str) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let lowered = text.to_lowercase();
    let total_words = lowered.split_whitespace().count().max(1);

    let passive_count = lowered
        .split_whitespace()
        .filter(|w| PASSIVE_INDICATORS.contains(w))
        .count();
    if passive_count as f64 > total_words as f64 * 0.05 {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Clarity,
            location: "voice".to_string(),
            advice: "Prefer active voice; passive constructions dominate".to_string(),
        });
    }

    let found_jargon: Vec<&str> = JARGON_WORDS
        .iter()
        .copied()
        .filter(|w| lowered.contains(w))
        .collect();
    if !found_jargon.is_empty() {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Clarity,
            location: "word choice".to_string(),
            advice: format!("Simplify terms: {}", found_jargon.join(", ")),
        });
    }

    suggestions
}

/// Render the editing report: metrics, suggestions, and a flagged-claims
/// section listing every `unsupported` verdict from the fact check. Claims
/// are never silently weakened or removed; this section is the audit trail.
pub fn render_report(text: &str, claims: &[VerifiedClaim]) -> String {
    let metrics = readability(text);
    let suggestions: Vec<Suggestion> = structure_review(text)
        .into_iter()
        .chain(clarity_review(text))
        .collect();

    let mut report = "# Content Review Report\n\n".to_string();

    report.push_str("## Readability Metrics\n");
    report.push_str(&format!("- **Total words:** {}\n", metrics.total_words));
    report.push_str(&format!("- **Total sentences:** {}\n", metrics.total_sentences));
    report.push_str(&format!(
        "- **Avg sentence length:** {:.1} words\n",
        metrics.avg_sentence_length
    ));
    report.push_str(&format!(
        "- **Assessment:** {}\n",
        if metrics.is_readable { "Good" } else { "Needs improvement" }
    ));

    report.push_str("\n## Suggestions\n\n");
    if suggestions.is_empty() {
        report.push_str("No major issues found.\n");
    } else {
        for (i, s) in suggestions.iter().enumerate() {
            report.push_str(&format!("{}. ({}) {}\n", i + 1, s.location, s.advice));
        }
    }

    let unsupported: Vec<&VerifiedClaim> = claims
        .iter()
        .filter(|c| c.verdict == Verdict::Unsupported)
        .collect();
    if !unsupported.is_empty() {
        report.push_str("\n## Flagged Claims\n\n");
        report.push_str("The following claims were marked unsupported by the fact check and \
                         were revised or qualified rather than silently removed:\n\n");
        for claim in unsupported {
            report.push_str(&format!("- {}\n", claim.claim));
        }
    }

    report
}
