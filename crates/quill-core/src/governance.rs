//! Governance hooks.
//!
//! The engine may invoke an optional [`GovernancePolicy`]: `validate_input`
//! before the pipeline starts (a veto stops the run with `InputRejected`),
//! and `check_safety` / `detect_bias` on the final article (findings are
//! reported as warnings, never retroactively failing a completed run). The
//! default implementation carries basic input hygiene and small lexicon
//! checks; anything deeper is a collaborator concern, not pipeline logic.

use serde::{Deserialize, Serialize};

use crate::state::Depth;

/// Outcome of a governance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceReport {
    /// Whether the checked input/content is acceptable.
    pub accepted: bool,
    /// Human-readable findings, empty when clean.
    pub diagnostics: Vec<String>,
}

impl GovernanceReport {
    /// A clean, accepting report.
    pub fn clean() -> Self {
        Self {
            accepted: true,
            diagnostics: Vec::new(),
        }
    }

    /// A rejecting report with the given findings.
    pub fn rejected(diagnostics: Vec<String>) -> Self {
        Self {
            accepted: false,
            diagnostics,
        }
    }
}

/// Pre- and post-run governance checks. All methods are synchronous pure
/// functions over their inputs.
pub trait GovernancePolicy: Send + Sync {
    /// Pre-hook: may veto the run before any stage executes.
    fn validate_input(&self, topic: &str, depth: Depth) -> GovernanceReport;

    /// Post-hook on `final_content`. A non-accepting report becomes a
    /// warning on the returned state.
    fn check_safety(&self, _text: &str) -> GovernanceReport {
        GovernanceReport::clean()
    }

    /// Post-hook on `final_content`. Findings become warnings.
    fn detect_bias(&self, _text: &str) -> GovernanceReport {
        GovernanceReport::clean()
    }
}

/// Basic hygiene: injection-looking input patterns, length caps, and small
/// lexicon checks over the final article.
#[derive(Debug, Default)]
pub struct BasicGovernance;

const MAX_TOPIC_LEN: usize = 500;

const PROHIBITED_PATTERNS: [&str; 6] = [
    "<script",
    "javascript:",
    "eval(",
    "exec(",
    "${",
    "<!--",
];

/// Content-safety lexicon: (category, term).
const SAFETY_LEXICON: [(&str, &str); 8] = [
    ("violence", "weapon"),
    ("violence", "bomb"),
    ("violence", "terrorist"),
    ("violence", "murder"),
    ("misinformation", "conspiracy"),
    ("misinformation", "cover-up"),
    ("overclaiming", "guaranteed profit"),
    ("overclaiming", "risk-free"),
];

/// Non-inclusive terms with suggested replacements.
const BIAS_LEXICON: [(&str, &str); 6] = [
    ("mankind", "humanity"),
    ("manpower", "workforce"),
    ("chairman", "chairperson"),
    ("salesman", "salesperson"),
    ("handicapped", "person with a disability"),
    ("wheelchair-bound", "wheelchair user"),
];

/// Whole-word match for single words, substring match for terms carrying
/// punctuation or spaces. `lowered` must already be lowercase.
fn mentions(lowered: &str, term: &str) -> bool {
    if term.chars().all(|c| c.is_alphanumeric()) {
        lowered
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == term)
    } else {
        lowered.contains(term)
    }
}

impl GovernancePolicy for BasicGovernance {
    fn validate_input(&self, topic: &str, _depth: Depth) -> GovernanceReport {
        let mut diagnostics = Vec::new();
        let lowered = topic.to_lowercase();

        if topic.len() > MAX_TOPIC_LEN {
            diagnostics.push(format!(
                "topic exceeds {MAX_TOPIC_LEN} characters ({})",
                topic.len()
            ));
        }
        for pattern in PROHIBITED_PATTERNS {
            if lowered.contains(pattern) {
                diagnostics.push(format!("topic contains prohibited pattern {pattern:?}"));
            }
        }

        if diagnostics.is_empty() {
            GovernanceReport::clean()
        } else {
            GovernanceReport::rejected(diagnostics)
        }
    }

    fn check_safety(&self, text: &str) -> GovernanceReport {
        let lowered = text.to_lowercase();
        let diagnostics: Vec<String> = SAFETY_LEXICON
            .iter()
            .filter(|(_, term)| mentions(&lowered, term))
            .map(|(category, term)| format!("{category} term {term:?} appears in the content"))
            .collect();

        if diagnostics.is_empty() {
            GovernanceReport::clean()
        } else {
            GovernanceReport::rejected(diagnostics)
        }
    }

    fn detect_bias(&self, text: &str) -> GovernanceReport {
        let lowered = text.to_lowercase();
        let diagnostics: Vec<String> = BIAS_LEXICON
            .iter()
            .filter(|(term, _)| mentions(&lowered, term))
            .map(|(term, replacement)| {
                format!("non-inclusive term {term:?}; consider {replacement:?}")
            })
            .collect();

        if diagnostics.is_empty() {
            GovernanceReport::clean()
        } else {
            GovernanceReport::rejected(diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_topics_pass() {
        let report = BasicGovernance.validate_input("Benefits of renewable energy", Depth::Medium);
        assert!(report.accepted);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn injection_patterns_are_vetoed() {
        let report = BasicGovernance.validate_input("<script>alert(1)</script>", Depth::Shallow);
        assert!(!report.accepted);
        assert!(!report.diagnostics.is_empty());
    }

    #[test]
    fn overlong_topics_are_vetoed() {
        let topic = "x".repeat(600);
        assert!(!BasicGovernance.validate_input(&topic, Depth::Deep).accepted);
    }

    #[test]
    fn safety_check_flags_lexicon_terms_as_whole_words() {
        let report = BasicGovernance.check_safety("The weapon of choice was cheap solar.");
        assert!(!report.accepted);
        assert!(report.diagnostics[0].contains("weapon"));

        // Substring hits inside longer words do not count.
        assert!(BasicGovernance.check_safety("Pharmacy supply chains improved.").accepted);
    }

    #[test]
    fn bias_check_suggests_inclusive_replacements() {
        let report = BasicGovernance.detect_bias("The chairman announced record mankind gains.");
        assert!(!report.accepted);
        assert_eq!(report.diagnostics.len(), 2);
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.contains("chairman") && d.contains("chairperson")));
    }

    #[test]
    fn clean_articles_pass_both_post_hooks() {
        let text = "Solar adoption keeps growing while costs fall.";
        assert!(BasicGovernance.check_safety(text).accepted);
        assert!(BasicGovernance.detect_bias(text).accepted);
    }
}
