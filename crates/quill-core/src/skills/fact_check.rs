//! Fact-checking skill: claim extraction, evidence scoring, verdicts,
//! report rendering.
//!
//! Verdicts are tri-state: `supported` when evidence overlaps the claim,
//! `unsupported` when evidence exists but does not, `unverifiable` when no
//! evidence was found. Every extracted claim resolves to exactly one
//! verdict; none is dropped.

use crate::providers::SearchDoc;
use crate::skills::analysis::split_sentences;
use crate::state::{Verdict, VerifiedClaim};

/// Cap on claims checked per draft, matching the search budget the checker
/// is willing to spend.
pub const MAX_CLAIMS: usize = 5;

const COPULA_KEYWORDS: [&str; 6] = ["is", "are", "has", "have", "will", "can"];
const SUPPORT_THRESHOLD: f64 = 0.5;

/// Extract checkable factual claims from the draft: declarative sentences of
/// more than five words containing a copula keyword. Capped at
/// [`MAX_CLAIMS`], in order of appearance.
pub fn extract_claims(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() > 5)
        .filter(|s| {
            s.split_whitespace()
                .any(|w| COPULA_KEYWORDS.contains(&w.to_lowercase().as_str()))
        })
        .take(MAX_CLAIMS)
        .collect()
}

/// Score a claim against evidence snippets: the fraction of snippets that
/// mention at least one of the claim's leading significant words.
pub fn evidence_overlap(claim: &str, evidence: &[SearchDoc]) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }

    let significant: Vec<String> = claim
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .take(4)
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect();

    if significant.is_empty() {
        return 0.0;
    }

    let matching = evidence
        .iter()
        .filter(|doc| {
            let snippet = doc.snippet.to_lowercase();
            significant.iter().any(|w| snippet.contains(w.as_str()))
        })
        .count();

    matching as f64 / evidence.len() as f64
}

/// Resolve one claim against evidence. No evidence means `unverifiable`.
pub fn resolve_claim(claim: &str, evidence: &[SearchDoc]) -> VerifiedClaim {
    let verdict = if evidence.is_empty() {
        Verdict::Unverifiable
    } else if evidence_overlap(claim, evidence) >= SUPPORT_THRESHOLD {
        Verdict::Supported
    } else {
        Verdict::Unsupported
    };

    VerifiedClaim {
        claim: claim.to_string(),
        verdict,
        evidence: evidence.iter().map(|d| d.url.clone()).collect(),
    }
}

/// Render the per-claim fact-check report.
pub fn render_report(claims: &[VerifiedClaim]) -> String {
    if claims.is_empty() {
        return "# Fact Check Report\n\nNo verifiable claims found in the text.\n".to_string();
    }

    let mut report = "# Fact Check Report\n\n".to_string();
    for (i, result) in claims.iter().enumerate() {
        report.push_str(&format!("## Claim {}\n", i + 1));
        report.push_str(&format!("**Statement:** {}\n\n", result.claim));
        report.push_str(&format!("**Verdict:** {}\n", result.verdict));

        if result.evidence.is_empty() {
            report.push_str("**Sources:** none found\n");
        } else {
            report.push_str("**Sources:**\n");
            for url in &result.evidence {
                report.push_str(&format!("- {url}\n"));
            }
        }
        report.push('\n');
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(snippet: &str) -> SearchDoc {
        SearchDoc {
            title: "t".into(),
            snippet: snippet.into(),
            url: "https://evidence.example".into(),
        }
    }

    #[test]
    fn claims_are_declarative_sentences_over_five_words() {
        let text = "Solar power is now the cheapest energy source in most regions. \
                    Nice weather today. \
                    Wind turbines have grown dramatically in both size and output.";
        let claims = extract_claims(text);
        assert_eq!(claims.len(), 2);
        assert!(claims[0].starts_with("Solar power is"));
    }

    #[test]
    fn every_extracted_claim_gets_exactly_one_verdict() {
        let text = "Hydropower is the largest renewable source worldwide today. \
                    Geothermal energy has a tiny footprint compared with coal plants. \
                    Batteries will keep getting cheaper for another full decade.";
        let claims = extract_claims(text);
        assert!(!claims.is_empty());

        let resolved: Vec<VerifiedClaim> = claims
            .iter()
            .map(|c| resolve_claim(c, &[doc("hydropower largest renewable")]))
            .collect();
        assert_eq!(resolved.len(), claims.len());
    }

    #[test]
    fn verdict_mapping_covers_all_three_outcomes() {
        let claim = "Solar panels are cheaper every single year";

        let none = resolve_claim(claim, &[]);
        assert_eq!(none.verdict, Verdict::Unverifiable);

        let agree = resolve_claim(claim, &[doc("solar panels keep getting cheaper")]);
        assert_eq!(agree.verdict, Verdict::Supported);

        let unrelated = resolve_claim(claim, &[doc("history of medieval castles")]);
        assert_eq!(unrelated.verdict, Verdict::Unsupported);
    }

    #[test]
    fn report_lists_every_claim_and_verdict() {
        let claims = vec![
            VerifiedClaim {
                claim: "First claim here".into(),
                verdict: Verdict::Supported,
                evidence: vec!["https://a.example".into()],
            },
            VerifiedClaim {
                claim: "Second claim here".into(),
                verdict: Verdict::Unverifiable,
                evidence: vec![],
            },
        ];
        let report = render_report(&claims);
        assert!(report.contains("First claim here"));
        assert!(report.contains("supported"));
        assert!(report.contains("unverifiable"));
        assert!(report.contains("none found"));
    }
}
