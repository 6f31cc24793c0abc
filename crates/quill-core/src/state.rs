//! Shared workflow state threaded through the six-stage pipeline.
//!
//! `WorkflowState` is a strongly-typed record: every stage output is an
//! `Option` field that starts empty and is populated exactly once. The
//! write-once discipline is enforced centrally in [`WorkflowState::merge`]
//! rather than trusted to individual stages — a stage returns a
//! [`StageUpdate`] (the same record shape, all fields optional) and the merge
//! rejects any field that is already populated.
//!
//! One state record is created per `run` invocation and never shared across
//! runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::stage::StageName;

/// Caller-selected research depth. Controls query budget, target article
/// length, and the overall run deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Quick overview: 2 queries, ~500 words.
    Shallow,
    /// Standard research: 5 queries, ~1000 words.
    Medium,
    /// Thorough research: 8 queries, ~1500 words.
    Deep,
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Medium
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Depth::Shallow => "shallow",
            Depth::Medium => "medium",
            Depth::Deep => "deep",
        };
        f.write_str(s)
    }
}

impl FromStr for Depth {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shallow" => Ok(Depth::Shallow),
            "medium" | "" => Ok(Depth::Medium),
            "deep" => Ok(Depth::Deep),
            other => Err(WorkflowError::InvalidConfiguration(format!(
                "unrecognized depth {other:?} (expected shallow, medium, or deep)"
            ))),
        }
    }
}

/// Named fields of [`WorkflowState`], used by stage contracts and
/// missing-input diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Topic,
    Depth,
    ResearchPlan,
    SearchResults,
    SearchSummary,
    KeyPoints,
    Themes,
    DeepAnalysis,
    DraftContent,
    Outline,
    FactCheckReport,
    ClaimsChecked,
    VerifiedClaims,
    FinalContent,
    EditingReport,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Topic => "topic",
            Field::Depth => "depth",
            Field::ResearchPlan => "research_plan",
            Field::SearchResults => "search_results",
            Field::SearchSummary => "search_summary",
            Field::KeyPoints => "key_points",
            Field::Themes => "themes",
            Field::DeepAnalysis => "deep_analysis",
            Field::DraftContent => "draft_content",
            Field::Outline => "outline",
            Field::FactCheckReport => "fact_check_report",
            Field::ClaimsChecked => "claims_checked",
            Field::VerifiedClaims => "verified_claims",
            Field::FinalContent => "final_content",
            Field::EditingReport => "editing_report",
        };
        f.write_str(s)
    }
}

/// Structured research plan produced by the Research Coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchPlan {
    /// The topic the plan covers.
    pub topic: String,
    /// Research objectives, scaled to the requested depth.
    pub objectives: Vec<String>,
    /// Search queries to execute, in order. Never exceeds the depth budget.
    pub queries: Vec<String>,
}

/// One search hit, tagged with the query that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The query this hit answered.
    pub query: String,
    /// Result title.
    pub title: String,
    /// Result snippet.
    pub snippet: String,
    /// Result URL. Unique across the whole run after deduplication.
    pub url: String,
}

/// Tri-state outcome of fact-checking one extracted claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Evidence agrees with the claim.
    Supported,
    /// Evidence was found but does not back the claim.
    Unsupported,
    /// No usable evidence either way.
    Unverifiable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Supported => "supported",
            Verdict::Unsupported => "unsupported",
            Verdict::Unverifiable => "unverifiable",
        };
        f.write_str(s)
    }
}

/// A claim extracted from the draft together with its verdict and evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedClaim {
    /// The claim text as extracted from the draft.
    pub claim: String,
    /// The verdict. Every extracted claim gets exactly one.
    pub verdict: Verdict,
    /// Evidence URLs consulted for this claim.
    pub evidence: Vec<String>,
}

/// The single evolving record threaded through all six stages of one run.
///
/// Input fields (`topic`, `depth`, `max_search_queries`) are immutable once
/// set. Stage output fields are append-only: populated exactly once by their
/// owning stage, never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,

    // Input (caller-supplied, immutable once set)
    /// Research topic, trimmed, non-empty.
    pub topic: String,
    /// Requested research depth.
    pub depth: Depth,
    /// Query budget derived from `depth` at initialization.
    pub max_search_queries: usize,

    // Stage 1: Research Coordinator
    /// Objectives and queries for the run.
    pub research_plan: Option<ResearchPlan>,

    // Stage 2: Web Searcher
    /// Deduplicated hits, in query order then per-query rank.
    pub search_results: Option<Vec<SearchHit>>,
    /// Model-written synthesis of the raw hits.
    pub search_summary: Option<String>,

    // Stage 3: Data Analyst
    /// Key points extracted from the search material.
    pub key_points: Option<Vec<String>>,
    /// Themes identified across sources.
    pub themes: Option<Vec<String>>,
    /// Model-written deep analysis.
    pub deep_analysis: Option<String>,

    // Stage 4: Content Writer
    /// The draft article, markdown.
    pub draft_content: Option<String>,
    /// Section headings for the draft.
    pub outline: Option<Vec<String>>,

    // Stage 5: Fact Checker
    /// Rendered per-claim report, markdown.
    pub fact_check_report: Option<String>,
    /// Number of claims checked. Always equals `verified_claims.len()`.
    pub claims_checked: Option<usize>,
    /// Per-claim verdicts with evidence.
    pub verified_claims: Option<Vec<VerifiedClaim>>,

    // Stage 6: Editor
    /// The final article, a strict revision of the draft.
    pub final_content: Option<String>,
    /// What the editor changed and which claims it flagged.
    pub editing_report: Option<String>,

    /// Warning-level signals accumulated across stages (query shortfalls,
    /// governance findings). Append-only, exempt from write-once.
    pub warnings: Vec<String>,
}

impl WorkflowState {
    /// Create a fresh state record for one run. `topic` must already be
    /// trimmed and validated by the engine.
    pub fn new(topic: impl Into<String>, depth: Depth, max_search_queries: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            topic: topic.into(),
            depth,
            max_search_queries,
            research_plan: None,
            search_results: None,
            search_summary: None,
            key_points: None,
            themes: None,
            deep_analysis: None,
            draft_content: None,
            outline: None,
            fact_check_report: None,
            claims_checked: None,
            verified_claims: None,
            final_content: None,
            editing_report: None,
            warnings: Vec::new(),
        }
    }

    /// Whether a field counts as populated for contract validation.
    ///
    /// Strings must be non-empty after trimming. Sequences and scalars count
    /// once written, even when empty: a run whose every query returned zero
    /// hits still carries `Some(vec![])` in `search_results` and proceeds.
    pub fn is_populated(&self, field: Field) -> bool {
        fn text(s: &Option<String>) -> bool {
            s.as_deref().map(|t| !t.trim().is_empty()).unwrap_or(false)
        }

        match field {
            Field::Topic => !self.topic.trim().is_empty(),
            Field::Depth => true,
            Field::ResearchPlan => self
                .research_plan
                .as_ref()
                .map(|p| !p.queries.is_empty())
                .unwrap_or(false),
            Field::SearchResults => self.search_results.is_some(),
            Field::SearchSummary => text(&self.search_summary),
            Field::KeyPoints => self.key_points.is_some(),
            Field::Themes => self.themes.is_some(),
            Field::DeepAnalysis => text(&self.deep_analysis),
            Field::DraftContent => text(&self.draft_content),
            Field::Outline => self.outline.is_some(),
            Field::FactCheckReport => text(&self.fact_check_report),
            Field::ClaimsChecked => self.claims_checked.is_some(),
            Field::VerifiedClaims => self.verified_claims.is_some(),
            Field::FinalContent => text(&self.final_content),
            Field::EditingReport => text(&self.editing_report),
        }
    }

    /// Merge a stage's partial update, enforcing write-once: any populated
    /// field that the update also carries is a contract breach attributed to
    /// `stage`. Warnings are appended, never replaced.
    pub fn merge(&mut self, stage: StageName, update: StageUpdate) -> Result<(), WorkflowError> {
        macro_rules! take {
            ($field:ident, $name:expr) => {
                if let Some(value) = update.$field {
                    if self.$field.is_some() {
                        return Err(WorkflowError::StageContract {
                            stage,
                            detail: format!("attempted to overwrite populated field {}", $name),
                        });
                    }
                    self.$field = Some(value);
                }
            };
        }

        take!(research_plan, Field::ResearchPlan);
        take!(search_results, Field::SearchResults);
        take!(search_summary, Field::SearchSummary);
        take!(key_points, Field::KeyPoints);
        take!(themes, Field::Themes);
        take!(deep_analysis, Field::DeepAnalysis);
        take!(draft_content, Field::DraftContent);
        take!(outline, Field::Outline);
        take!(fact_check_report, Field::FactCheckReport);
        take!(claims_checked, Field::ClaimsChecked);
        take!(verified_claims, Field::VerifiedClaims);
        take!(final_content, Field::FinalContent);
        take!(editing_report, Field::EditingReport);

        self.warnings.extend(update.warnings);
        Ok(())
    }
}

/// A stage's partial update: the same record shape as [`WorkflowState`] with
/// every output optional. A correct stage sets exactly its declared outputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageUpdate {
    pub research_plan: Option<ResearchPlan>,
    pub search_results: Option<Vec<SearchHit>>,
    pub search_summary: Option<String>,
    pub key_points: Option<Vec<String>>,
    pub themes: Option<Vec<String>>,
    pub deep_analysis: Option<String>,
    pub draft_content: Option<String>,
    pub outline: Option<Vec<String>>,
    pub fact_check_report: Option<String>,
    pub claims_checked: Option<usize>,
    pub verified_claims: Option<Vec<VerifiedClaim>>,
    pub final_content: Option<String>,
    pub editing_report: Option<String>,
    /// Warning-level signals to append to the run.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WorkflowState {
        WorkflowState::new("Benefits of renewable energy", Depth::Shallow, 2)
    }

    #[test]
    fn depth_parses_known_values_and_rejects_others() {
        assert_eq!("shallow".parse::<Depth>().unwrap(), Depth::Shallow);
        assert_eq!("MEDIUM".parse::<Depth>().unwrap(), Depth::Medium);
        assert_eq!(" deep ".parse::<Depth>().unwrap(), Depth::Deep);
        assert_eq!("".parse::<Depth>().unwrap(), Depth::Medium);
        assert!(matches!(
            "extreme".parse::<Depth>(),
            Err(WorkflowError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn merge_populates_fields_once() {
        let mut s = state();
        let update = StageUpdate {
            search_summary: Some("findings".into()),
            ..Default::default()
        };
        s.merge(StageName::WebSearcher, update).unwrap();
        assert!(s.is_populated(Field::SearchSummary));
    }

    #[test]
    fn merge_rejects_overwrite_of_populated_field() {
        let mut s = state();
        s.search_summary = Some("first".into());

        let update = StageUpdate {
            search_summary: Some("second".into()),
            ..Default::default()
        };
        let err = s.merge(StageName::WebSearcher, update).unwrap_err();
        match err {
            WorkflowError::StageContract { stage, detail } => {
                assert_eq!(stage, StageName::WebSearcher);
                assert!(detail.contains("search_summary"));
            }
            other => panic!("expected StageContract, got {other:?}"),
        }
        // The original value survives.
        assert_eq!(s.search_summary.as_deref(), Some("first"));
    }

    #[test]
    fn merge_appends_warnings_instead_of_replacing() {
        let mut s = state();
        s.warnings.push("earlier".into());
        let update = StageUpdate {
            warnings: vec!["later".into()],
            ..Default::default()
        };
        s.merge(StageName::ResearchCoordinator, update).unwrap();
        assert_eq!(s.warnings, vec!["earlier".to_string(), "later".to_string()]);
    }

    #[test]
    fn empty_sequences_count_as_populated_but_blank_strings_do_not() {
        let mut s = state();
        s.search_results = Some(vec![]);
        s.search_summary = Some("   ".into());

        assert!(s.is_populated(Field::SearchResults));
        assert!(!s.is_populated(Field::SearchSummary));
        assert!(!s.is_populated(Field::DraftContent));
    }
}
