//! End-to-end pipeline tests over scripted collaborators.
//!
//! No network: inference is a keyword-routed script, search returns canned
//! documents. Call counters verify which collaborators ran and how often.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use quill_core::agents::{DataAnalyst, WebSearcher};
use quill_core::engine::validate_required_inputs;
use quill_core::{
    BasicGovernance, Depth, DepthTable, Field, InferenceProvider, Pipeline, PipelineConfig,
    ProviderError, ResearchPlan, RetryPolicy, SearchDoc, SearchProvider, StageExecutor, StageName,
    Verdict, WorkflowError, WorkflowState,
};

const DRAFT: &str = "\
# The Rise of Renewable Energy

Renewable energy is transforming how the world generates power.

## Growth

Solar capacity has grown faster than any other energy source. \
Wind farms are expanding across every continent.

## Outlook

The transition will accelerate as costs keep falling.
";

const REVISED: &str = "\
# The Rise of Renewable Energy

Renewable energy is transforming how the world generates power, and the \
pace keeps increasing.

## Growth

Solar capacity has grown faster than any other energy source, while wind \
farms are expanding across every continent.

## Outlook

The transition is likely to accelerate as costs keep falling.
";

/// Inference stub routed on the agent's role prompt.
struct ScriptedInference {
    calls: AtomicUsize,
    revision: &'static str,
}

impl ScriptedInference {
    fn new() -> Arc<Self> {
        Self::with_revision(REVISED)
    }

    /// Same script, but the Editor returns `revision` instead of [`REVISED`].
    fn with_revision(revision: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            revision,
        })
    }
}

#[async_trait]
impl InferenceProvider for ScriptedInference {
    async fn complete(
        &self,
        role_prompt: &str,
        _user_content: &str,
        _temperature: f32,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let script = if role_prompt.contains("Research Coordinator") {
            "1. benefits of renewable energy overview\n2. renewable energy adoption statistics"
        } else if role_prompt.contains("Web Search Agent") {
            "Sources agree that renewable adoption is growing quickly across all regions."
        } else if role_prompt.contains("Data Analyst") {
            "Costs are falling while installed capacity grows. \
             Storage remains the main bottleneck for the grid."
        } else if role_prompt.contains("Content Writer") {
            DRAFT
        } else if role_prompt.contains("Fact Checker") {
            "Overall the content is accurate and well sourced."
        } else if role_prompt.contains("Editor") {
            self.revision
        } else {
            return Err(ProviderError::MalformedResponse(format!(
                "no script for role prompt: {role_prompt}"
            )));
        };
        Ok(script.to_string())
    }
}

/// Inference stub that never resolves.
struct HangingInference;

#[async_trait]
impl InferenceProvider for HangingInference {
    async fn complete(
        &self,
        _role_prompt: &str,
        _user_content: &str,
        _temperature: f32,
    ) -> Result<String, ProviderError> {
        std::future::pending::<Result<String, ProviderError>>().await
    }
}

/// Search stub returning the same documents for every query.
struct StaticSearch {
    docs: Vec<SearchDoc>,
    calls: AtomicUsize,
}

impl StaticSearch {
    fn new(docs: Vec<SearchDoc>) -> Arc<Self> {
        Arc::new(Self {
            docs,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchDoc>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.docs.iter().take(max_results).cloned().collect())
    }
}

/// Search stub that always fails.
struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(
        &self,
        query: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchDoc>, ProviderError> {
        Err(ProviderError::SearchUnavailable {
            query: query.to_string(),
            reason: "provider offline".to_string(),
        })
    }
}

/// Evidence whose snippets overlap every claim in [`DRAFT`].
fn relevant_docs() -> Vec<SearchDoc> {
    vec![
        SearchDoc {
            title: "Renewable Energy Outlook".into(),
            snippet: "Renewable energy and solar capacity keep growing while the \
                      transition accelerates."
                .into(),
            url: "https://energy.example/outlook".into(),
        },
        SearchDoc {
            title: "Wind Growth Statistics".into(),
            snippet: "Wind farms and solar adoption show the renewable transition is \
                      expanding worldwide."
                .into(),
            url: "https://energy.example/wind".into(),
        },
    ]
}

/// Evidence unrelated to anything the draft asserts.
fn irrelevant_docs() -> Vec<SearchDoc> {
    vec![SearchDoc {
        title: "Medieval Fortifications".into(),
        snippet: "History of medieval castles and their stone walls.".into(),
        url: "https://castles.example/moats".into(),
    }]
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 1,
        base_delay_ms: 1,
    }
}

fn test_config() -> PipelineConfig {
    PipelineConfig::default().with_retry(fast_retry())
}

#[tokio::test]
async fn shallow_run_populates_every_stage_output() {
    let inference = ScriptedInference::new();
    let search = StaticSearch::new(relevant_docs());
    let pipeline = Pipeline::new(test_config(), inference.clone(), search.clone());

    let state = pipeline
        .run("Benefits of renewable energy", Depth::Shallow)
        .await
        .unwrap();

    for field in [
        Field::ResearchPlan,
        Field::SearchResults,
        Field::SearchSummary,
        Field::KeyPoints,
        Field::Themes,
        Field::DeepAnalysis,
        Field::DraftContent,
        Field::Outline,
        Field::FactCheckReport,
        Field::ClaimsChecked,
        Field::VerifiedClaims,
        Field::FinalContent,
        Field::EditingReport,
    ] {
        assert!(state.is_populated(field), "field {field} not populated");
    }

    let claims = state.verified_claims.as_deref().unwrap();
    assert!(!claims.is_empty());
    assert_eq!(state.claims_checked, Some(claims.len()));

    // Shallow depth: exactly two queries, and with every claim overlapping
    // stored evidence the fact checker issues no fresh searches.
    let plan = state.research_plan.as_ref().unwrap();
    assert_eq!(plan.queries.len(), 2);
    assert_eq!(search.calls.load(Ordering::SeqCst), 2);

    // The final article is a revision, not the draft verbatim.
    assert_ne!(state.final_content, state.draft_content);
    assert!(state.warnings.is_empty());
}

#[tokio::test]
async fn result_urls_deduplicate_first_query_wins() {
    let inference = ScriptedInference::new();
    let search = StaticSearch::new(relevant_docs());
    let pipeline = Pipeline::new(test_config(), inference, search);

    let state = pipeline
        .run("Benefits of renewable energy", Depth::Shallow)
        .await
        .unwrap();

    // Both queries returned the same two documents; the merged results keep
    // one hit per URL, attributed to the first query that surfaced it.
    let hits = state.search_results.as_deref().unwrap();
    assert_eq!(hits.len(), 2);
    let mut urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), hits.len());

    let first_query = &state.research_plan.as_ref().unwrap().queries[0];
    for hit in hits {
        assert_eq!(&hit.query, first_query);
    }
}

#[tokio::test]
async fn unsupported_claims_are_flagged_in_editing_report() {
    let inference = ScriptedInference::new();
    let search = StaticSearch::new(irrelevant_docs());
    let pipeline = Pipeline::new(test_config(), inference, search);

    let state = pipeline
        .run("Benefits of renewable energy", Depth::Shallow)
        .await
        .unwrap();

    let claims = state.verified_claims.as_deref().unwrap();
    assert!(!claims.is_empty());
    for claim in claims {
        assert_eq!(claim.verdict, Verdict::Unsupported);
    }

    let report = state.editing_report.as_deref().unwrap();
    assert!(report.contains("Flagged Claims"));
    for claim in claims {
        assert!(report.contains(claim.claim.as_str()));
    }
}

#[tokio::test]
async fn blank_topic_is_rejected_before_any_collaborator_call() {
    let inference = ScriptedInference::new();
    let search = StaticSearch::new(relevant_docs());
    let pipeline = Pipeline::new(test_config(), inference.clone(), search.clone());

    for topic in ["", "   "] {
        let err = pipeline.run(topic, Depth::Medium).await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidConfiguration(_)));
        assert!(err.rejected_before_start());
    }

    assert_eq!(inference.calls.load(Ordering::SeqCst), 0);
    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn governance_veto_stops_the_run_with_diagnostics() {
    let inference = ScriptedInference::new();
    let search = StaticSearch::new(relevant_docs());
    let pipeline = Pipeline::new(test_config(), inference.clone(), search.clone())
        .with_governance(Arc::new(BasicGovernance));

    let err = pipeline
        .run("<script>alert(1)</script>", Depth::Shallow)
        .await
        .unwrap_err();

    match err {
        WorkflowError::InputRejected { diagnostics } => {
            assert!(!diagnostics.is_empty());
        }
        other => panic!("expected InputRejected, got {other:?}"),
    }
    assert_eq!(inference.calls.load(Ordering::SeqCst), 0);
    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn post_hook_findings_land_as_warnings_on_a_completed_run() {
    // A revision that trips both the safety and the bias lexicon.
    const FLAGGED_REVISION: &str = "\
# The Rise of Renewable Energy

The chairman of the panel called cheap solar the weapon of choice against \
rising emissions. Costs keep falling across every market.
";

    let inference = ScriptedInference::with_revision(FLAGGED_REVISION);
    let search = StaticSearch::new(relevant_docs());
    let pipeline = Pipeline::new(test_config(), inference, search)
        .with_governance(Arc::new(BasicGovernance));

    let state = pipeline
        .run("Benefits of renewable energy", Depth::Shallow)
        .await
        .unwrap();

    // Findings are warnings on the completed run, never a failure.
    assert!(state
        .warnings
        .iter()
        .any(|w| w.starts_with("safety:") && w.contains("weapon")));
    assert!(state
        .warnings
        .iter()
        .any(|w| w.starts_with("bias:") && w.contains("chairman")));
}

#[tokio::test]
async fn stage_failure_names_the_failing_stage() {
    let inference = ScriptedInference::new();
    let pipeline = Pipeline::new(test_config(), inference, Arc::new(FailingSearch));

    let err = pipeline
        .run("Benefits of renewable energy", Depth::Shallow)
        .await
        .unwrap_err();

    assert_eq!(err.failing_stage(), Some(StageName::WebSearcher));
    assert!(!err.rejected_before_start());
    match err {
        WorkflowError::StageExecution { stage, source } => {
            assert_eq!(stage, StageName::WebSearcher);
            assert!(matches!(source, ProviderError::SearchUnavailable { .. }));
        }
        other => panic!("expected StageExecution, got {other:?}"),
    }
}

#[tokio::test]
async fn run_times_out_against_the_depth_deadline() {
    let config = test_config().with_deadlines(DepthTable {
        shallow: 0,
        medium: 0,
        deep: 0,
    });
    let search = StaticSearch::new(relevant_docs());
    let pipeline = Pipeline::new(config, Arc::new(HangingInference), search);

    let err = pipeline
        .run("Benefits of renewable energy", Depth::Shallow)
        .await
        .unwrap_err();

    match err {
        WorkflowError::Timeout {
            deadline_secs,
            phase,
        } => {
            assert_eq!(deadline_secs, 0);
            assert_eq!(phase, "planning");
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn executor_invoked_without_inputs_reports_every_missing_field() {
    let analyst = DataAnalyst::new(
        ScriptedInference::new(),
        test_config().analyst.clone(),
        fast_retry(),
    );
    let state = WorkflowState::new("Benefits of renewable energy", Depth::Shallow, 2);

    let err = validate_required_inputs(&analyst, &state).unwrap_err();
    match err {
        WorkflowError::StageInputMissing { stage, fields } => {
            assert_eq!(stage, StageName::DataAnalyst);
            assert!(fields.contains(&Field::SearchSummary));
            assert!(fields.contains(&Field::SearchResults));
        }
        other => panic!("expected StageInputMissing, got {other:?}"),
    }
}

#[tokio::test]
async fn stage_cannot_overwrite_an_already_populated_field() {
    let config = test_config();
    let searcher = WebSearcher::new(
        StaticSearch::new(relevant_docs()),
        ScriptedInference::new(),
        config.searcher.clone(),
        fast_retry(),
        config.results_per_query,
    );

    let mut state = WorkflowState::new("Benefits of renewable energy", Depth::Shallow, 2);
    state.research_plan = Some(ResearchPlan {
        topic: state.topic.clone(),
        objectives: vec!["Understand the basics".into()],
        queries: vec!["renewable energy overview".into()],
    });
    state.search_summary = Some("already written by someone else".into());

    let update = searcher.execute(&state).await.unwrap();
    let err = state.merge(StageName::WebSearcher, update).unwrap_err();
    match err {
        WorkflowError::StageContract { stage, detail } => {
            assert_eq!(stage, StageName::WebSearcher);
            assert!(detail.contains("search_summary"));
        }
        other => panic!("expected StageContract, got {other:?}"),
    }
    assert_eq!(
        state.search_summary.as_deref(),
        Some("already written by someone else")
    );
}
