//! Fact Checker: extracts claims from the draft and resolves each to a
//! verdict.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AgentProfile, RetryPolicy};
use crate::error::ProviderError;
use crate::providers::{with_retry, InferenceProvider, SearchDoc, SearchProvider};
use crate::skills::analysis::truncate_at_boundary;
use crate::skills::fact_check;
use crate::stage::{StageExecutor, StageName};
use crate::state::{Field, StageUpdate, WorkflowState};

const ASSESSMENT_CONTENT_CAP: usize = 2000;

/// Stage 5. Verification checks stored `search_results` evidence first and
/// falls back to one fresh search per claim. Every extracted claim resolves
/// to exactly one verdict; `claims_checked` always equals the number of
/// verified claims.
pub struct FactChecker {
    inference: Arc<dyn InferenceProvider>,
    search: Arc<dyn SearchProvider>,
    profile: AgentProfile,
    retry: RetryPolicy,
    results_per_query: usize,
}

impl FactChecker {
    pub fn new(
        inference: Arc<dyn InferenceProvider>,
        search: Arc<dyn SearchProvider>,
        profile: AgentProfile,
        retry: RetryPolicy,
        results_per_query: usize,
    ) -> Self {
        Self {
            inference,
            search,
            profile,
            retry,
            results_per_query,
        }
    }
}

#[async_trait]
impl StageExecutor for FactChecker {
    fn name(&self) -> StageName {
        StageName::FactChecker
    }

    fn required_inputs(&self) -> &'static [Field] {
        &[Field::DraftContent, Field::SearchResults]
    }

    fn produced_outputs(&self) -> &'static [Field] {
        &[
            Field::FactCheckReport,
            Field::ClaimsChecked,
            Field::VerifiedClaims,
        ]
    }

    async fn execute(&self, state: &WorkflowState) -> Result<StageUpdate, ProviderError> {
        let draft = state
            .draft_content
            .as_deref()
            .expect("engine validated draft_content is populated");
        let stored: Vec<SearchDoc> = state
            .search_results
            .as_deref()
            .expect("engine validated search_results is populated")
            .iter()
            .map(|hit| SearchDoc {
                title: hit.title.clone(),
                snippet: hit.snippet.clone(),
                url: hit.url.clone(),
            })
            .collect();

        let claims = fact_check::extract_claims(draft);
        let mut verified = Vec::with_capacity(claims.len());

        for claim in &claims {
            // Stored evidence first; a fresh search only when it says nothing.
            let resolved = if !stored.is_empty() && fact_check::evidence_overlap(claim, &stored) > 0.0
            {
                fact_check::resolve_claim(claim, &stored)
            } else {
                let fresh = with_retry(&self.retry, "fact-check search", || {
                    self.search.search(claim, self.results_per_query)
                })
                .await?;
                fact_check::resolve_claim(claim, &fresh)
            };

            tracing::debug!(claim = %resolved.claim, verdict = %resolved.verdict, "claim resolved");
            verified.push(resolved);
        }

        let report = fact_check::render_report(&verified);

        let prompt = format!(
            "Review this fact-check report:\n\n{report}\n\n\
             Content being checked:\n{content}\n\n\
             Provide:\n\
             1. Overall Assessment: how accurate is the content?\n\
             2. Critical Issues: any claims that need immediate attention\n\
             3. Recommendations: suggested corrections or clarifications\n\n\
             Be precise and cite specific concerns.",
            content = truncate_at_boundary(draft, ASSESSMENT_CONTENT_CAP),
        );

        let assessment = with_retry(&self.retry, "fact-check assessment inference", || {
            self.inference
                .complete(&self.profile.role_prompt, &prompt, self.profile.temperature)
        })
        .await?;

        tracing::info!(claims = verified.len(), "fact checking completed");

        Ok(StageUpdate {
            claims_checked: Some(verified.len()),
            fact_check_report: Some(format!("{report}\n## Assessment\n\n{assessment}")),
            verified_claims: Some(verified),
            ..Default::default()
        })
    }
}
