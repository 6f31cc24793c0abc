//! Web Searcher: executes the plan's queries and summarizes the findings.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AgentProfile, RetryPolicy};
use crate::error::ProviderError;
use crate::providers::{with_retry, InferenceProvider, SearchProvider};
use crate::skills::analysis::truncate_at_boundary;
use crate::skills::search;
use crate::stage::{StageExecutor, StageName};
use crate::state::{Field, StageUpdate, WorkflowState};

const SUMMARY_INPUT_CAP: usize = 4000;

/// Stage 2. Issues at most `max_search_queries` search calls, one per query,
/// sequentially in plan order. Result URLs are deduplicated across queries
/// (first occurrence wins). A query with zero results is not an error.
pub struct WebSearcher {
    search: Arc<dyn SearchProvider>,
    inference: Arc<dyn InferenceProvider>,
    profile: AgentProfile,
    retry: RetryPolicy,
    results_per_query: usize,
}

impl WebSearcher {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        inference: Arc<dyn InferenceProvider>,
        profile: AgentProfile,
        retry: RetryPolicy,
        results_per_query: usize,
    ) -> Self {
        Self {
            search,
            inference,
            profile,
            retry,
            results_per_query,
        }
    }
}

#[async_trait]
impl StageExecutor for WebSearcher {
    fn name(&self) -> StageName {
        StageName::WebSearcher
    }

    fn required_inputs(&self) -> &'static [Field] {
        &[Field::ResearchPlan]
    }

    fn produced_outputs(&self) -> &'static [Field] {
        &[Field::SearchResults, Field::SearchSummary]
    }

    async fn execute(&self, state: &WorkflowState) -> Result<StageUpdate, ProviderError> {
        let plan = state
            .research_plan
            .as_ref()
            .expect("engine validated research_plan is populated");

        let mut per_query = Vec::new();
        let mut rendered_blocks = Vec::new();

        for query in plan.queries.iter().take(state.max_search_queries) {
            let docs = with_retry(&self.retry, "web search", || {
                self.search.search(query, self.results_per_query)
            })
            .await?;

            tracing::debug!(query = %query, hits = docs.len(), "search completed");
            rendered_blocks.push(search::render_results(query, &docs));
            per_query.push((query.clone(), docs));
        }

        let merged = search::merge_results(&per_query);

        let prompt = format!(
            "Review these search results and create a structured summary:\n\n{}\n\n\
             Provide:\n\
             1. Key findings (top 5-7 most important points)\n\
             2. Common themes across sources\n\
             3. Notable sources and their main contributions\n\n\
             Be concise and focus on the most relevant information.",
            truncate_at_boundary(&rendered_blocks.join("\n\n"), SUMMARY_INPUT_CAP)
        );

        let summary = with_retry(&self.retry, "search summary inference", || {
            self.inference
                .complete(&self.profile.role_prompt, &prompt, self.profile.temperature)
        })
        .await?;

        tracing::info!(
            queries = per_query.len(),
            results = merged.len(),
            "web search completed"
        );

        Ok(StageUpdate {
            search_results: Some(merged),
            search_summary: Some(summary),
            ..Default::default()
        })
    }
}
