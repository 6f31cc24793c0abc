//! Data Analyst: extracts and synthesizes insight from the search material.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AgentProfile, RetryPolicy};
use crate::error::ProviderError;
use crate::providers::{with_retry, InferenceProvider};
use crate::skills::analysis;
use crate::stage::{StageExecutor, StageName};
use crate::state::{Field, StageUpdate, WorkflowState};

const MAX_KEY_POINTS: usize = 5;
const HITS_FOR_SYNTHESIS: usize = 5;

/// Stage 3. Key points and themes are extracted from the gathered text, not
/// invented; the inference call only interprets what extraction surfaced.
pub struct DataAnalyst {
    inference: Arc<dyn InferenceProvider>,
    profile: AgentProfile,
    retry: RetryPolicy,
}

impl DataAnalyst {
    pub fn new(
        inference: Arc<dyn InferenceProvider>,
        profile: AgentProfile,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            inference,
            profile,
            retry,
        }
    }
}

#[async_trait]
impl StageExecutor for DataAnalyst {
    fn name(&self) -> StageName {
        StageName::DataAnalyst
    }

    fn required_inputs(&self) -> &'static [Field] {
        &[Field::SearchSummary, Field::SearchResults]
    }

    fn produced_outputs(&self) -> &'static [Field] {
        &[Field::KeyPoints, Field::Themes, Field::DeepAnalysis]
    }

    async fn execute(&self, state: &WorkflowState) -> Result<StageUpdate, ProviderError> {
        let summary = state
            .search_summary
            .as_deref()
            .expect("engine validated search_summary is populated");
        let hits = state
            .search_results
            .as_deref()
            .expect("engine validated search_results is populated");

        let mut sources = vec![summary.to_string()];
        sources.extend(
            hits.iter()
                .take(HITS_FOR_SYNTHESIS)
                .map(|h| format!("{} — {}", h.title, h.snippet)),
        );

        let synthesized = analysis::synthesize(&sources);
        let key_points = analysis::extract_key_points(&synthesized, MAX_KEY_POINTS);
        let themes = analysis::identify_themes(&synthesized);

        let prompt = format!(
            "Analyze this research data in depth:\n\n{synthesized}\n\n\
             Provide:\n\
             1. Core Insights: the most important insights\n\
             2. Data Patterns: key patterns or trends identified\n\
             3. Knowledge Gaps: what information might be missing\n\
             4. Recommendations: what aspects the content should emphasize\n\n\
             Format your response with clear headings. Work only from the \
             data above; do not introduce facts that are not present in it."
        );

        let deep_analysis = with_retry(&self.retry, "analysis inference", || {
            self.inference
                .complete(&self.profile.role_prompt, &prompt, self.profile.temperature)
        })
        .await?;

        tracing::info!(
            key_points = key_points.len(),
            themes = ?themes,
            "analysis completed"
        );

        Ok(StageUpdate {
            key_points: Some(key_points),
            themes: Some(themes),
            deep_analysis: Some(deep_analysis),
            ..Default::default()
        })
    }
}
