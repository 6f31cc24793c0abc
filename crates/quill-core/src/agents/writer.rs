//! Content Writer: turns analysis into a structured draft article.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AgentProfile, DepthTable, RetryPolicy};
use crate::error::ProviderError;
use crate::providers::{with_retry, InferenceProvider};
use crate::skills::analysis::truncate_at_boundary;
use crate::skills::writing;
use crate::stage::{StageExecutor, StageName};
use crate::state::{Field, StageUpdate, WorkflowState};

const ANALYSIS_PROMPT_CAP: usize = 2000;

/// Stage 4. Draft length tracks the depth-implied target as a soft goal;
/// the engine never fails a run for missing the word count.
pub struct ContentWriter {
    inference: Arc<dyn InferenceProvider>,
    profile: AgentProfile,
    retry: RetryPolicy,
    word_target: DepthTable<usize>,
}

impl ContentWriter {
    pub fn new(
        inference: Arc<dyn InferenceProvider>,
        profile: AgentProfile,
        retry: RetryPolicy,
        word_target: DepthTable<usize>,
    ) -> Self {
        Self {
            inference,
            profile,
            retry,
            word_target,
        }
    }
}

#[async_trait]
impl StageExecutor for ContentWriter {
    fn name(&self) -> StageName {
        StageName::ContentWriter
    }

    fn required_inputs(&self) -> &'static [Field] {
        &[Field::Topic, Field::Depth, Field::KeyPoints, Field::DeepAnalysis]
    }

    fn produced_outputs(&self) -> &'static [Field] {
        &[Field::DraftContent, Field::Outline]
    }

    async fn execute(&self, state: &WorkflowState) -> Result<StageUpdate, ProviderError> {
        let key_points = state
            .key_points
            .as_deref()
            .expect("engine validated key_points is populated");
        let deep_analysis = state
            .deep_analysis
            .as_deref()
            .expect("engine validated deep_analysis is populated");

        let target_words = self.word_target.get(state.depth);
        let outline = writing::build_outline(&state.topic, key_points);

        let bullet_points: String = key_points
            .iter()
            .take(5)
            .map(|p| format!("- {p}\n"))
            .collect();

        let prompt = format!(
            "Create a comprehensive, well-written article on: {topic}\n\n\
             Use this research and analysis:\n{analysis}\n\n\
             Key points to cover:\n{bullet_points}\n\
             Requirements:\n\
             - Write an engaging introduction\n\
             - Create 3-5 main sections with clear headings\n\
             - Use concrete examples and insights from the research\n\
             - Include a strong conclusion\n\
             - Aim for approximately {target_words} words\n\
             - Use markdown formatting\n\n\
             Write the complete article now.",
            topic = state.topic,
            analysis = truncate_at_boundary(deep_analysis, ANALYSIS_PROMPT_CAP),
        );

        let completion = with_retry(&self.retry, "draft inference", || {
            self.inference
                .complete(&self.profile.role_prompt, &prompt, self.profile.temperature)
        })
        .await?;

        let draft = writing::polish(&completion);
        tracing::info!(
            words = writing::word_count(&draft),
            target = target_words,
            sections = outline.len(),
            "draft created"
        );

        Ok(StageUpdate {
            draft_content: Some(draft),
            outline: Some(outline),
            ..Default::default()
        })
    }
}
