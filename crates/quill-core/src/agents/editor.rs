//! Editor: revises the draft into the final article.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AgentProfile, RetryPolicy};
use crate::error::ProviderError;
use crate::providers::{with_retry, InferenceProvider};
use crate::skills::analysis::truncate_at_boundary;
use crate::skills::{editing, writing};
use crate::stage::{StageExecutor, StageName};
use crate::state::{Field, StageUpdate, WorkflowState};

const REPORT_PROMPT_CAP: usize = 1500;

/// Stage 6. `final_content` is a strict revision of the draft, never a fresh
/// generation. Unsupported claims from the fact check are revised or
/// qualified, and each one is flagged in `editing_report`.
pub struct Editor {
    inference: Arc<dyn InferenceProvider>,
    profile: AgentProfile,
    retry: RetryPolicy,
}

impl Editor {
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
impl StageExecutor for Editor {
    fn name(&self) -> StageName {
        StageName::Editor
    }

    fn required_inputs(&self) -> &'static [Field] {
        &[
            Field::DraftContent,
            Field::FactCheckReport,
            Field::VerifiedClaims,
        ]
    }

    fn produced_outputs(&self) -> &'static [Field] {
        &[Field::FinalContent, Field::EditingReport]
    }

    async fn execute(&self, state: &WorkflowState) -> Result<StageUpdate, ProviderError> {
        let draft = state
            .draft_content
            .as_deref()
            .expect("engine validated draft_content is populated");
        let fact_check = state
            .fact_check_report
            .as_deref()
            .expect("engine validated fact_check_report is populated");
        let claims = state
            .verified_claims
            .as_deref()
            .expect("engine validated verified_claims is populated");

        let editing_report = editing::render_report(draft, claims);

        let prompt = format!(
            "Revise and improve this article:\n\n{draft}\n\n\
             Editing report:\n{editing}\n\n\
             Fact-check findings:\n{fact_check}\n\n\
             Tasks:\n\
             1. Fix grammatical and structural issues\n\
             2. Improve clarity and flow\n\
             3. Qualify or correct any unsupported claims; do not silently drop them\n\
             4. Keep the article's topic, structure, and key information intact\n\n\
             This is a revision of the article above, not a new article. \
             Provide the complete improved version.",
            editing = truncate_at_boundary(&editing_report, REPORT_PROMPT_CAP),
            fact_check = truncate_at_boundary(fact_check, REPORT_PROMPT_CAP),
        );

        let completion = with_retry(&self.retry, "editing inference", || {
            self.inference
                .complete(&self.profile.role_prompt, &prompt, self.profile.temperature)
        })
        .await?;

        let final_content = writing::polish(&completion);
        tracing::info!(
            words = writing::word_count(&final_content),
            "editing completed"
        );

        Ok(StageUpdate {
            final_content: Some(final_content),
            editing_report: Some(editing_report),
            ..Default::default()
        })
    }
}
