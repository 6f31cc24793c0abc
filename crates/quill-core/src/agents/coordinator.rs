//! Research Coordinator: turns the topic into a research plan.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AgentProfile, RetryPolicy};
use crate::error::ProviderError;
use crate::providers::{with_retry, InferenceProvider};
use crate::skills::planning;
use crate::stage::{StageExecutor, StageName};
use crate::state::{Field, ResearchPlan, StageUpdate, WorkflowState};

/// Stage 1. Produces `research_plan` with between 1 and
/// `max_search_queries` distinct queries. A shortfall against the budget is
/// accepted but reported as a warning.
pub struct ResearchCoordinator {
    inference: Arc<dyn InferenceProvider>,
    profile: AgentProfile,
    retry: RetryPolicy,
}

impl ResearchCoordinator {
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

    /// Parse model-proposed queries: one per line, list markers stripped.
    fn parse_queries(completion: &str) -> Vec<String> {
        completion
            .lines()
            .map(|line| {
                line.trim()
                    .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == '-')
                    .trim()
                    .trim_matches('"')
                    .to_string()
            })
            .filter(|line| !line.is_empty())
            .collect()
    }
}

#[async_trait]
impl StageExecutor for ResearchCoordinator {
    fn name(&self) -> StageName {
        StageName::ResearchCoordinator
    }

    fn required_inputs(&self) -> &'static [Field] {
        &[Field::Topic, Field::Depth]
    }

    fn produced_outputs(&self) -> &'static [Field] {
        &[Field::ResearchPlan]
    }

    async fn execute(&self, state: &WorkflowState) -> Result<StageUpdate, ProviderError> {
        let budget = state.max_search_queries;
        let scaffold = planning::build_plan(&state.topic, state.depth, budget);

        let prompt = format!(
            "Create a research strategy for the topic: {topic}\n\n\
             The initial plan includes:\n\
             - Objectives: {objectives}\n\
             - Candidate queries: {queries}\n\n\
             Propose up to {budget} effective web search queries for this topic, \
             one per line, nothing else.",
            topic = state.topic,
            objectives = scaffold.objectives.join(", "),
            queries = scaffold.queries.join(", "),
        );

        let completion = with_retry(&self.retry, "coordinator inference", || {
            self.inference
                .complete(&self.profile.role_prompt, &prompt, self.profile.temperature)
        })
        .await?;

        // Model-proposed queries first, template scaffold as backstop, all
        // distinct, capped at the depth budget.
        let mut queries: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for candidate in Self::parse_queries(&completion)
            .into_iter()
            .chain(scaffold.queries.iter().cloned())
        {
            let key = candidate.to_lowercase();
            if !seen.contains(&key) {
                seen.push(key);
                queries.push(candidate);
            }
            if queries.len() == budget {
                break;
            }
        }

        let mut update = StageUpdate::default();
        if queries.len() < budget {
            let warning = format!(
                "research coordinator produced {} of {} requested queries",
                queries.len(),
                budget
            );
            tracing::warn!("{warning}");
            update.warnings.push(warning);
        }

        tracing::info!(
            topic = %state.topic,
            queries = queries.len(),
            budget,
            "research plan created"
        );

        update.research_plan = Some(ResearchPlan {
            topic: scaffold.topic,
            objectives: scaffold.objectives,
            queries,
        });
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Depth;

    #[test]
    fn parses_numbered_and_bulleted_lines() {
        let completion = "1. solar power overview\n- what is solar power\n\n\"solar trends\"\n";
        let queries = ResearchCoordinator::parse_queries(completion);
        assert_eq!(
            queries,
            vec!["solar power overview", "what is solar power", "solar trends"]
        );
    }

    /// Proposes a single query, duplicating the scaffold's first candidate.
    struct OneLiner;

    #[async_trait]
    impl crate::providers::InferenceProvider for OneLiner {
        async fn complete(
            &self,
            _role_prompt: &str,
            _user_content: &str,
            _temperature: f32,
        ) -> Result<String, ProviderError> {
            Ok("solar farms overview".to_string())
        }
    }

    #[tokio::test]
    async fn budget_shortfall_is_reported_as_a_warning() {
        let coordinator = ResearchCoordinator::new(
            Arc::new(OneLiner),
            AgentProfile {
                role_prompt: "Research Coordinator".to_string(),
                temperature: 0.3,
            },
            RetryPolicy {
                max_attempts: 1,
                base_delay_ms: 1,
            },
        );

        // Budget far above what the model plus the scaffold can supply.
        let state = WorkflowState::new("solar farms", Depth::Shallow, 9);
        let update = coordinator.execute(&state).await.unwrap();

        let plan = update.research_plan.unwrap();
        assert!(!plan.queries.is_empty());
        assert!(plan.queries.len() < 9);
        assert_eq!(update.warnings.len(), 1);
        assert!(update.warnings[0].contains("of 9 requested queries"));
    }
}
