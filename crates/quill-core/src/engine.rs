//! The orchestration engine.
//!
//! [`Pipeline`] owns the fixed six-stage sequence as an ordered list of
//! stage executors and drives one state record through it. Before each stage
//! it validates the stage's declared required inputs; after each stage it
//! merges the partial update under the write-once rule and checks that every
//! declared output was actually produced. Any stage failure halts the run —
//! stages are never retried by the engine and partial state is never
//! returned.
//!
//! The whole run executes under a depth-derived deadline: exceeding it
//! surfaces as [`WorkflowError::Timeout`] with no state at all.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::agents::{
    ContentWriter, DataAnalyst, Editor, FactChecker, ResearchCoordinator, WebSearcher,
};
use crate::config::PipelineConfig;
use crate::error::{Result, WorkflowError};
use crate::governance::GovernancePolicy;
use crate::providers::{InferenceProvider, SearchProvider};
use crate::stage::{StageExecutor, StageName};
use crate::state::{Depth, Field, WorkflowState};

/// Run lifecycle. Each phase corresponds to one stage in flight; `Completed`
/// means all six stage outputs are present, `Failed` that the run was
/// discarded partway through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Initialized,
    Planning,
    Searching,
    Analyzing,
    Writing,
    FactChecking,
    Editing,
    Completed,
    Failed,
}

impl WorkflowPhase {
    fn for_stage(stage: StageName) -> Self {
        match stage {
            StageName::ResearchCoordinator => WorkflowPhase::Planning,
            StageName::WebSearcher => WorkflowPhase::Searching,
            StageName::DataAnalyst => WorkflowPhase::Analyzing,
            StageName::ContentWriter => WorkflowPhase::Writing,
            StageName::FactChecker => WorkflowPhase::FactChecking,
            StageName::Editor => WorkflowPhase::Editing,
        }
    }
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowPhase::Initialized => "initialized",
            WorkflowPhase::Planning => "planning",
            WorkflowPhase::Searching => "searching",
            WorkflowPhase::Analyzing => "analyzing",
            WorkflowPhase::Writing => "writing",
            WorkflowPhase::FactChecking => "fact_checking",
            WorkflowPhase::Editing => "editing",
            WorkflowPhase::Completed => "completed",
            WorkflowPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// The orchestration engine: fixed stage order, centralized contract
/// enforcement, one exclusive state record per run. Independent runs may
/// execute concurrently; nothing is shared between them but this read-only
/// pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    stages: Vec<Box<dyn StageExecutor>>,
    governance: Option<Arc<dyn GovernancePolicy>>,
}

impl Pipeline {
    /// Build the standard six-stage pipeline over the given collaborators.
    pub fn new(
        config: PipelineConfig,
        inference: Arc<dyn InferenceProvider>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        let retry = config.retry;
        let stages: Vec<Box<dyn StageExecutor>> = vec![
            Box::new(ResearchCoordinator::new(
                inference.clone(),
                config.coordinator.clone(),
                retry,
            )),
            Box::new(WebSearcher::new(
                search.clone(),
                inference.clone(),
                config.searcher.clone(),
                retry,
                config.results_per_query,
            )),
            Box::new(DataAnalyst::new(
                inference.clone(),
                config.analyst.clone(),
                retry,
            )),
            Box::new(ContentWriter::new(
                inference.clone(),
                config.writer.clone(),
                retry,
                config.target_word_count,
            )),
            Box::new(FactChecker::new(
                inference.clone(),
                search,
                config.fact_checker.clone(),
                retry,
                config.results_per_query,
            )),
            Box::new(Editor::new(inference, config.editor.clone(), retry)),
        ];

        Self {
            config,
            stages,
            governance: None,
        }
    }

    /// Attach a governance policy (pre- and post-hooks).
    pub fn with_governance(mut self, policy: Arc<dyn GovernancePolicy>) -> Self {
        self.governance = Some(policy);
        self
    }

    /// Execute the complete workflow for one topic.
    ///
    /// On success the returned state has every stage output populated. Any
    /// failure discards the partial state; the error distinguishes
    /// rejected-before-start, failed-at-stage, and timed-out outcomes.
    pub async fn run(&self, topic: &str, depth: Depth) -> Result<WorkflowState> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(WorkflowError::InvalidConfiguration(
                "topic must be non-empty".to_string(),
            ));
        }

        if let Some(policy) = &self.governance {
            let report = policy.validate_input(topic, depth);
            if !report.accepted {
                tracing::warn!(diagnostics = ?report.diagnostics, "input rejected by governance");
                return Err(WorkflowError::InputRejected {
                    diagnostics: report.diagnostics,
                });
            }
        }

        let deadline = self.config.deadline(depth);
        let state = WorkflowState::new(topic, depth, self.config.query_budget(depth));
        tracing::info!(
            run_id = %state.run_id,
            topic = %state.topic,
            %depth,
            budget = state.max_search_queries,
            "workflow starting"
        );

        let phase = Arc::new(Mutex::new(WorkflowPhase::Initialized));
        let driven = tokio::time::timeout(deadline, self.drive(state, phase.clone())).await;

        let mut state = match driven {
            Err(_elapsed) => {
                let phase = lock_phase(&phase).to_string();
                tracing::error!(%phase, "workflow deadline exceeded");
                return Err(WorkflowError::Timeout {
                    deadline_secs: deadline.as_secs(),
                    phase,
                });
            }
            Ok(Err(err)) => {
                *lock_phase(&phase) = WorkflowPhase::Failed;
                return Err(err);
            }
            Ok(Ok(state)) => state,
        };

        self.apply_post_hooks(&mut state);
        tracing::info!(run_id = %state.run_id, "workflow completed");
        Ok(state)
    }

    /// Run the stages in order, enforcing both sides of each contract.
    async fn drive(
        &self,
        mut state: WorkflowState,
        phase: Arc<Mutex<WorkflowPhase>>,
    ) -> Result<WorkflowState> {
        for stage in &self.stages {
            let name = stage.name();
            *lock_phase(&phase) = WorkflowPhase::for_stage(name);

            validate_required_inputs(stage.as_ref(), &state)?;

            tracing::info!(stage = %name, "stage starting");
            let update = stage
                .execute(&state)
                .await
                .map_err(|source| WorkflowError::StageExecution {
                    stage: name,
                    source,
                })?;

            state.merge(name, update)?;

            let unproduced: Vec<Field> = stage
                .produced_outputs()
                .iter()
                .copied()
                .filter(|field| !state.is_populated(*field))
                .collect();
            if !unproduced.is_empty() {
                return Err(WorkflowError::StageContract {
                    stage: name,
                    detail: format!("declared outputs not produced: {unproduced:?}"),
                });
            }

            tracing::info!(stage = %name, "stage completed");
        }

        *lock_phase(&phase) = WorkflowPhase::Completed;
        Ok(state)
    }

    /// Governance post-hooks on the final article. Findings are appended as
    /// warnings; a completed run is never retroactively failed.
    fn apply_post_hooks(&self, state: &mut WorkflowState) {
        let Some(policy) = &self.governance else {
            return;
        };
        let Some(final_content) = state.final_content.clone() else {
            return;
        };

        let safety = policy.check_safety(&final_content);
        if !safety.accepted {
            for finding in safety.diagnostics {
                tracing::warn!(%finding, "content safety finding");
                state.warnings.push(format!("safety: {finding}"));
            }
        }

        let bias = policy.detect_bias(&final_content);
        for finding in bias.diagnostics {
            tracing::warn!(%finding, "bias finding");
            state.warnings.push(format!("bias: {finding}"));
        }
    }
}

/// Check that every input a stage declares is populated in `state`.
///
/// The engine calls this before dispatching each stage; it is public so a
/// stage executor can be exercised against an arbitrary state in tests.
pub fn validate_required_inputs(stage: &dyn StageExecutor, state: &WorkflowState) -> Result<()> {
    let missing: Vec<Field> = stage
        .required_inputs()
        .iter()
        .copied()
        .filter(|field| !state.is_populated(*field))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::StageInputMissing {
            stage: stage.name(),
            fields: missing,
        })
    }
}

fn lock_phase(phase: &Mutex<WorkflowPhase>) -> std::sync::MutexGuard<'_, WorkflowPhase> {
    phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
