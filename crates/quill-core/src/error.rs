//! Error types for the Quill orchestration engine.
//!
//! We use `thiserror` for ergonomic error definitions. The taxonomy mirrors
//! the engine's failure semantics: configuration and governance problems are
//! reported before any stage runs, stage-level failures carry the name of the
//! failing stage, and a deadline overrun discards the whole run.

use thiserror::Error;

use crate::stage::StageName;
use crate::state::Field;

/// Result type alias for Quill operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Main error type for a pipeline run.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Bad `topic` or `depth` at entry. User-correctable; no stage has run.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Governance pre-hook veto. No stage has run.
    #[error("input rejected by governance: {}", diagnostics.join("; "))]
    InputRejected {
        /// Human-readable reasons from the governance policy.
        diagnostics: Vec<String>,
    },

    /// A stage was invoked while one of its declared required inputs was
    /// absent or empty. Internal-consistency failure; fatal to the run.
    #[error("stage {stage} is missing required input field(s): {fields:?}")]
    StageInputMissing {
        /// The stage whose contract was violated.
        stage: StageName,
        /// Every declared input that was absent, not just the first.
        fields: Vec<Field>,
    },

    /// A collaborator call failed irrecoverably inside a stage. The partial
    /// state accumulated so far is discarded.
    #[error("stage {stage} failed: {source}")]
    StageExecution {
        /// The stage that failed.
        stage: StageName,
        /// The underlying cause.
        #[source]
        source: ProviderError,
    },

    /// A stage broke its output contract: it tried to overwrite a populated
    /// field, or finished without producing a declared output.
    #[error("stage {stage} contract breach: {detail}")]
    StageContract {
        /// The offending stage.
        stage: StageName,
        /// What was overwritten or left unproduced.
        detail: String,
    },

    /// The run exceeded its depth-derived deadline. No partial state is
    /// returned.
    #[error("workflow timed out after {deadline_secs}s (phase: {phase})")]
    Timeout {
        /// The configured deadline that was exceeded.
        deadline_secs: u64,
        /// The phase in flight when the deadline hit.
        phase: String,
    },
}

/// Errors surfaced by external collaborators (inference, search).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The inference provider could not produce a completion.
    #[error("inference unavailable: {0}")]
    InferenceUnavailable(String),

    /// The search provider could not serve a query.
    #[error("search unavailable for {query:?}: {reason}")]
    SearchUnavailable {
        /// The query that failed.
        query: String,
        /// Provider-reported reason.
        reason: String,
    },

    /// Transport-level failure beneath a provider.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a payload we could not interpret.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl WorkflowError {
    /// True for outcomes that happen before any stage executes.
    pub fn rejected_before_start(&self) -> bool {
        matches!(
            self,
            WorkflowError::InvalidConfiguration(_) | WorkflowError::InputRejected { .. }
        )
    }

    /// The failing stage, when the error is attributable to one.
    pub fn failing_stage(&self) -> Option<StageName> {
        match self {
            WorkflowError::StageInputMissing { stage, .. }
            | WorkflowError::StageExecution { stage, .. }
            | WorkflowError::StageContract { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
