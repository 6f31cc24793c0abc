//! Stage executor contract.
//!
//! Each of the six pipeline stages implements [`StageExecutor`]: a declared
//! set of required input fields, a declared set of produced output fields,
//! and one `execute` operation that reads only its declared inputs and
//! returns a partial state update. The engine validates both sides of the
//! contract; executors never mutate shared state directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProviderError;
use crate::state::{Field, StageUpdate, WorkflowState};

/// The six stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    ResearchCoordinator,
    WebSearcher,
    DataAnalyst,
    ContentWriter,
    FactChecker,
    Editor,
}

impl StageName {
    /// All stages in execution order.
    pub const ORDER: [StageName; 6] = [
        StageName::ResearchCoordinator,
        StageName::WebSearcher,
        StageName::DataAnalyst,
        StageName::ContentWriter,
        StageName::FactChecker,
        StageName::Editor,
    ];
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageName::ResearchCoordinator => "research_coordinator",
            StageName::WebSearcher => "web_searcher",
            StageName::DataAnalyst => "data_analyst",
            StageName::ContentWriter => "content_writer",
            StageName::FactChecker => "fact_checker",
            StageName::Editor => "editor",
        };
        f.write_str(s)
    }
}

/// One unit of the fixed pipeline. Implementations wrap capability modules
/// plus an inference call configured with a fixed role prompt and
/// temperature.
///
/// `execute` must be a pure function of the fields it declares in
/// [`required_inputs`](Self::required_inputs): the engine is entitled to
/// supply a state where every other field holds junk, and a correct executor
/// still succeeds. Collaborator retries are the executor's own policy; any
/// unrecovered failure surfaces as a [`ProviderError`] which the engine wraps
/// with the stage name.
#[async_trait]
pub trait StageExecutor: Send + Sync {
    /// The stage's position in the pipeline.
    fn name(&self) -> StageName;

    /// Fields that must be populated before this stage runs.
    fn required_inputs(&self) -> &'static [Field];

    /// Fields this stage populates. Disjoint from every other stage's.
    fn produced_outputs(&self) -> &'static [Field];

    /// Run the stage against the current state, returning new fields only.
    async fn execute(&self, state: &WorkflowState) -> Result<StageUpdate, ProviderError>;
}
