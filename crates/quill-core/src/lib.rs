//! Quill Core - orchestration engine for a multi-agent research and content
//! creation pipeline.
//!
//! Quill turns a topic string into a fact-checked, edited article by driving
//! a fixed sequence of six role-specialized agents:
//!
//! ```text
//! topic ──> Research Coordinator ──> Web Searcher ──> Data Analyst
//!                                                          │
//!              Editor <── Fact Checker <── Content Writer <─┘
//!                │
//!                v
//!          final article
//! ```
//!
//! # Architecture
//!
//! - **Skills** (`skills`): stateless capability modules — pure
//!   transformations over plain data, no orchestration awareness.
//! - **Agents** (`agents`): stage executors wrapping skills plus one
//!   inference call under a fixed role prompt and temperature.
//! - **State** (`state`): the single typed record threaded through all
//!   stages, append-only with centrally enforced write-once discipline.
//! - **Engine** (`engine`): the fixed stage sequence, per-stage contract
//!   validation, failure isolation, and the run deadline.
//! - **Providers** (`providers`): opaque inference and search collaborators
//!   behind async traits.
//! - **Governance** (`governance`): optional pre/post hooks around a run.
//!
//! # Design principles
//!
//! 1. The pipeline topology is data, not machinery: an ordered list of stage
//!    descriptors, no general graph engine.
//! 2. Stages declare their contracts; the engine enforces them. A stage that
//!    misbehaves fails its run loudly instead of corrupting downstream
//!    stages.
//! 3. All-or-nothing runs: no partial state ever escapes a failed run.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod agents;
pub mod config;
pub mod engine;
pub mod error;
pub mod governance;
pub mod providers;
pub mod skills;
pub mod stage;
pub mod state;

pub use config::{AgentProfile, DepthTable, PipelineConfig, RetryPolicy};
pub use engine::{Pipeline, WorkflowPhase};
pub use error::{ProviderError, Result, WorkflowError};
pub use governance::{BasicGovernance, GovernancePolicy, GovernanceReport};
pub use providers::{InferenceProvider, SearchDoc, SearchProvider};
pub use stage::{StageExecutor, StageName};
pub use state::{
    Depth, Field, ResearchPlan, SearchHit, StageUpdate, Verdict, VerifiedClaim, WorkflowState,
};
