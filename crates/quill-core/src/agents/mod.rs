//! Stage executors ("agents").
//!
//! Each agent wraps one or more capability modules plus a single inference
//! call configured with a fixed role prompt and temperature from its
//! [`AgentProfile`](crate::config::AgentProfile). Agents read only their
//! declared state fields and return a partial update; the engine owns the
//! merge.

pub mod analyst;
pub mod coordinator;
pub mod editor;
pub mod fact_checker;
pub mod searcher;
pub mod writer;

pub use analyst::DataAnalyst;
pub use coordinator::ResearchCoordinator;
pub use editor::Editor;
pub use fact_checker::FactChecker;
pub use searcher::WebSearcher;
pub use writer::ContentWriter;
