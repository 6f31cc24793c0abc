//! Capability modules ("skills").
//!
//! Stateless transformation logic over plain data, consumed by one or more
//! stage executors. No skill knows about the pipeline, the shared state, or
//! the collaborator traits — agents wire those together.

pub mod analysis;
pub mod editing;
pub mod fact_check;
pub mod planning;
pub mod search;
pub mod writing;
