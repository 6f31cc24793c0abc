//! Pipeline configuration.
//!
//! All tunables live in one read-only [`PipelineConfig`] constructed at
//! process start and passed explicitly to the engine and agents — no
//! module-level globals. Defaults reproduce the standard depth tables; a
//! TOML file can override them.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::WorkflowError;
use crate::stage::StageName;
use crate::state::Depth;

/// Per-depth lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthTable<T> {
    pub shallow: T,
    pub medium: T,
    pub deep: T,
}

impl<T: Copy> DepthTable<T> {
    /// Value for the given depth.
    pub fn get(&self, depth: Depth) -> T {
        match depth {
            Depth::Shallow => self.shallow,
            Depth::Medium => self.medium,
            Depth::Deep => self.deep,
        }
    }
}

/// Immutable per-agent configuration, supplied at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Fixed role prompt sent as the system message.
    pub role_prompt: String,
    /// Sampling temperature for this agent's inference calls.
    pub temperature: f32,
}

/// Retry policy for collaborator calls. Retries are a stage-local concern;
/// the engine itself never retries a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 250,
        }
    }
}

/// Central pipeline configuration. Read-only after process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Depth → maximum search queries: {shallow: 2, medium: 5, deep: 8}.
    pub max_search_queries: DepthTable<usize>,

    /// Depth → soft target article length in words.
    pub target_word_count: DepthTable<usize>,

    /// Depth → overall run deadline in seconds. The whole run is
    /// all-or-nothing against this budget.
    pub deadline_secs: DepthTable<u64>,

    /// Search results requested per query.
    pub results_per_query: usize,

    /// Retry policy applied at collaborator call sites.
    pub retry: RetryPolicy,

    /// Role prompts and temperatures, one per stage.
    pub coordinator: AgentProfile,
    pub searcher: AgentProfile,
    pub analyst: AgentProfile,
    pub writer: AgentProfile,
    pub fact_checker: AgentProfile,
    pub editor: AgentProfile,
}

fn role_prompt(name: &str, role: &str, skills: &str) -> String {
    format!(
        "You are {name}, a specialized AI agent.\n\n\
         Role: {role}\n\n\
         Skills: you have access to the following capabilities: {skills}\n\n\
         Use your skills to accomplish your role in the research and content \
         creation workflow. Be concise, accurate, and focused on your \
         designated responsibilities."
    )
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_search_queries: DepthTable {
                shallow: 2,
                medium: 5,
                deep: 8,
            },
            target_word_count: DepthTable {
                shallow: 500,
                medium: 1000,
                deep: 1500,
            },
            deadline_secs: DepthTable {
                shallow: 30,
                medium: 90,
                deep: 180,
            },
            results_per_query: 3,
            retry: RetryPolicy::default(),
            coordinator: AgentProfile {
                role_prompt: role_prompt(
                    "Research Coordinator",
                    "strategic planning and workflow coordination",
                    "Planning",
                ),
                temperature: 0.3,
            },
            searcher: AgentProfile {
                role_prompt: role_prompt(
                    "Web Search Agent",
                    "information retrieval and web search",
                    "Search",
                ),
                temperature: 0.2,
            },
            analyst: AgentProfile {
                role_prompt: role_prompt(
                    "Data Analyst",
                    "information analysis and synthesis",
                    "Analysis",
                ),
                temperature: 0.4,
            },
            writer: AgentProfile {
                role_prompt: role_prompt(
                    "Content Writer",
                    "professional content creation",
                    "Writing",
                ),
                temperature: 0.7,
            },
            fact_checker: AgentProfile {
                role_prompt: role_prompt(
                    "Fact Checker",
                    "fact verification and accuracy",
                    "FactChecking, Search",
                ),
                temperature: 0.2,
            },
            editor: AgentProfile {
                role_prompt: role_prompt(
                    "Editor",
                    "content quality assurance and editing",
                    "Editing",
                ),
                temperature: 0.5,
            },
        }
    }
}

impl PipelineConfig {
    /// Configuration with default tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the per-depth deadlines (useful for tests).
    pub fn with_deadlines(mut self, deadline_secs: DepthTable<u64>) -> Self {
        self.deadline_secs = deadline_secs;
        self
    }

    /// Query budget for a depth.
    pub fn query_budget(&self, depth: Depth) -> usize {
        self.max_search_queries.get(depth)
    }

    /// Soft word-count target for a depth.
    pub fn word_target(&self, depth: Depth) -> usize {
        self.target_word_count.get(depth)
    }

    /// Run deadline for a depth.
    pub fn deadline(&self, depth: Depth) -> Duration {
        Duration::from_secs(self.deadline_secs.get(depth))
    }

    /// Profile for a stage.
    pub fn profile(&self, stage: StageName) -> &AgentProfile {
        match stage {
            StageName::ResearchCoordinator => &self.coordinator,
            StageName::WebSearcher => &self.searcher,
            StageName::DataAnalyst => &self.analyst,
            StageName::ContentWriter => &self.writer,
            StageName::FactChecker => &self.fact_checker,
            StageName::Editor => &self.editor,
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            WorkflowError::InvalidConfiguration(format!(
                "cannot read config {}: {e}",
                path.as_ref().display()
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| WorkflowError::InvalidConfiguration(format!("bad config file: {e}")))
    }
}
