//! Planning skill: research plans, search queries, workflow summaries.

use crate::state::{Depth, ResearchPlan};

/// Build a structured research plan. Queries are distinct and never exceed
/// `max_queries`; at least one is always produced for a non-empty topic.
pub fn build_plan(topic: &str, depth: Depth, max_queries: usize) -> ResearchPlan {
    ResearchPlan {
        topic: topic.to_string(),
        objectives: objectives_for(topic, depth),
        queries: generate_queries(topic, depth, max_queries),
    }
}

fn objectives_for(topic: &str, depth: Depth) -> Vec<String> {
    match depth {
        Depth::Shallow => vec![
            format!("Understand the basics of {topic}"),
            "Identify key concepts and definitions".to_string(),
        ],
        Depth::Medium => vec![
            format!("Understand the fundamentals of {topic}"),
            "Explore current trends and developments".to_string(),
            "Identify key players and experts".to_string(),
            "Understand practical applications".to_string(),
        ],
        Depth::Deep => vec![
            format!("Comprehensive analysis of {topic}"),
            "Historical context and evolution".to_string(),
            "Current state and trends".to_string(),
            "Future implications and predictions".to_string(),
            "Critical analysis and expert opinions".to_string(),
        ],
    }
}

/// Generate search queries for the topic, deduplicated (case-insensitive)
/// and truncated to `max_queries`.
pub fn generate_queries(topic: &str, depth: Depth, max_queries: usize) -> Vec<String> {
    let base = [
        format!("{topic} overview"),
        format!("what is {topic}"),
        format!("{topic} latest trends"),
    ];
    let medium = [
        format!("{topic} applications"),
        format!("{topic} benefits and challenges"),
        format!("{topic} expert insights"),
    ];
    let deep = [
        format!("{topic} history and evolution"),
        format!("{topic} future predictions"),
        format!("{topic} research papers"),
        format!("{topic} industry analysis"),
    ];

    let candidates: Vec<String> = match depth {
        Depth::Shallow => base.into_iter().take(2).collect(),
        Depth::Medium => base.into_iter().chain(medium.into_iter().take(2)).collect(),
        Depth::Deep => base
            .into_iter()
            .chain(medium)
            .chain(deep)
            .collect(),
    };

    let mut seen = Vec::new();
    let mut queries = Vec::new();
    for candidate in candidates {
        let key = candidate.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            queries.push(candidate);
        }
        if queries.len() == max_queries {
            break;
        }
    }
    queries
}

/// Render a human-readable workflow summary for a plan.
pub fn plan_summary(plan: &ResearchPlan) -> String {
    let mut summary = format!("# Research Workflow for: {}\n\n", plan.topic);

    summary.push_str("## Objectives\n");
    for (i, objective) in plan.objectives.iter().enumerate() {
        summary.push_str(&format!("{}. {objective}\n", i + 1));
    }

    summary.push_str("\n## Search Strategy\n");
    summary.push_str("The following queries will be executed:\n");
    for (i, query) in plan.queries.iter().enumerate() {
        summary.push_str(&format!("{}. \"{query}\"\n", i + 1));
    }

    summary
}
