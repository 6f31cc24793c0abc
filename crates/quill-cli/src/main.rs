use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use quill_core::providers::groq::GroqClient;
use quill_core::providers::serper::SerperClient;
use quill_core::skills::planning;
use quill_core::{BasicGovernance, Depth, Pipeline, PipelineConfig, WorkflowState};

/// Quill - multi-agent research and content creation pipeline
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file overriding the default pipeline configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full six-stage pipeline for a topic
    Run {
        /// Research topic
        topic: String,

        /// Research depth: shallow, medium, or deep
        #[arg(short, long, default_value = "medium")]
        depth: String,

        /// Directory for the generated artifacts
        #[arg(short, long, value_name = "DIR", default_value = "quill-output")]
        output_dir: PathBuf,
    },

    /// Print the research plan scaffold without calling any provider
    Plan {
        /// Research topic
        topic: String,

        /// Research depth: shallow, medium, or deep
        #[arg(short, long, default_value = "medium")]
        depth: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill_core=info,quill_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Run {
            topic,
            depth,
            output_dir,
        } => {
            let depth: Depth = depth.parse()?;
            run_pipeline(config, &topic, depth, &output_dir).await
        }
        Commands::Plan { topic, depth } => {
            let depth: Depth = depth.parse()?;
            let plan = planning::build_plan(&topic, depth, config.query_budget(depth));
            println!("{}", planning::plan_summary(&plan));
            Ok(())
        }
    }
}

async fn run_pipeline(
    config: PipelineConfig,
    topic: &str,
    depth: Depth,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let groq_key = std::env::var("GROQ_API_KEY")
        .context("GROQ_API_KEY is not set (in the environment or a .env file)")?;
    let serper_key = std::env::var("SERPER_API_KEY")
        .context("SERPER_API_KEY is not set (in the environment or a .env file)")?;

    let mut groq = GroqClient::new(groq_key);
    if let Ok(model) = std::env::var("QUILL_MODEL") {
        groq = groq.with_model(model);
    }
    let serper = SerperClient::new(serper_key);

    let pipeline = Pipeline::new(config, Arc::new(groq), Arc::new(serper))
        .with_governance(Arc::new(BasicGovernance));

    println!("Researching {} ({depth} depth)...", topic.bold());

    match pipeline.run(topic, depth).await {
        Ok(state) => {
            write_artifacts(&state, output_dir)?;
            print_summary(&state, output_dir);
            Ok(())
        }
        Err(err) => {
            let outcome = if err.rejected_before_start() {
                "rejected before start".to_string()
            } else if let Some(stage) = err.failing_stage() {
                format!("failed at stage {stage}")
            } else {
                "timed out".to_string()
            };
            eprintln!("{} workflow {outcome}: {err}", "error:".red().bold());
            Err(err.into())
        }
    }
}

/// Write the run's artifacts: the article plus the supporting reports and
/// the raw state for downstream tooling.
fn write_artifacts(state: &WorkflowState, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;

    let article = state
        .final_content
        .as_deref()
        .context("completed run is missing final content")?;
    std::fs::write(dir.join("final_article.md"), article)?;

    if let Some(plan) = &state.research_plan {
        std::fs::write(dir.join("research_plan.md"), planning::plan_summary(plan))?;
    }
    if let Some(report) = &state.fact_check_report {
        std::fs::write(dir.join("fact_check_report.md"), report)?;
    }
    if let Some(report) = &state.editing_report {
        std::fs::write(dir.join("editing_report.md"), report)?;
    }
    std::fs::write(dir.join("state.json"), serde_json::to_string_pretty(state)?)?;

    Ok(())
}

fn print_summary(state: &WorkflowState, dir: &Path) {
    println!();
    println!("{} run {}", "completed".green().bold(), state.run_id);
    if let Some(plan) = &state.research_plan {
        println!("  queries executed: {}", plan.queries.len());
    }
    if let Some(hits) = &state.search_results {
        println!("  sources gathered: {}", hits.len());
    }
    if let Some(checked) = state.claims_checked {
        println!("  claims checked:   {checked}");
    }
    if let Some(article) = &state.final_content {
        println!(
            "  article length:   {} words",
            article.split_whitespace().count()
        );
    }

    if !state.warnings.is_empty() {
        println!();
        println!("{}", "warnings:".yellow().bold());
        for warning in &state.warnings {
            println!("  - {warning}");
        }
    }

    println!();
    println!("artifacts written to {}", dir.display().to_string().bold());
}
