//! `workflow-sim` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`    — start the HTTP API.
//! - `validate` — check a workflow JSON file's structure and node fields.
//! - `simulate` — simulate a workflow JSON file and print the trace.
//! - `actions`  — list the automation catalog.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use actions::StaticCatalog;
use anyhow::Context;
use clap::{Parser, Subcommand};
use engine::{
    check_fields, validate, Graph, SimulationResult, SimulatorConfig, WorkflowSimulator,
    WorkflowStatus,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "workflow-sim",
    about = "Validate and simulate workflow graphs",
    version
)]
struct Cli {
    /// Largest workflow (in nodes) the simulator accepts.
    #[arg(long, global = true, env = "WORKFLOW_MAX_NODES", default_value_t = SimulatorConfig::DEFAULT_MAX_NODES)]
    max_nodes: usize,

    /// JSON file with the automation catalog; the built-in actions otherwise.
    #[arg(long, global = true, env = "WORKFLOW_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP API.
    Serve {
        #[arg(long, env = "WORKFLOW_BIND", default_value = "0.0.0.0:8080")]
        bind: String,
    },
    /// Validate a workflow JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// Simulate a workflow JSON file.
    Simulate {
        /// Path to the workflow JSON file.
        path: PathBuf,
        /// Print the raw simulation result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the automation catalog.
    Actions,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            if tracing::enabled!(tracing::Level::ERROR) {
                error!(error = %format!("{e:#}"), "workflow-sim failed");
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let simulator = WorkflowSimulator::new(SimulatorConfig {
        max_nodes: cli.max_nodes,
    });

    match cli.command {
        Command::Serve { bind } => {
            info!("Starting API server on {bind}");
            let state = api::AppState::new(simulator, Arc::new(catalog));
            api::serve(&bind, state)
                .await
                .with_context(|| format!("server on {bind} failed"))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { path } => {
            let graph = load_graph(&path)?;
            simulator.check_size(&graph)?;
            let violations = validate(&graph);
            let field_errors = check_fields(&graph, catalog.actions());

            if violations.is_empty() {
                println!("✅ Workflow is structurally valid.");
            }
            for violation in &violations {
                println!("❌ {violation}");
            }
            for field_error in &field_errors {
                println!(
                    "⚠️  {} · {}: {}",
                    field_error.node_id, field_error.field, field_error.message
                );
            }

            Ok(exit_code(violations.is_empty()))
        }
        Command::Simulate { path, json } => {
            let graph = load_graph(&path)?;
            let result = simulator.run(&graph).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render(&result));
            }

            Ok(exit_code(result.valid))
        }
        Command::Actions => {
            for action in catalog.actions() {
                println!("{:<16} {:<24} {}", action.id, action.label, action.params.join(", "));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(valid: bool) -> ExitCode {
    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_graph(path: &Path) -> anyhow::Result<Graph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid workflow in {}", path.display()))
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<StaticCatalog> {
    let Some(path) = path else {
        return Ok(StaticCatalog::builtin());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read catalog {}", path.display()))?;
    let catalog = StaticCatalog::from_json_str(&content)
        .with_context(|| format!("invalid catalog in {}", path.display()))?;
    info!("loaded {} automation actions from {}", catalog.actions().len(), path.display());
    Ok(catalog)
}

/// Human-readable rendering of a simulation result.
fn render(result: &SimulationResult) -> String {
    let mut out = String::new();

    if result.valid {
        out.push_str("✅ Workflow valid\n");
    } else {
        out.push_str("❌ Workflow invalid\n");
        for error in &result.errors {
            out.push_str(&format!("   • {error}\n"));
        }
    }

    for (index, step) in result.steps.iter().enumerate() {
        out.push_str(&format!("{:>3}. [{}] {}\n", index + 1, step.status, step.message));
    }

    if let Some(summary) = &result.summary {
        out.push_str(&format!(
            "📋 Summary ({}): {}/{} steps completed, generated {}\n",
            match summary.workflow_status {
                WorkflowStatus::Success => "SUCCESS",
                WorkflowStatus::Failed => "FAILED",
            },
            summary.completed_steps,
            summary.total_steps,
            summary.generated_at.to_rfc3339(),
        ));
    }

    out
}
