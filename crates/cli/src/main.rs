//! Malla CLI - track progress through a curriculum.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use malla_core::{CourseGraph, CourseStates};
use malla_progress::{Engine, EngineConfig, EngineError};
use malla_storage::JsonStorage;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "malla")]
#[command(about = "Curriculum progress tracker", long_about = None)]
struct Cli {
    /// Curriculum definition (JSON)
    #[arg(long, global = true, default_value = "curriculum.json")]
    curriculum: PathBuf,

    /// Directory holding saved progress
    #[arg(long, global = true, default_value = ".malla")]
    state_dir: PathBuf,

    /// Drop saved progress for courses no longer in the curriculum
    #[arg(long, global = true)]
    prune: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every course by semester
    Status,
    /// Mark a course completed, or not completed if it already is
    Toggle {
        /// Course ID
        id: String,
    },
    /// Clear all progress
    Reset {
        /// Confirm clearing progress
        #[arg(long)]
        yes: bool,
    },
    /// List courses that can be taken now
    Available,
    /// Validate the curriculum and report prerequisite cycles
    Check,
    /// Print the state of every course as JSON
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let json = std::fs::read_to_string(&cli.curriculum)
        .with_context(|| format!("Cannot read curriculum {}", cli.curriculum.display()))?;
    let graph = CourseGraph::from_json(&json)
        .with_context(|| format!("Invalid curriculum {}", cli.curriculum.display()))?;

    if let Commands::Check = cli.command {
        return check(&graph);
    }

    let storage = JsonStorage::new(&cli.state_dir).await?;
    let engine = Engine::new(graph, storage).with_config(EngineConfig {
        prune_unknown: cli.prune,
        ..Default::default()
    });
    let states = accept_unsaved(engine.refresh().await)?;

    match cli.command {
        Commands::Status => print_status(engine.graph(), &states),
        Commands::Toggle { id } => match engine.toggle(&id).await {
            Err(EngineError::LockedCourse { course, missing }) => {
                let names: Vec<&str> = missing
                    .iter()
                    .filter_map(|m| engine.graph().course(m).ok())
                    .map(|c| c.display_name())
                    .collect();
                anyhow::bail!("{} is locked. Complete first: {}", course, names.join(", "));
            }
            result => {
                let before = states;
                let after = accept_unsaved(result)?;
                print_changes(engine.graph(), &before, &after);
            }
        },
        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("This clears all progress. Re-run with --yes to confirm.");
            }
            let states = accept_unsaved(engine.reset().await)?;
            println!("Progress cleared. {} course(s) available.", states.available().len());
        }
        Commands::Available => {
            let available = states.available();
            println!("Available ({})", available.len());
            for id in available {
                let course = engine.graph().course(id)?;
                println!("  S{} | {} | {}", course.semester + 1, course.id, course.display_name());
            }
        }
        Commands::Export => {
            println!("{}", serde_json::to_string_pretty(&states)?);
        }
        // handled before storage is opened
        Commands::Check => {}
    }

    Ok(())
}

/// Accept a persistence failure with a warning; the state is still valid.
fn accept_unsaved(result: malla_progress::Result<CourseStates>) -> Result<CourseStates> {
    match result {
        Ok(states) => Ok(states),
        Err(EngineError::Persistence { source, states }) => {
            warn!("Progress could not be saved: {}", source);
            eprintln!("warning: progress could not be saved ({source})");
            Ok(states)
        }
        Err(e) => Err(e.into()),
    }
}

fn check(graph: &CourseGraph) -> Result<()> {
    println!(
        "Curriculum OK: {} courses in {} semesters",
        graph.len(),
        graph.semesters().len()
    );

    let cycles = graph.find_cycles();
    if cycles.is_empty() {
        return Ok(());
    }

    println!("Prerequisite cycles ({}):", cycles.len());
    for cycle in &cycles {
        let path: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
        println!("  {} -> {}", path.join(" -> "), path[0]);
    }
    anyhow::bail!("curriculum has {} prerequisite cycle(s)", cycles.len())
}

fn print_status(graph: &CourseGraph, states: &CourseStates) {
    let progress = states.progress(graph);
    for semester in &progress {
        println!(
            "Semester {} ({}/{}, {:.0}%)",
            semester.semester + 1,
            semester.completed,
            semester.total,
            semester.percentage
        );
        for course in graph.courses_in(semester.semester) {
            let marker = match states.get(&course.id) {
                Some(s) if s.completed => "[x]",
                Some(s) if s.locked => "[locked]",
                _ => "[ ]",
            };
            println!("  {:8} {} - {}", marker, course.id, course.display_name());
        }
    }
    println!("Completed {}/{}", states.completed_count(), states.len());
}

fn print_changes(graph: &CourseGraph, before: &CourseStates, after: &CourseStates) {
    for course in graph.all_courses() {
        let (Some(old), Some(new)) = (before.get(&course.id), after.get(&course.id)) else {
            continue;
        };
        if old == new {
            continue;
        }
        let what = match (new.completed, new.locked) {
            (true, _) => "completed",
            (false, true) if old.completed => "not completed (prerequisite missing)",
            (false, true) => "locked",
            (false, false) if old.completed => "not completed",
            (false, false) => "unlocked",
        };
        println!("  {} - {}: {}", course.id, course.display_name(), what);
    }
    println!("Completed {}/{}", after.completed_count(), after.len());
}
