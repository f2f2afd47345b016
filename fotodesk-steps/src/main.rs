//! fotodesk-steps CLI
//!
//! Breaks a large task into short steps and tracks completion across
//! invocations via a per-user JSON plan file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fotodesk_steps::{PlanStore, StepGenerator, StepStatus, TaskSession};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fotodesk-steps", version, about = "Task-breakdown assistant")]
struct Args {
    /// Plan file to use instead of the per-user default
    #[arg(long)]
    file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Break a new task into steps
    New {
        /// The task to break down
        task: Vec<String>,
    },
    /// Mark the current step as done
    Done,
    /// Show the current step and progress
    Show,
    /// List all steps with their status
    History,
    /// Forget the stored plan
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let path = fotodesk_common::config::resolve_data_file(
        args.file.as_deref(),
        "FOTODESK_TASKS_FILE",
        "tasks.json",
    );
    let mut session = TaskSession::open(PlanStore::new(path), StepGenerator::new());

    match args.command {
        Command::New { task } => {
            let task = task.join(" ");
            if task.trim().is_empty() {
                anyhow::bail!("task must not be empty");
            }
            session.submit_task(task.trim()).await?;
            print_current(&session);
        }
        Command::Done => {
            session.mark_done().await?;
            print_current(&session);
        }
        Command::Show => print_current(&session),
        Command::History => {
            for (step, status) in session.history() {
                let marker = match status {
                    StepStatus::Done => "[x]",
                    StepStatus::Current => "[>]",
                    StepStatus::Pending => "[ ]",
                };
                println!("{} {}", marker, step);
            }
        }
        Command::Clear => {
            session.clear()?;
            println!("Plan cleared.");
        }
    }

    Ok(())
}

fn print_current(session: &TaskSession) {
    let (done, total) = session.progress();
    if total == 0 {
        println!("No task yet. Start one with `fotodesk-steps new <task>`.");
        return;
    }

    println!("Task: {}", session.task());
    match session.current_step() {
        Some(step) => println!("Current step ({}/{}): {}", done + 1, total, step),
        None => println!("All {} steps done.", total),
    }
}
