//! Tasklist - terminal client for the task backend

mod settings;
mod session;
mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tasklist_application::{
    AuthTokenProvider, CreateOutcome, DeleteOutcome, FetchOutcome, SignOutOutcome,
    TaskListController, TaskRepository, ToggleOutcome,
};
use tasklist_infrastructure::ReqwestTaskApi;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::AppConfig;
use crate::session::Session;
use crate::terminal::{StdinConfirmer, TerminalView};

type Controller = TaskListController<ReqwestTaskApi, Session, TerminalView>;

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Manage your to-do list")]
struct Cli {
    /// Configuration file (defaults to ./tasklist.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show all tasks
    List,
    /// Create a task
    Add {
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Flip a task's completion
    Toggle {
        /// Task id
        id: String,
    },
    /// Mark a task as completed
    Done {
        /// Task id
        id: String,
    },
    /// Mark a task as not completed
    Undone {
        /// Task id
        id: String,
    },
    /// Delete every completed task
    ClearCompleted {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// End the current session
    SignOut {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(base_url = %config.base_url, "starting tasklist");

    let api = ReqwestTaskApi::with_timeout(&config.base_url, config.timeout_ms)?;
    let session = Session::from_config(&config)?;
    let repository = TaskRepository::new(api, AuthTokenProvider::new(session));
    let controller = TaskListController::new(repository, TerminalView::new());

    let command = cli.command.unwrap_or(Command::List);
    let shows_list = !matches!(command, Command::SignOut { .. });
    let ok = run(&controller, command).await;
    if shows_list {
        controller.view().print_list()?;
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Runs one command; returns whether it succeeded.
async fn run(controller: &Controller, command: Command) -> bool {
    match command {
        Command::List => matches!(controller.fetch().await, FetchOutcome::Refreshed { .. }),
        Command::Add { title } => match controller.add_task(&title.join(" ")).await {
            CreateOutcome::Created(_) => true,
            CreateOutcome::Rejected(e) => {
                eprintln!("{e}");
                false
            }
            CreateOutcome::Failed(_) => false,
        },
        Command::Toggle { id } => update(controller, &id, None).await,
        Command::Done { id } => update(controller, &id, Some(true)).await,
        Command::Undone { id } => update(controller, &id, Some(false)).await,
        Command::ClearCompleted { yes } => {
            match controller.delete_completed(&StdinConfirmer::new(yes)).await {
                DeleteOutcome::Deleted { .. }
                | DeleteOutcome::NothingToDelete
                | DeleteOutcome::Declined => true,
                DeleteOutcome::Failed(_) => false,
            }
        }
        Command::SignOut { yes } => {
            let outcome = controller.sign_out(&StdinConfirmer::new(yes));
            if outcome == SignOutOutcome::SignedOut {
                eprintln!("Credentials in the configuration are left in place.");
            }
            true
        }
    }
}

/// Loads the list, then toggles or sets one task.
async fn update(controller: &Controller, id: &str, completed: Option<bool>) -> bool {
    if !matches!(controller.fetch().await, FetchOutcome::Refreshed { .. }) {
        return false;
    }

    let outcome = match completed {
        Some(completed) => controller.set_completed(id, completed).await,
        None => controller.toggle(id).await,
    };

    match outcome {
        ToggleOutcome::Confirmed(task) => {
            tracing::info!(id = %task.id, completed = task.completed, "task updated");
            true
        }
        ToggleOutcome::Superseded => true,
        ToggleOutcome::RolledBack { .. } => false,
        ToggleOutcome::UnknownTask => {
            eprintln!("No task with id {id}");
            false
        }
    }
}
