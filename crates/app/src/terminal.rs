//! Terminal rendering and confirmation.

use std::io::{self, BufRead, Write};

use parking_lot::Mutex;
use tasklist_application::{Confirmer, Notice, TaskView};
use tasklist_domain::{SyncStatus, Task};

/// Formats one task as a list row.
#[must_use]
pub fn format_row(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{mark}] {}  ({})", task.title, task.id)
}

/// Formats a notice for stderr.
#[must_use]
pub fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::NoCompletedTasks => "No completed tasks to delete.".to_string(),
        Notice::CompletedTasksDeleted { count } => {
            format!("Deleted {count} completed task(s).")
        }
        Notice::TaskCreated { task } => format!("Added \"{}\" ({}).", task.title, task.id),
        Notice::SignedOut => "Signed out.".to_string(),
        Notice::Failed { error } => format!("{}: {error}", error.kind().title()),
    }
}

/// View that remembers the latest render and prints it on demand.
///
/// Intermediate renders are not printed; the command prints the final list.
#[derive(Debug, Default)]
pub struct TerminalView {
    last: Mutex<Option<Vec<Task>>>,
}

impl TerminalView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of the most recent render, if any.
    #[must_use]
    pub fn rows(&self) -> Option<Vec<String>> {
        self.last
            .lock()
            .as_ref()
            .map(|tasks| tasks.iter().map(format_row).collect())
    }

    /// Prints the most recent render to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn print_list(&self) -> io::Result<()> {
        let Some(rows) = self.rows() else {
            return Ok(());
        };
        let mut out = io::stdout().lock();
        if rows.is_empty() {
            writeln!(out, "No tasks.")?;
        }
        for row in rows {
            writeln!(out, "{row}")?;
        }
        out.flush()
    }
}

impl TaskView for TerminalView {
    fn render(&self, tasks: &[Task]) {
        *self.last.lock() = Some(tasks.to_vec());
    }

    fn show_status(&self, status: &SyncStatus) {
        tracing::debug!(?status, "list status changed");
    }

    fn notify(&self, notice: &Notice) {
        eprintln!("{}", format_notice(notice));
    }
}

/// Asks yes/no questions on stdin.
#[derive(Debug, Clone, Copy)]
pub struct StdinConfirmer {
    assume_yes: bool,
}

impl StdinConfirmer {
    /// Creates a confirmer. With `assume_yes` no prompt is shown.
    #[must_use]
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// Reads one answer; only `y` or `yes` confirms.
fn read_answer(input: &mut impl BufRead) -> bool {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read confirmation");
            false
        }
    }
}

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        read_answer(&mut io::stdin().lock())
    }
}
