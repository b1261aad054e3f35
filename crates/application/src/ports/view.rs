//! Rendering port

use tasklist_domain::{SyncStatus, Task};

use crate::TaskError;

/// One-off messages the controller wants shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Bulk delete was requested but nothing is completed.
    NoCompletedTasks,
    /// Completed tasks were removed on the server.
    CompletedTasksDeleted {
        /// How many completed tasks the list held before the delete.
        count: usize,
    },
    /// A task was created.
    TaskCreated {
        /// The server-assigned task.
        task: Task,
    },
    /// The session ended and the list was cleared.
    SignedOut,
    /// An action failed; any optimistic change has been reverted.
    Failed {
        /// What went wrong.
        error: TaskError,
    },
}

/// Surface that displays the task list.
///
/// Implementations must be cheap: the controller calls them synchronously
/// after every state change.
pub trait TaskView: Send + Sync {
    /// Shows the given tasks in order.
    fn render(&self, tasks: &[Task]);

    /// Shows the list-level status. The default ignores it.
    fn show_status(&self, status: &SyncStatus) {
        let _ = status;
    }

    /// Shows a one-off notice.
    fn notify(&self, notice: &Notice);
}
