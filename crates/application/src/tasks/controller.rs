//! Task list controller with optimistic completion updates.
//!
//! The controller owns the in-memory [`TaskCollection`]. Completion toggles
//! are applied locally before the server confirms them and reverted if the
//! server call fails. Overlapping toggles on the same task carry sequence
//! numbers so that only the response to the latest toggle changes what is
//! displayed; fetches carry generations so an older listing never replaces a
//! newer one.

use std::collections::HashMap;

use parking_lot::Mutex;
use tasklist_domain::{DomainError, SyncStatus, Task, TaskCollection, TaskTitle};

use crate::error::TaskError;
use crate::ports::{Confirmer, IdentityProvider, Notice, TaskApi, TaskView};
use crate::tasks::TaskRepository;

/// Prompt shown before deleting completed tasks.
pub const DELETE_COMPLETED_PROMPT: &str = "Are you sure you want to delete all completed tasks?";

/// Prompt shown before ending the session.
pub const SIGN_OUT_PROMPT: &str = "Are you sure you want to sign out?";

/// Result of a full-list refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The collection was replaced with the server listing.
    Refreshed {
        /// Number of tasks now shown.
        count: usize,
    },
    /// A newer fetch was applied first; this listing was discarded.
    Stale,
    /// The fetch failed; the previous collection is still shown.
    Failed(TaskError),
}

/// Result of creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The server created the task.
    Created(Task),
    /// The title was rejected locally; no request was made.
    Rejected(DomainError),
    /// The create request failed.
    Failed(TaskError),
}

/// Result of a completion toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server accepted the change.
    Confirmed(Task),
    /// The server call failed and the task was reverted.
    RolledBack {
        /// The completion value the task was restored to.
        restored: bool,
        /// Why the call failed.
        error: TaskError,
    },
    /// A newer toggle on the same task owns the displayed state.
    Superseded,
    /// No task with this id is in the collection.
    UnknownTask,
}

/// Result of the bulk delete flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The server reported no completed tasks.
    NothingToDelete,
    /// The user did not confirm.
    Declined,
    /// Completed tasks were deleted and the list refreshed.
    Deleted {
        /// Completed tasks present before the delete.
        count: usize,
    },
    /// A request failed.
    Failed(TaskError),
}

/// Result of the sign-out flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutOutcome {
    /// The user did not confirm; the session is untouched.
    Declined,
    /// The session ended and the list was cleared.
    SignedOut,
}

/// Bookkeeping for a task with at least one toggle in flight.
#[derive(Debug, Clone, Copy)]
struct PendingToggle {
    /// Sequence number of the latest toggle.
    seq: u64,
    /// Last completion value known to be on the server.
    confirmed: bool,
}

#[derive(Debug, Default)]
struct ListState {
    tasks: TaskCollection,
    status: SyncStatus,
    pending: HashMap<String, PendingToggle>,
    next_seq: u64,
    fetch_started: u64,
    fetch_applied: u64,
    in_flight: usize,
}

impl ListState {
    fn begin(&mut self) -> SyncStatus {
        self.in_flight += 1;
        self.status = SyncStatus::Loading;
        self.status.clone()
    }

    fn finish(&mut self, error: Option<&TaskError>) -> SyncStatus {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.status = match error {
            Some(error) => SyncStatus::error(error.kind(), error.to_string()),
            None if self.in_flight > 0 => SyncStatus::Loading,
            None => SyncStatus::Idle,
        };
        self.status.clone()
    }

    fn snapshot(&self) -> Vec<Task> {
        self.tasks.as_slice().to_vec()
    }
}

/// Holds the task list for one screen and keeps it in sync with the server.
///
/// All methods take `&self`; share the controller behind an `Arc` to run
/// several actions at once. The internal lock is never held across a network
/// call, and the view is always called with the lock released.
pub struct TaskListController<A, P, V> {
    repository: TaskRepository<A, P>,
    view: V,
    state: Mutex<ListState>,
}

impl<A, P, V> TaskListController<A, P, V>
where
    A: TaskApi,
    P: IdentityProvider,
    V: TaskView,
{
    /// Creates a controller with an empty list.
    #[must_use]
    pub fn new(repository: TaskRepository<A, P>, view: V) -> Self {
        Self {
            repository,
            view,
            state: Mutex::new(ListState::default()),
        }
    }

    /// Snapshot of the current collection.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().snapshot()
    }

    /// Current list status.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.state.lock().status.clone()
    }

    /// The view this controller renders into.
    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// The repository used for server calls.
    #[must_use]
    pub const fn repository(&self) -> &TaskRepository<A, P> {
        &self.repository
    }

    /// Reloads the whole list from the server.
    ///
    /// On success the collection is replaced, discarding unresolved
    /// optimistic edits. On failure it is left untouched.
    pub async fn fetch(&self) -> FetchOutcome {
        let (generation, status) = {
            let mut state = self.state.lock();
            state.fetch_started += 1;
            (state.fetch_started, state.begin())
        };
        self.view.show_status(&status);

        match self.repository.list().await {
            Ok(tasks) => {
                let status = self.state.lock().finish(None);
                self.view.show_status(&status);

                match self.apply_listing(generation, tasks) {
                    Some(snapshot) => {
                        tracing::debug!(count = snapshot.len(), "task list refreshed");
                        self.view.render(&snapshot);
                        FetchOutcome::Refreshed {
                            count: snapshot.len(),
                        }
                    }
                    None => {
                        tracing::debug!(generation, "discarding stale task listing");
                        FetchOutcome::Stale
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch tasks; keeping previous list");
                self.fail(&error);
                FetchOutcome::Failed(error)
            }
        }
    }

    /// Replaces the collection with a listing unless a newer one was applied.
    fn apply_listing(&self, generation: u64, tasks: Vec<Task>) -> Option<Vec<Task>> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if generation < state.fetch_applied {
            return None;
        }
        state.fetch_applied = generation;
        for (id, pending) in &mut state.pending {
            if let Some(task) = tasks.iter().find(|t| &t.id == id) {
                pending.confirmed = task.completed;
            }
        }
        state.tasks.replace(tasks);
        Some(state.snapshot())
    }

    /// Creates a task, then reloads the list.
    ///
    /// Empty titles are rejected before any request is made.
    pub async fn add_task(&self, title: &str) -> CreateOutcome {
        let title = match TaskTitle::parse(title) {
            Ok(title) => title,
            Err(error) => {
                tracing::warn!(%error, "rejected task title");
                self.view.notify(&Notice::Failed {
                    error: TaskError::Validation(error.clone()),
                });
                return CreateOutcome::Rejected(error);
            }
        };

        let status = self.state.lock().begin();
        self.view.show_status(&status);

        match self.repository.create(&title).await {
            Ok(task) => {
                let status = self.state.lock().finish(None);
                self.view.show_status(&status);
                self.view.notify(&Notice::TaskCreated { task: task.clone() });
                self.fetch().await;
                CreateOutcome::Created(task)
            }
            Err(error) => {
                tracing::warn!(%error, %title, "failed to create task");
                self.fail(&error);
                CreateOutcome::Failed(error)
            }
        }
    }

    /// Flips the completion flag of a task.
    pub async fn toggle(&self, id: &str) -> ToggleOutcome {
        let current = self.state.lock().tasks.get(id).map(|t| t.completed);
        match current {
            Some(completed) => self.set_completed(id, !completed).await,
            None => ToggleOutcome::UnknownTask,
        }
    }

    /// Optimistically sets the completion flag of a task.
    ///
    /// The new value is shown immediately. If the server call fails the task
    /// is restored to the last value the server confirmed.
    pub async fn set_completed(&self, id: &str, completed: bool) -> ToggleOutcome {
        let (seq, snapshot, status) = {
            let mut state = self.state.lock();
            let Some(previous) = state.tasks.set_completed(id, completed) else {
                tracing::warn!(%id, "toggle for unknown task ignored");
                return ToggleOutcome::UnknownTask;
            };
            state.next_seq += 1;
            let seq = state.next_seq;
            state
                .pending
                .entry(id.to_string())
                .or_insert(PendingToggle {
                    seq,
                    confirmed: previous,
                })
                .seq = seq;
            (seq, state.snapshot(), state.begin())
        };
        self.view.render(&snapshot);
        self.view.show_status(&status);

        match self.repository.set_completed(id, completed).await {
            Ok(task) => self.confirm_toggle(id, seq, task),
            Err(error) => self.roll_back_toggle(id, seq, error),
        }
    }

    fn confirm_toggle(&self, id: &str, seq: u64, task: Task) -> ToggleOutcome {
        let (snapshot, status) = {
            let mut state = self.state.lock();
            let status = state.finish(None);
            match state.pending.get(id).map(|p| p.seq == seq) {
                Some(true) => {
                    state.pending.remove(id);
                    state.tasks.upsert(task.clone());
                    (Some(state.snapshot()), status)
                }
                Some(false) => {
                    if let Some(pending) = state.pending.get_mut(id) {
                        pending.confirmed = task.completed;
                    }
                    (None, status)
                }
                None => (None, status),
            }
        };
        self.view.show_status(&status);

        match snapshot {
            Some(snapshot) => {
                self.view.render(&snapshot);
                ToggleOutcome::Confirmed(task)
            }
            None => {
                tracing::debug!(%id, seq, "toggle confirmed after a newer one; not applied");
                ToggleOutcome::Superseded
            }
        }
    }

    fn roll_back_toggle(&self, id: &str, seq: u64, error: TaskError) -> ToggleOutcome {
        let (restored, snapshot, status) = {
            let mut state = self.state.lock();
            let status = state.finish(Some(&error));
            match state.pending.get(id).copied() {
                Some(pending) if pending.seq == seq => {
                    state.pending.remove(id);
                    state.tasks.set_completed(id, pending.confirmed);
                    (Some(pending.confirmed), Some(state.snapshot()), status)
                }
                _ => (None, None, status),
            }
        };
        self.view.show_status(&status);

        match (restored, snapshot) {
            (Some(restored), Some(snapshot)) => {
                tracing::warn!(%id, %error, restored, "toggle failed; rolled back");
                self.view.render(&snapshot);
                self.view.notify(&Notice::Failed {
                    error: error.clone(),
                });
                ToggleOutcome::RolledBack { restored, error }
            }
            _ => {
                tracing::debug!(%id, seq, %error, "superseded toggle failed; ignored");
                ToggleOutcome::Superseded
            }
        }
    }

    /// Deletes all completed tasks after confirmation, then reloads the list.
    ///
    /// The server is queried first and that listing replaces the collection;
    /// when it reports nothing completed the user is told so and no
    /// confirmation is requested.
    pub async fn delete_completed(&self, confirmer: &dyn Confirmer) -> DeleteOutcome {
        let (generation, status) = {
            let mut state = self.state.lock();
            state.fetch_started += 1;
            (state.fetch_started, state.begin())
        };
        self.view.show_status(&status);

        let tasks = match self.repository.list().await {
            Ok(tasks) => tasks,
            Err(error) => {
                tracing::warn!(%error, "failed to check completed tasks");
                self.fail(&error);
                return DeleteOutcome::Failed(error);
            }
        };
        let count = tasks.iter().filter(|t| t.completed).count();
        let status = self.state.lock().finish(None);
        self.view.show_status(&status);
        if let Some(snapshot) = self.apply_listing(generation, tasks) {
            self.view.render(&snapshot);
        }

        if count == 0 {
            self.view.notify(&Notice::NoCompletedTasks);
            return DeleteOutcome::NothingToDelete;
        }
        if !confirmer.confirm(DELETE_COMPLETED_PROMPT) {
            tracing::debug!(count, "bulk delete declined");
            return DeleteOutcome::Declined;
        }

        let status = self.state.lock().begin();
        self.view.show_status(&status);

        if let Err(error) = self.repository.delete_completed().await {
            tracing::warn!(%error, "failed to delete completed tasks");
            self.fail(&error);
            return DeleteOutcome::Failed(error);
        }
        let status = self.state.lock().finish(None);
        self.view.show_status(&status);
        self.view.notify(&Notice::CompletedTasksDeleted { count });

        self.fetch().await;
        DeleteOutcome::Deleted { count }
    }

    /// Ends the session after confirmation and clears the list.
    ///
    /// Responses still in flight are discarded once the session is gone.
    pub fn sign_out(&self, confirmer: &dyn Confirmer) -> SignOutOutcome {
        if !confirmer.confirm(SIGN_OUT_PROMPT) {
            tracing::debug!("sign-out declined");
            return SignOutOutcome::Declined;
        }
        self.repository.sign_out();

        let (snapshot, status) = {
            let mut state = self.state.lock();
            state.fetch_started += 1;
            state.fetch_applied = state.fetch_started;
            state.pending.clear();
            state.tasks.replace(Vec::new());
            state.status = SyncStatus::Idle;
            (state.snapshot(), state.status.clone())
        };
        self.view.show_status(&status);
        self.view.render(&snapshot);
        self.view.notify(&Notice::SignedOut);
        SignOutOutcome::SignedOut
    }

    fn fail(&self, error: &TaskError) {
        let status = self.state.lock().finish(Some(error));
        self.view.show_status(&status);
        self.view.notify(&Notice::Failed {
            error: error.clone(),
        });
    }
}
