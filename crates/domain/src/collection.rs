//! Client-local ordered task collection.

use crate::task::Task;

/// The client's view of the user's tasks, in server response order.
///
/// The collection is replaced wholesale on every successful fetch and patched
/// in place between fetches. It is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Replaces the whole collection with a fresh server listing.
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Sets the completion flag of a task, returning its previous value.
    ///
    /// Returns `None` if no task has this id.
    pub fn set_completed(&mut self, id: &str, completed: bool) -> Option<bool> {
        self.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            let previous = task.completed;
            task.completed = completed;
            previous
        })
    }

    /// Replaces the entry with the same id by the server's copy.
    ///
    /// Returns `false` (and leaves the collection alone) when the task is no
    /// longer present, e.g. because a fetch removed it meanwhile.
    pub fn upsert(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Number of tasks marked completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if there are no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates tasks in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Borrows the tasks as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }
}

impl From<Vec<Task>> for TaskCollection {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> TaskCollection {
        TaskCollection::from(vec![
            Task::new("1", "Buy milk", false),
            Task::new("2", "Walk dog", true),
            Task::new("3", "Write report", false),
        ])
    }

    #[test]
    fn test_set_completed_returns_previous() {
        let mut tasks = sample();
        assert_eq!(tasks.set_completed("1", true), Some(false));
        assert!(tasks.get("1").unwrap().completed);
        assert_eq!(tasks.set_completed("missing", true), None);
    }

    #[test]
    fn test_set_completed_leaves_others_untouched() {
        let mut tasks = sample();
        tasks.set_completed("3", true);
        assert_eq!(tasks.get("1"), Some(&Task::new("1", "Buy milk", false)));
        assert_eq!(tasks.get("2"), Some(&Task::new("2", "Walk dog", true)));
    }

    #[test]
    fn test_replace_keeps_server_order() {
        let mut tasks = sample();
        tasks.replace(vec![Task::new("9", "b", false), Task::new("8", "a", false)]);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "8"]);
    }

    #[test]
    fn test_upsert_only_updates_existing() {
        let mut tasks = sample();
        let mut server_copy = Task::new("2", "Walk dog", false);
        server_copy.version = 4;
        assert!(tasks.upsert(server_copy.clone()));
        assert_eq!(tasks.get("2"), Some(&server_copy));

        assert!(!tasks.upsert(Task::new("42", "ghost", true)));
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn test_completed_count() {
        let tasks = sample();
        assert_eq!(tasks.completed_count(), 1);
        assert!(!tasks.is_empty());
        assert!(TaskCollection::new().is_empty());
    }
}
