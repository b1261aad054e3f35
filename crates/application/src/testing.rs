//! In-memory fakes for exercising the application layer in unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tasklist_domain::{IdToken, SyncStatus, Task, TaskTitle};
use tokio::sync::oneshot;

use crate::ports::{
    ApiError, Confirmer, IdentityError, IdentityProvider, Notice, TaskApi, TaskView,
};

type Gate<T> = Option<oneshot::Sender<Result<T, ApiError>>>;

#[derive(Default)]
struct ApiState {
    tasks: Vec<Task>,
    next_id: u64,
    calls: Vec<&'static str>,
    tokens: Vec<String>,
    failures: VecDeque<ApiError>,
    gated: bool,
    pending_lists: Vec<Gate<Vec<Task>>>,
    pending_updates: Vec<Gate<Task>>,
}

/// A task server kept in memory.
///
/// In gated mode `list` and `update_completed` park until the test resolves
/// them, which lets tests choose the order responses arrive in.
#[derive(Clone, Default)]
pub struct FakeTaskApi {
    state: Arc<Mutex<ApiState>>,
}

impl FakeTaskApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().tasks = tasks;
        api
    }

    pub fn gated(tasks: Vec<Task>) -> Self {
        let api = Self::with_tasks(tasks);
        api.state.lock().unwrap().gated = true;
        api
    }

    pub fn set_gated(&self, gated: bool) {
        self.state.lock().unwrap().gated = gated;
    }

    pub fn fail_next_with(&self, error: ApiError) {
        self.state.lock().unwrap().failures.push_back(error);
    }

    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.state.lock().unwrap().tasks = tasks;
    }

    pub fn server_tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.state.lock().unwrap().tokens.clone()
    }

    pub fn pending_updates(&self) -> usize {
        self.state.lock().unwrap().pending_updates.len()
    }

    pub fn pending_lists(&self) -> usize {
        self.state.lock().unwrap().pending_lists.len()
    }

    pub fn resolve_update(&self, index: usize, result: Result<Task, ApiError>) {
        let sender = self.state.lock().unwrap().pending_updates[index].take();
        sender.expect("update already resolved").send(result).unwrap();
    }

    pub fn resolve_list(&self, index: usize, result: Result<Vec<Task>, ApiError>) {
        let sender = self.state.lock().unwrap().pending_lists[index].take();
        sender.expect("list already resolved").send(result).unwrap();
    }

    fn begin(&self, call: &'static str, token: &IdToken) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.tokens.push(token.as_str().to_string());
        state.failures.pop_front().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl TaskApi for FakeTaskApi {
    async fn list(&self, token: &IdToken) -> Result<Vec<Task>, ApiError> {
        self.begin("list", token)?;
        let receiver = {
            let mut state = self.state.lock().unwrap();
            if !state.gated {
                return Ok(state.tasks.clone());
            }
            let (tx, rx) = oneshot::channel();
            state.pending_lists.push(Some(tx));
            rx
        };
        receiver
            .await
            .unwrap_or_else(|_| Err(ApiError::Connection("gate dropped".into())))
    }

    async fn create(&self, token: &IdToken, title: &TaskTitle) -> Result<Task, ApiError> {
        self.begin("create", token)?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let task = Task::new(format!("task-{}", state.next_id), title.as_str(), false);
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_completed(
        &self,
        token: &IdToken,
        id: &str,
        completed: bool,
    ) -> Result<Task, ApiError> {
        self.begin("update", token)?;
        let receiver = {
            let mut state = self.state.lock().unwrap();
            if !state.gated {
                let task = state
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or(ApiError::Status { status: 404 })?;
                task.completed = completed;
                task.version += 1;
                return Ok(task.clone());
            }
            let (tx, rx) = oneshot::channel();
            state.pending_updates.push(Some(tx));
            rx
        };
        receiver
            .await
            .unwrap_or_else(|_| Err(ApiError::Connection("gate dropped".into())))
    }

    async fn delete_completed(&self, token: &IdToken) -> Result<(), ApiError> {
        self.begin("delete", token)?;
        self.state.lock().unwrap().tasks.retain(|t| !t.completed);
        Ok(())
    }
}

/// Identity source whose session the test can end.
#[derive(Clone)]
pub struct FakeIdentity {
    token: Arc<Mutex<Option<String>>>,
}

impl FakeIdentity {
    pub fn signed_in(token: &str) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            token: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn current_user(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap()
            .as_ref()
            .map(|_| "uid-test".to_string())
    }

    async fn get_id_token(&self, _force_refresh: bool) -> Result<IdToken, IdentityError> {
        self.token
            .lock()
            .unwrap()
            .as_ref()
            .map(|t| IdToken::new(t.clone(), None))
            .ok_or(IdentityError::NotSignedIn)
    }

    fn sign_out(&self) {
        *self.token.lock().unwrap() = None;
    }
}

/// View that records everything it is asked to show.
#[derive(Default)]
pub struct RecordingView {
    renders: Mutex<Vec<Vec<Task>>>,
    notices: Mutex<Vec<Notice>>,
    statuses: Mutex<Vec<SyncStatus>>,
}

impl RecordingView {
    pub fn last_render(&self) -> Option<Vec<Task>> {
        self.renders.lock().unwrap().last().cloned()
    }

    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<SyncStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

impl TaskView for RecordingView {
    fn render(&self, tasks: &[Task]) {
        self.renders.lock().unwrap().push(tasks.to_vec());
    }

    fn show_status(&self, status: &SyncStatus) {
        self.statuses.lock().unwrap().push(status.clone());
    }

    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

/// Confirmer with a canned answer that counts prompts.
pub struct FixedConfirmer {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl FixedConfirmer {
    pub const fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirmer for FixedConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}
