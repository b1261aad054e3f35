//! Authenticated task repository.

use tasklist_domain::{DomainError, Task, TaskTitle};

use crate::auth::AuthTokenProvider;
use crate::error::{TaskError, TaskResult};
use crate::ports::{IdentityProvider, TaskApi};

/// Wraps the remote task API and attaches the bearer token to every call.
///
/// Each operation first asks the [`AuthTokenProvider`] for a token; without
/// one it fails with [`TaskError::AuthUnavailable`] and no request is issued.
/// Nothing is retried.
pub struct TaskRepository<A, P> {
    api: A,
    auth: AuthTokenProvider<P>,
}

impl<A: TaskApi, P: IdentityProvider> TaskRepository<A, P> {
    /// Creates a repository over an explicitly constructed API client.
    #[must_use]
    pub const fn new(api: A, auth: AuthTokenProvider<P>) -> Self {
        Self { api, auth }
    }

    /// Fetches the full task set for the signed-in user.
    ///
    /// # Errors
    /// `AuthUnavailable`, `Network`, `Server` or `InvalidResponse`.
    pub async fn list(&self) -> TaskResult<Vec<Task>> {
        let token = self.auth.get_token().await.ok_or(TaskError::AuthUnavailable)?;
        tracing::debug!("GET tasks");
        let tasks = self.api.list(&token).await?;
        tracing::debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    /// Creates a new task and returns the server's copy.
    ///
    /// # Errors
    /// `AuthUnavailable`, `Network`, `Server` or `InvalidResponse`.
    pub async fn create(&self, title: &TaskTitle) -> TaskResult<Task> {
        let token = self.auth.get_token().await.ok_or(TaskError::AuthUnavailable)?;
        tracing::debug!(%title, "POST task");
        let task = self.api.create(&token, title).await?;
        tracing::info!(id = %task.id, "created task");
        Ok(task)
    }

    /// Sets the completion flag of one task.
    ///
    /// A blank id is rejected before any token or request.
    ///
    /// # Errors
    /// `Validation`, `AuthUnavailable`, `Network`, `Server` or `InvalidResponse`.
    pub async fn set_completed(&self, id: &str, completed: bool) -> TaskResult<Task> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(id.to_string()).into());
        }
        let token = self.auth.get_token().await.ok_or(TaskError::AuthUnavailable)?;
        tracing::debug!(%id, completed, "PATCH task");
        let task = self.api.update_completed(&token, id, completed).await?;
        tracing::info!(%id, completed = task.completed, "updated task");
        Ok(task)
    }

    /// Deletes every completed task server-side in one call.
    ///
    /// # Errors
    /// `AuthUnavailable`, `Network`, `Server` or `InvalidResponse`.
    pub async fn delete_completed(&self) -> TaskResult<()> {
        let token = self.auth.get_token().await.ok_or(TaskError::AuthUnavailable)?;
        tracing::debug!("DELETE completed tasks");
        self.api.delete_completed(&token).await?;
        tracing::info!("deleted completed tasks");
        Ok(())
    }

    /// Ends the user session held by the identity provider.
    pub fn sign_out(&self) {
        self.auth.identity().sign_out();
        tracing::info!("signed out");
    }

    /// Access the underlying API client.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }
}
