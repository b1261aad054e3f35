//! Task entity and title validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A to-do item as owned by the server.
///
/// Field names follow the backend's JSON document (`_id`, `userId`, `__v`),
/// while the Rust side uses descriptive names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier assigned by the server.
    #[serde(rename = "_id")]
    pub id: String,
    /// Free-text label, fixed at creation.
    pub title: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Server-assigned creation timestamp. Display only.
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    /// Identifier of the authenticated owner.
    #[serde(rename = "userId", default)]
    pub owner_id: String,
    /// Server revision counter. Not used for conflict resolution.
    #[serde(rename = "__v", default)]
    pub version: i64,
}

impl Task {
    /// Creates a task with the given identity and state.
    ///
    /// Server-owned metadata (`created_at`, `owner_id`, `version`) is left
    /// empty; the server fills it in on real responses.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed,
            created_at: String::new(),
            owner_id: String::new(),
            version: 0,
        }
    }

    /// Returns a copy of this task with a different completion flag.
    #[must_use]
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }
}

/// A validated, non-empty task title.
///
/// Surrounding whitespace is trimmed. Only a `TaskTitle` can be submitted for
/// creation, so empty titles are rejected before any request is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Validates and wraps a title.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] if the title is empty or only
    /// whitespace.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the title text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for TaskTitle {
    type Error = DomainError;

    fn try_from(value: &str) -> DomainResult<Self> {
        Self::parse(value)
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
