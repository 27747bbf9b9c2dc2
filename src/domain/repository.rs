use std::sync::Arc;

use async_trait::async_trait;

use super::entity::{
    board::{Label, LabelState, Task, TaskState, TaskStatus, TaskStatusState},
    iam::{User, UserState},
};
use crate::error::persistence::PersistenceError;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Persistence contract per entity kind.
///
/// The store owns identifiers and timestamps: `insert` assigns them,
/// `update` stamps `updated` and bumps the version. Uniqueness constraints
/// surface as [`PersistenceError::UniqueViolation`] and referential
/// restricts as [`PersistenceError::ForeignKeyRestrict`]; the use-case layer
/// turns both into caller-facing failures.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> PersistenceResult<Option<User>>;
    async fn find_all(&self) -> PersistenceResult<Vec<User>>;
    async fn insert(&self, state: UserState) -> PersistenceResult<User>;
    async fn update(&self, user: &User) -> PersistenceResult<User>;
    async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool>;
}

#[async_trait]
pub trait TaskStatusRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<TaskStatus>>;
    async fn find_by_slug(&self, slug: &str) -> PersistenceResult<Option<TaskStatus>>;
    async fn find_all(&self) -> PersistenceResult<Vec<TaskStatus>>;
    async fn insert(&self, state: TaskStatusState) -> PersistenceResult<TaskStatus>;
    async fn update(&self, status: &TaskStatus) -> PersistenceResult<TaskStatus>;
    async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool>;
}

#[async_trait]
pub trait LabelRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Label>>;
    async fn find_by_name(&self, name: &str) -> PersistenceResult<Option<Label>>;
    /// Resolve a set of label ids. Unknown ids are absent from the result,
    /// not an error; the mapping layer decides what absence means.
    async fn find_by_ids(&self, ids: &[i64]) -> PersistenceResult<Vec<Label>>;
    async fn find_all(&self) -> PersistenceResult<Vec<Label>>;
    async fn insert(&self, state: LabelState) -> PersistenceResult<Label>;
    async fn update(&self, label: &Label) -> PersistenceResult<Label>;
    async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Task>>;
    async fn find_all(&self) -> PersistenceResult<Vec<Task>>;
    async fn insert(&self, state: TaskState) -> PersistenceResult<Task>;
    async fn update(&self, task: &Task) -> PersistenceResult<Task>;
    async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool>;
    /// Reference check backing the user-deletion integrity guard.
    async fn exists_with_assignee(&self, user_id: i64) -> PersistenceResult<bool>;
}

/// Handle bundle over one backing store, shared by every use case.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub task_statuses: Arc<dyn TaskStatusRepository>,
    pub labels: Arc<dyn LabelRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}
