use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    entity::{
        board::{Label, LabelState, Task, TaskState, TaskStatus, TaskStatusState},
        iam::{User, UserState},
        Entity, EntityCtl, EntityData,
    },
    repository::{
        LabelRepository, PersistenceResult, Store, TaskRepository, TaskStatusRepository,
        UserRepository,
    },
};
use crate::error::persistence::PersistenceError;

/// In-memory store with the same constraint surface as the database schema:
/// unique email/slug/label-name, and referential restricts on insert and
/// delete. Backs the integration tests and local runs without Postgres.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemState>>,
}

#[derive(Default)]
struct MemState {
    seq: i64,
    users: BTreeMap<i64, User>,
    statuses: BTreeMap<i64, TaskStatus>,
    labels: BTreeMap<i64, Label>,
    tasks: BTreeMap<i64, TaskRecord>,
}

/// Task row as persisted: references held by id, hydrated on read.
#[derive(Debug, Clone)]
struct TaskRecord {
    data: EntityData,
    index: Option<i32>,
    assignee_id: Option<i64>,
    name: String,
    description: Option<String>,
    status_id: i64,
    label_ids: BTreeSet<i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> Store {
        Store {
            users: Arc::new(self.clone()),
            task_statuses: Arc::new(self.clone()),
            labels: Arc::new(self.clone()),
            tasks: Arc::new(self.clone()),
        }
    }

    fn read(&self) -> PersistenceResult<std::sync::RwLockReadGuard<'_, MemState>> {
        self.state.read().map_err(|_| lock_poisoned())
    }

    fn write(&self) -> PersistenceResult<std::sync::RwLockWriteGuard<'_, MemState>> {
        self.state.write().map_err(|_| lock_poisoned())
    }
}

fn lock_poisoned() -> PersistenceError {
    PersistenceError::Connection(io::Error::new(
        io::ErrorKind::Other,
        "memory store lock poisoned",
    ))
}

impl MemState {
    fn next_entity_data(&mut self) -> EntityData {
        self.seq += 1;
        EntityData {
            id: self.seq,
            created: Utc::now(),
            updated: None,
            version: 1,
        }
    }

    fn hydrate_task(&self, record: &TaskRecord) -> PersistenceResult<Task> {
        let status = self
            .statuses
            .get(&record.status_id)
            .cloned()
            .ok_or(PersistenceError::DecodeData)?;
        let labels = record
            .label_ids
            .iter()
            .filter_map(|id| self.labels.get(id).cloned())
            .collect();

        Ok(EntityCtl::restore(
            record.data.clone(),
            TaskState::new(
                record.index,
                record.assignee_id,
                record.name.clone(),
                record.description.clone(),
                status,
                labels,
            ),
        ))
    }

    fn task_record(&self, data: EntityData, state: &TaskState) -> PersistenceResult<TaskRecord> {
        let status_id = state.status.ident();
        if !self.statuses.contains_key(&status_id) {
            return Err(PersistenceError::ForeignKeyRestrict(Some(
                "tasks_task_status_id_fkey".into(),
            )));
        }
        if let Some(assignee_id) = state.assignee_id {
            if !self.users.contains_key(&assignee_id) {
                return Err(PersistenceError::ForeignKeyRestrict(Some(
                    "tasks_assignee_id_fkey".into(),
                )));
            }
        }
        let label_ids: BTreeSet<i64> = state.labels.iter().map(Entity::ident).collect();
        if label_ids.iter().any(|id| !self.labels.contains_key(id)) {
            return Err(PersistenceError::ForeignKeyRestrict(Some(
                "task_labels_label_id_fkey".into(),
            )));
        }

        Ok(TaskRecord {
            data,
            index: state.index,
            assignee_id: state.assignee_id,
            name: state.name.clone(),
            description: state.description.clone(),
            status_id,
            label_ids,
        })
    }
}

fn updated_data(data: EntityData) -> EntityData {
    EntityData {
        id: data.id,
        created: data.created,
        updated: Some(Utc::now()),
        version: data.version + 1,
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> PersistenceResult<Option<User>> {
        let state = self.read()?;
        Ok(state
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_all(&self) -> PersistenceResult<Vec<User>> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    async fn insert(&self, state: UserState) -> PersistenceResult<User> {
        let mut store = self.write()?;

        if store.users.values().any(|user| user.email() == &state.email) {
            return Err(PersistenceError::UniqueViolation(Some(
                "users_email_key".into(),
            )));
        }

        let data = store.next_entity_data();
        let user = EntityCtl::restore(data, state);
        store.users.insert(user.ident(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> PersistenceResult<User> {
        let mut store = self.write()?;

        if !store.users.contains_key(&user.ident()) {
            return Err(PersistenceError::NotFound);
        }
        if store
            .users
            .values()
            .any(|other| other.ident() != user.ident() && other.email() == user.email())
        {
            return Err(PersistenceError::UniqueViolation(Some(
                "users_email_key".into(),
            )));
        }

        let saved = EntityCtl::restore(updated_data(user.data()), user.state().clone());
        store.users.insert(saved.ident(), saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool> {
        let mut store = self.write()?;

        if store
            .tasks
            .values()
            .any(|task| task.assignee_id == Some(id))
        {
            return Err(PersistenceError::ForeignKeyRestrict(Some(
                "tasks_assignee_id_fkey".into(),
            )));
        }

        Ok(store.users.remove(&id).is_some())
    }
}

#[async_trait]
impl TaskStatusRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<TaskStatus>> {
        Ok(self.read()?.statuses.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> PersistenceResult<Option<TaskStatus>> {
        let state = self.read()?;
        Ok(state
            .statuses
            .values()
            .find(|status| status.slug() == slug)
            .cloned())
    }

    async fn find_all(&self) -> PersistenceResult<Vec<TaskStatus>> {
        Ok(self.read()?.statuses.values().cloned().collect())
    }

    async fn insert(&self, state: TaskStatusState) -> PersistenceResult<TaskStatus> {
        let mut store = self.write()?;

        if store
            .statuses
            .values()
            .any(|status| status.slug() == &state.slug)
        {
            return Err(PersistenceError::UniqueViolation(Some(
                "task_statuses_slug_key".into(),
            )));
        }

        let data = store.next_entity_data();
        let status = EntityCtl::restore(data, state);
        store.statuses.insert(status.ident(), status.clone());
        Ok(status)
    }

    async fn update(&self, status: &TaskStatus) -> PersistenceResult<TaskStatus> {
        let mut store = self.write()?;

        if !store.statuses.contains_key(&status.ident()) {
            return Err(PersistenceError::NotFound);
        }
        if store
            .statuses
            .values()
            .any(|other| other.ident() != status.ident() && other.slug() == status.slug())
        {
            return Err(PersistenceError::UniqueViolation(Some(
                "task_statuses_slug_key".into(),
            )));
        }

        let saved = EntityCtl::restore(updated_data(status.data()), status.state().clone());
        store.statuses.insert(saved.ident(), saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool> {
        let mut store = self.write()?;

        if store.tasks.values().any(|task| task.status_id == id) {
            return Err(PersistenceError::ForeignKeyRestrict(Some(
                "tasks_task_status_id_fkey".into(),
            )));
        }

        Ok(store.statuses.remove(&id).is_some())
    }
}

#[async_trait]
impl LabelRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Label>> {
        Ok(self.read()?.labels.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> PersistenceResult<Option<Label>> {
        let state = self.read()?;
        Ok(state
            .labels
            .values()
            .find(|label| label.name() == name)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> PersistenceResult<Vec<Label>> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.labels.get(id).cloned())
            .collect())
    }

    async fn find_all(&self) -> PersistenceResult<Vec<Label>> {
        Ok(self.read()?.labels.values().cloned().collect())
    }

    async fn insert(&self, state: LabelState) -> PersistenceResult<Label> {
        let mut store = self.write()?;

        if store.labels.values().any(|label| label.name() == &state.name) {
            return Err(PersistenceError::UniqueViolation(Some(
                "labels_name_key".into(),
            )));
        }

        let data = store.next_entity_data();
        let label = EntityCtl::restore(data, state);
        store.labels.insert(label.ident(), label.clone());
        Ok(label)
    }

    async fn update(&self, label: &Label) -> PersistenceResult<Label> {
        let mut store = self.write()?;

        if !store.labels.contains_key(&label.ident()) {
            return Err(PersistenceError::NotFound);
        }
        if store
            .labels
            .values()
            .any(|other| other.ident() != label.ident() && other.name() == label.name())
        {
            return Err(PersistenceError::UniqueViolation(Some(
                "labels_name_key".into(),
            )));
        }

        let saved = EntityCtl::restore(updated_data(label.data()), label.state().clone());
        store.labels.insert(saved.ident(), saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool> {
        let mut store = self.write()?;

        if store.tasks.values().any(|task| task.label_ids.contains(&id)) {
            return Err(PersistenceError::ForeignKeyRestrict(Some(
                "task_labels_label_id_fkey".into(),
            )));
        }

        Ok(store.labels.remove(&id).is_some())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Task>> {
        let state = self.read()?;
        state
            .tasks
            .get(&id)
            .map(|record| state.hydrate_task(record))
            .transpose()
    }

    async fn find_all(&self) -> PersistenceResult<Vec<Task>> {
        let state = self.read()?;
        state
            .tasks
            .values()
            .map(|record| state.hydrate_task(record))
            .collect()
    }

    async fn insert(&self, state: TaskState) -> PersistenceResult<Task> {
        let mut store = self.write()?;

        let data = store.next_entity_data();
        let record = store.task_record(data, &state)?;
        let task = store.hydrate_task(&record)?;
        store.tasks.insert(record.data.id, record);
        Ok(task)
    }

    async fn update(&self, task: &Task) -> PersistenceResult<Task> {
        let mut store = self.write()?;

        if !store.tasks.contains_key(&task.ident()) {
            return Err(PersistenceError::NotFound);
        }

        let record = store.task_record(updated_data(task.data()), task.state())?;
        let saved = store.hydrate_task(&record)?;
        store.tasks.insert(record.data.id, record);
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool> {
        Ok(self.write()?.tasks.remove(&id).is_some())
    }

    async fn exists_with_assignee(&self, user_id: i64) -> PersistenceResult<bool> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .any(|task| task.assignee_id == Some(user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_state(name: &str, slug: &str) -> TaskStatusState {
        TaskStatusState::new(name.into(), slug.into())
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();

        let first = TaskStatusRepository::insert(&store, status_state("Draft", "draft"))
            .await
            .unwrap();
        let second = TaskStatusRepository::insert(&store, status_state("Published", "published"))
            .await
            .unwrap();

        assert!(second.ident() > first.ident());
        assert_eq!(first.version(), 1);
        assert!(first.updated().is_none());
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_unique_violation() {
        let store = MemoryStore::new();

        TaskStatusRepository::insert(&store, status_state("Draft", "draft"))
            .await
            .unwrap();
        let err = TaskStatusRepository::insert(&store, status_state("Other", "draft"))
            .await
            .unwrap_err();

        assert!(matches!(err, PersistenceError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn update_stamps_timestamp_and_version() {
        let store = MemoryStore::new();

        let status = TaskStatusRepository::insert(&store, status_state("Draft", "draft"))
            .await
            .unwrap();
        let renamed = status.transform(|state| TaskStatusState::new("Sketch".into(), state.slug));
        let saved = TaskStatusRepository::update(&store, &renamed).await.unwrap();

        assert_eq!(saved.name(), "Sketch");
        assert_eq!(saved.version(), 2);
        assert!(saved.updated().is_some());
    }

    #[tokio::test]
    async fn deleting_missing_row_reports_false() {
        let store = MemoryStore::new();
        assert!(!TaskStatusRepository::delete_by_id(&store, 42).await.unwrap());
    }

    #[tokio::test]
    async fn task_insert_requires_live_status() {
        let store = MemoryStore::new();

        let status = TaskStatusRepository::insert(&store, status_state("Draft", "draft"))
            .await
            .unwrap();
        TaskStatusRepository::delete_by_id(&store, status.ident())
            .await
            .unwrap();

        let err = TaskRepository::insert(
            &store,
            TaskState::new(None, None, "T1".into(), None, status, Vec::new()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PersistenceError::ForeignKeyRestrict(_)));
    }

    #[tokio::test]
    async fn referenced_status_cannot_be_deleted() {
        let store = MemoryStore::new();

        let status = TaskStatusRepository::insert(&store, status_state("Draft", "draft"))
            .await
            .unwrap();
        TaskRepository::insert(
            &store,
            TaskState::new(None, None, "T1".into(), None, status.clone(), Vec::new()),
        )
        .await
        .unwrap();

        let err = TaskStatusRepository::delete_by_id(&store, status.ident())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::ForeignKeyRestrict(_)));
    }
}
