use super::{state_ref, EntityCtl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusState {
    pub name: String,
    pub slug: String,
}

pub type TaskStatus = EntityCtl<TaskStatusState>;

impl TaskStatus {
    state_ref!(name, String);
    state_ref!(slug, String);
}

impl TaskStatusState {
    pub fn new(name: String, slug: String) -> Self {
        Self { name, slug }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelState {
    pub name: String,
}

pub type Label = EntityCtl<LabelState>;

impl Label {
    state_ref!(name, String);
}

impl LabelState {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

/// Task state as seen by the core.
///
/// `status` and `labels` are hydrated entities: the store persists only
/// their identifiers and re-reads them on load, so a renamed status slug is
/// visible on the next read of any task referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskState {
    pub index: Option<i32>,
    pub assignee_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub labels: Vec<Label>,
}

pub type Task = EntityCtl<TaskState>;

impl Task {
    state_ref!(index, Option<i32>);
    state_ref!(assignee_id, Option<i64>);
    state_ref!(name, String);
    state_ref!(description, Option<String>);
    state_ref!(status, TaskStatus);
    state_ref!(labels, Vec<Label>);
}

impl TaskState {
    pub fn new(
        index: Option<i32>,
        assignee_id: Option<i64>,
        name: String,
        description: Option<String>,
        status: TaskStatus,
        labels: Vec<Label>,
    ) -> Self {
        Self {
            index,
            assignee_id,
            name,
            description,
            status,
            labels,
        }
    }
}
