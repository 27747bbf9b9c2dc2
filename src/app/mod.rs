pub mod resource;
pub mod use_case;

pub mod transform {
    pub mod user {
        use crate::{
            app::resource::iam::UserResponse,
            domain::entity::{iam::User, Entity},
        };

        impl From<&User> for UserResponse {
            fn from(user: &User) -> Self {
                Self {
                    id: user.ident(),
                    email: user.email().clone(),
                    first_name: user.first_name().clone(),
                    last_name: user.last_name().clone(),
                    created_at: user.created().naive_utc().date(),
                }
            }
        }
    }

    pub mod board {
        use crate::{
            app::resource::board::{LabelResponse, TaskResponse, TaskStatusResponse},
            domain::entity::{
                board::{Label, Task, TaskStatus},
                Entity,
            },
        };

        impl From<&TaskStatus> for TaskStatusResponse {
            fn from(status: &TaskStatus) -> Self {
                Self {
                    id: status.ident(),
                    name: status.name().clone(),
                    slug: status.slug().clone(),
                    created_at: status.created().naive_utc().date(),
                }
            }
        }

        impl From<&Label> for LabelResponse {
            fn from(label: &Label) -> Self {
                Self {
                    id: label.ident(),
                    name: label.name().clone(),
                    created_at: label.created().naive_utc().date(),
                }
            }
        }

        impl From<&Task> for TaskResponse {
            fn from(task: &Task) -> Self {
                Self {
                    id: task.ident(),
                    index: *task.index(),
                    assignee_id: *task.assignee_id(),
                    title: task.name().clone(),
                    content: task.description().clone(),
                    status: task.status().slug().clone(),
                    task_label_ids: task.labels().iter().map(Entity::ident).collect(),
                    created_at: task.created().naive_utc().date(),
                }
            }
        }
    }
}
