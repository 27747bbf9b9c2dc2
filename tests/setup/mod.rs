use std::collections::BTreeSet;
use std::sync::Arc;

use taskboard_backend::{
    app::{
        resource::{
            board::{CreateLabel, CreateTask, CreateTaskStatus, LabelResponse, TaskResponse, TaskStatusResponse},
            iam::{CreateUser, UserResponse},
        },
        use_case,
    },
    domain::repository::Store,
    infra::{
        memstore::MemoryStore,
        service::security::{Argon2HashService, JWTEncryptionService},
    },
};

pub struct TestContext {
    pub store: Store,
    pub hash_service: Arc<Argon2HashService>,
    pub token_service: Arc<JWTEncryptionService>,
}

pub fn setup() -> TestContext {
    TestContext {
        store: MemoryStore::new().store(),
        hash_service: Arc::new(Argon2HashService::new()),
        token_service: Arc::new(JWTEncryptionService::new("test-token-key")),
    }
}

#[allow(dead_code)]
pub async fn create_user(ctx: &TestContext, email: &str) -> UserResponse {
    use_case::iam::create_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        CreateUser {
            email,
            first_name: "Ada",
            last_name: "Lovelace",
            password: "qwerty",
        },
    )
    .await
    .expect("user payload should be valid")
}

#[allow(dead_code)]
pub async fn create_status(ctx: &TestContext, name: &str, slug: &str) -> TaskStatusResponse {
    use_case::board::create_task_status(&ctx.store, CreateTaskStatus { name, slug })
        .await
        .expect("status payload should be valid")
}

#[allow(dead_code)]
pub async fn create_label(ctx: &TestContext, name: &str) -> LabelResponse {
    use_case::board::create_label(&ctx.store, CreateLabel { name })
        .await
        .expect("label payload should be valid")
}

#[allow(dead_code)]
pub async fn create_task(
    ctx: &TestContext,
    title: &str,
    status_slug: &str,
    assignee_id: Option<i64>,
    label_ids: BTreeSet<i64>,
) -> TaskResponse {
    use_case::board::create_task(
        &ctx.store,
        CreateTask {
            index: None,
            assignee_id,
            title,
            content: None,
            status: status_slug,
            task_label_ids: label_ids,
        },
    )
    .await
    .expect("task payload should resolve")
}
