use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use taskboard_backend::{
    app::{
        resource::{
            board::{CreateLabel, CreateTaskStatus, UpdateLabel, UpdateTask, UpdateTaskStatus},
            Field,
        },
        use_case,
    },
    error::app::ApplicationError,
};

use crate::setup::{create_label, create_status, create_task, setup};

mod setup;

#[tokio::test]
async fn status_create_then_read_roundtrips() {
    let ctx = setup();

    let created = create_status(&ctx, "Draft", "draft").await;
    let read = use_case::board::find_task_status(&ctx.store, created.id)
        .await
        .unwrap();

    assert_eq!(read, created);
    assert_eq!(read.name, "Draft");
    assert_eq!(read.slug, "draft");
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict() {
    let ctx = setup();

    create_status(&ctx, "Draft", "draft").await;
    let err = use_case::board::create_task_status(
        &ctx.store,
        CreateTaskStatus {
            name: "Other",
            slug: "draft",
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplicationError::Conflict(_)));
}

#[tokio::test]
async fn empty_status_fields_are_rejected() {
    let ctx = setup();

    let err = use_case::board::create_task_status(
        &ctx.store,
        CreateTaskStatus { name: "", slug: "" },
    )
    .await
    .unwrap_err();

    let validation = match err {
        ApplicationError::Validation(validation) => validation,
        other => panic!("expected validation error, got {other}"),
    };
    assert_eq!(validation.fields.len(), 2);
}

#[tokio::test]
async fn status_partial_update_keeps_absent_fields() {
    let ctx = setup();

    let created = create_status(&ctx, "Draft", "draft").await;

    let updated = use_case::board::update_task_status(
        &ctx.store,
        created.id,
        UpdateTaskStatus {
            name: Field::Present(Some("Sketch".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Sketch");
    assert_eq!(updated.slug, "draft");
}

#[tokio::test]
async fn null_slug_on_update_is_rejected() {
    let ctx = setup();

    let created = create_status(&ctx, "Draft", "draft").await;

    let err = use_case::board::update_task_status(
        &ctx.store,
        created.id,
        UpdateTaskStatus {
            slug: Field::Present(None),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplicationError::Validation(_)));
}

#[tokio::test]
async fn referenced_status_cannot_be_deleted_until_tasks_are_gone() {
    let ctx = setup();

    let status = create_status(&ctx, "Draft", "draft").await;
    let task = create_task(&ctx, "T1", "draft", None, BTreeSet::new()).await;

    let err = use_case::board::delete_task_status(&ctx.store, status.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Integrity(_)));

    use_case::board::delete_task(&ctx.store, task.id).await.unwrap();
    use_case::board::delete_task_status(&ctx.store, status.id)
        .await
        .unwrap();

    let err = use_case::board::find_task_status(&ctx.store, status.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn unreferenced_status_deletes_cleanly() {
    let ctx = setup();

    let status = create_status(&ctx, "Draft", "draft").await;
    use_case::board::delete_task_status(&ctx.store, status.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn label_name_length_bounds_are_enforced() {
    let ctx = setup();

    let err = use_case::board::create_label(&ctx.store, CreateLabel { name: "ab" })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));

    let long = "x".repeat(1001);
    let err = use_case::board::create_label(&ctx.store, CreateLabel { name: &long })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));

    let label = create_label(&ctx, "bug").await;
    assert_eq!(label.name, "bug");
}

#[tokio::test]
async fn duplicate_label_name_is_a_conflict() {
    let ctx = setup();

    create_label(&ctx, "bug").await;
    let err = use_case::board::create_label(&ctx.store, CreateLabel { name: "bug" })
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Conflict(_)));
}

#[tokio::test]
async fn label_rename_keeps_identity() {
    let ctx = setup();

    let label = create_label(&ctx, "bug").await;

    let renamed = use_case::board::update_label(
        &ctx.store,
        label.id,
        UpdateLabel {
            name: Field::Present(Some("defect".into())),
        },
    )
    .await
    .unwrap();

    assert_eq!(renamed.id, label.id);
    assert_eq!(renamed.name, "defect");
}

#[tokio::test]
async fn attached_label_cannot_be_deleted_until_detached() {
    let ctx = setup();

    create_status(&ctx, "Draft", "draft").await;
    let label = create_label(&ctx, "bug").await;
    let task = create_task(&ctx, "T1", "draft", None, BTreeSet::from([label.id])).await;

    let err = use_case::board::delete_label(&ctx.store, label.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Integrity(_)));

    use_case::board::update_task(
        &ctx.store,
        task.id,
        UpdateTask {
            task_label_ids: Field::Present(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    use_case::board::delete_label(&ctx.store, label.id).await.unwrap();
}

#[tokio::test]
async fn index_reports_total_counts() {
    let ctx = setup();

    create_status(&ctx, "Draft", "draft").await;
    create_status(&ctx, "Published", "published").await;
    create_label(&ctx, "bug").await;

    let statuses = use_case::board::list_task_statuses(&ctx.store).await.unwrap();
    let labels = use_case::board::list_labels(&ctx.store).await.unwrap();

    assert_eq!(statuses.len(), 2);
    assert_eq!(labels.len(), 1);
}
