use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use taskboard_backend::{
    app::{
        resource::{
            iam::{CreateUser, UpdateUser, UserCredential},
            Field,
        },
        use_case,
    },
    domain::{repository::UserRepository, service::PasswordHashService},
    error::app::ApplicationError,
};

use crate::setup::{create_status, create_task, create_user, setup};

mod setup;

#[tokio::test]
async fn create_then_read_reproduces_every_field_except_password() {
    let ctx = setup();

    let created = use_case::iam::create_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        CreateUser {
            email: "u@x.com",
            first_name: "Grace",
            last_name: "Hopper",
            password: "qwerty",
        },
    )
    .await
    .unwrap();

    let read = use_case::iam::find_user(&ctx.store, created.id).await.unwrap();

    assert_eq!(read, created);
    assert_eq!(read.email, "u@x.com");
    assert_eq!(read.first_name, "Grace");
    assert_eq!(read.last_name, "Hopper");
}

#[tokio::test]
async fn stored_password_is_the_one_way_transform_of_the_plaintext() {
    let ctx = setup();

    create_user(&ctx, "u@x.com").await;

    let stored = ctx
        .store
        .users
        .find_by_email("u@x.com")
        .await
        .unwrap()
        .unwrap();

    assert!(ctx
        .hash_service
        .verify_password("qwerty", stored.password_hash())
        .is_ok());
    assert_ne!(stored.password_hash().as_str(), "qwerty");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let ctx = setup();

    create_user(&ctx, "u@x.com").await;
    let err = use_case::iam::create_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        CreateUser {
            email: "u@x.com",
            first_name: "Grace",
            last_name: "Hopper",
            password: "123456",
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplicationError::Conflict(_)));
}

#[tokio::test]
async fn invalid_create_payload_reports_every_broken_field() {
    let ctx = setup();

    let err = use_case::iam::create_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        CreateUser {
            email: "not-an-email",
            first_name: "  ",
            last_name: "Hopper",
            password: "xy",
        },
    )
    .await
    .unwrap_err();

    let validation = match err {
        ApplicationError::Validation(validation) => validation,
        other => panic!("expected validation error, got {other}"),
    };
    let paths: Vec<&str> = validation.fields.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["/email", "/firstName", "/password"]);
}

#[tokio::test]
async fn partial_update_changes_only_the_present_field() {
    let ctx = setup();

    let created = create_user(&ctx, "u@x.com").await;

    let updated = use_case::iam::update_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        "u@x.com",
        created.id,
        UpdateUser {
            first_name: Field::Present(Some("Grace".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.first_name, "Grace");
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.last_name, created.last_name);
}

#[tokio::test]
async fn applying_the_same_update_twice_is_idempotent() {
    let ctx = setup();

    let created = create_user(&ctx, "u@x.com").await;
    let payload = UpdateUser {
        first_name: Field::Present(Some("Grace".into())),
        ..Default::default()
    };

    let first = use_case::iam::update_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        "u@x.com",
        created.id,
        payload.clone(),
    )
    .await
    .unwrap();
    let second = use_case::iam::update_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        "u@x.com",
        created.id,
        payload,
    )
    .await
    .unwrap();

    assert_eq!(first.first_name, second.first_name);
    assert_eq!(first.email, second.email);
    assert_eq!(first.last_name, second.last_name);
}

#[tokio::test]
async fn present_password_is_rehashed_on_update() {
    let ctx = setup();

    let created = create_user(&ctx, "u@x.com").await;

    use_case::iam::update_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        "u@x.com",
        created.id,
        UpdateUser {
            password: Field::Present(Some("dvorak".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let stored = ctx
        .store
        .users
        .find_by_email("u@x.com")
        .await
        .unwrap()
        .unwrap();
    assert!(ctx
        .hash_service
        .verify_password("dvorak", stored.password_hash())
        .is_ok());
    assert!(ctx
        .hash_service
        .verify_password("qwerty", stored.password_hash())
        .is_err());
}

#[tokio::test]
async fn another_principal_may_not_update_or_delete() {
    let ctx = setup();

    let owner = create_user(&ctx, "a@x.com").await;
    create_user(&ctx, "b@x.com").await;

    let err = use_case::iam::update_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        "b@x.com",
        owner.id,
        UpdateUser {
            first_name: Field::Present(Some("Mallory".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    let err = use_case::iam::delete_user(&ctx.store, "b@x.com", owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    let unchanged = use_case::iam::find_user(&ctx.store, owner.id).await.unwrap();
    assert_eq!(unchanged.first_name, owner.first_name);
}

#[tokio::test]
async fn updating_a_missing_user_is_not_found() {
    let ctx = setup();

    let err = use_case::iam::update_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        "a@x.com",
        404,
        UpdateUser::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn assigned_user_cannot_be_deleted_until_tasks_are_gone() {
    let ctx = setup();

    let user = create_user(&ctx, "a@x.com").await;
    create_status(&ctx, "Draft", "draft").await;
    let task = create_task(&ctx, "T1", "draft", Some(user.id), BTreeSet::new()).await;

    let err = use_case::iam::delete_user(&ctx.store, "a@x.com", user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Integrity(_)));

    use_case::board::delete_task(&ctx.store, task.id).await.unwrap();
    use_case::iam::delete_user(&ctx.store, "a@x.com", user.id)
        .await
        .unwrap();

    let err = use_case::iam::find_user(&ctx.store, user.id).await.unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn authentication_issues_a_token_with_the_email_subject() {
    let ctx = setup();

    create_user(&ctx, "a@x.com").await;

    let response = use_case::iam::authenticate_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        ctx.token_service.as_ref(),
        UserCredential {
            email: "a@x.com",
            password: "qwerty",
        },
    )
    .await
    .unwrap();

    use taskboard_backend::domain::service::TokenEncryptionService;
    let payload = ctx.token_service.verify_token(&response.token).unwrap();
    assert_eq!(payload.sub, "a@x.com");
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let ctx = setup();

    create_user(&ctx, "a@x.com").await;

    let err = use_case::iam::authenticate_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        ctx.token_service.as_ref(),
        UserCredential {
            email: "a@x.com",
            password: "dvorak",
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApplicationError::Authentication(_)));

    let err = use_case::iam::authenticate_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        ctx.token_service.as_ref(),
        UserCredential {
            email: "nobody@x.com",
            password: "qwerty",
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApplicationError::Authentication(_)));
}
