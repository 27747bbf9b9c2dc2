use pretty_assertions::assert_eq;

use taskboard_backend::{
    app::{
        resource::iam::UserCredential,
        use_case::{self, seed},
    },
    domain::{
        repository::UserRepository,
        service::{PasswordHashService, TokenEncryptionService},
    },
};

use crate::setup::setup;

mod setup;

#[tokio::test]
async fn seed_creates_the_default_admin_statuses_and_labels() {
    let ctx = setup();

    seed::initialize(&ctx.store, ctx.hash_service.as_ref())
        .await
        .unwrap();

    let admin = ctx
        .store
        .users
        .find_by_email(seed::DEFAULT_ADMIN_EMAIL)
        .await
        .unwrap()
        .expect("seed should create the default admin");
    assert!(ctx
        .hash_service
        .verify_password(seed::DEFAULT_ADMIN_PASSWORD, admin.password_hash())
        .is_ok());

    let statuses = use_case::board::list_task_statuses(&ctx.store).await.unwrap();
    let slugs: Vec<&str> = statuses.iter().map(|s| s.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["draft", "to_review", "to_be_fixed", "to_publish", "published"]
    );

    let labels = use_case::board::list_labels(&ctx.store).await.unwrap();
    let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["feature", "bug"]);
}

#[tokio::test]
async fn seeding_twice_duplicates_nothing() {
    let ctx = setup();

    seed::initialize(&ctx.store, ctx.hash_service.as_ref())
        .await
        .unwrap();
    seed::initialize(&ctx.store, ctx.hash_service.as_ref())
        .await
        .unwrap();

    let users = use_case::iam::list_users(&ctx.store).await.unwrap();
    let statuses = use_case::board::list_task_statuses(&ctx.store).await.unwrap();
    let labels = use_case::board::list_labels(&ctx.store).await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(statuses.len(), 5);
    assert_eq!(labels.len(), 2);
}

#[tokio::test]
async fn seeded_credentials_authenticate() {
    let ctx = setup();

    seed::initialize(&ctx.store, ctx.hash_service.as_ref())
        .await
        .unwrap();

    let response = use_case::iam::authenticate_user(
        &ctx.store,
        ctx.hash_service.as_ref(),
        ctx.token_service.as_ref(),
        UserCredential {
            email: seed::DEFAULT_ADMIN_EMAIL,
            password: seed::DEFAULT_ADMIN_PASSWORD,
        },
    )
    .await
    .unwrap();

    let payload = ctx.token_service.verify_token(&response.token).unwrap();
    assert_eq!(payload.sub, seed::DEFAULT_ADMIN_EMAIL);
    assert_eq!(response.user.email, seed::DEFAULT_ADMIN_EMAIL);
}
