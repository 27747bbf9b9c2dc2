use std::sync::Arc;

use salvo::{listener::TcpListener, Server};

use taskboard_backend::{
    app::use_case::seed,
    config::env_var,
    infra::{
        database, router,
        service::security::{Argon2HashService, JWTEncryptionService},
    },
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let pool = database::connection::create_sqlx_pool().await;
    let store = database::repository::create_store(&pool);

    let hash_service = Arc::new(Argon2HashService::new());
    let token_service = Arc::new(JWTEncryptionService::new(&env_var::get().token_key));

    seed::initialize(&store, hash_service.as_ref())
        .await
        .expect("Expect to seed default data");

    let address = format!("0.0.0.0:{}", env_var::get().port);
    let listener = TcpListener::bind(&address);
    Server::new(listener)
        .serve(router::app(&store, hash_service, token_service))
        .await;
}
