pub mod controller;
pub mod database;
pub mod memstore;
pub mod service;

pub mod router {
    use std::sync::Arc;

    use salvo::{logging::Logger, routing::PathFilter, Router};

    use crate::domain::repository::Store;

    use super::{
        controller::*,
        service::security::{Argon2HashService, JWTEncryptionService},
    };

    pub fn app(
        store: &Store,
        hash_service: Arc<Argon2HashService>,
        token_service: Arc<JWTEncryptionService>,
    ) -> Router {
        PathFilter::register_wisp_regex(
            "num",
            regex::Regex::new("^[0-9]+$").expect("Expect a valid numeric id regex"),
        );

        Router::new()
            .push(Router::with_path("welcome").get(WelcomeController))
            .push(
                Router::with_path("api")
                    .push(
                        Router::with_path("login").post(AuthenticateUserController {
                            store: store.clone(),
                            hash_service: hash_service.clone(),
                            token_service: token_service.clone(),
                        }),
                    )
                    .push(
                        Router::with_path("users")
                            .get(ListUsersController {
                                store: store.clone(),
                                token_service: token_service.clone(),
                            })
                            .post(CreateUserController {
                                store: store.clone(),
                                hash_service: hash_service.clone(),
                            })
                            .push(
                                Router::with_path("<id:num>")
                                    .get(ShowUserController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    })
                                    .put(UpdateUserController {
                                        store: store.clone(),
                                        hash_service,
                                        token_service: token_service.clone(),
                                    })
                                    .delete(DeleteUserController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    }),
                            ),
                    )
                    .push(
                        Router::with_path("task_statuses")
                            .get(ListTaskStatusesController {
                                store: store.clone(),
                                token_service: token_service.clone(),
                            })
                            .post(CreateTaskStatusController {
                                store: store.clone(),
                                token_service: token_service.clone(),
                            })
                            .push(
                                Router::with_path("<id:num>")
                                    .get(ShowTaskStatusController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    })
                                    .put(UpdateTaskStatusController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    })
                                    .delete(DeleteTaskStatusController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    }),
                            ),
                    )
                    .push(
                        Router::with_path("labels")
                            .get(ListLabelsController {
                                store: store.clone(),
                                token_service: token_service.clone(),
                            })
                            .post(CreateLabelController {
                                store: store.clone(),
                                token_service: token_service.clone(),
                            })
                            .push(
                                Router::with_path("<id:num>")
                                    .get(ShowLabelController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    })
                                    .put(UpdateLabelController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    })
                                    .delete(DeleteLabelController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    }),
                            ),
                    )
                    .push(
                        Router::with_path("tasks")
                            .get(ListTasksController {
                                store: store.clone(),
                                token_service: token_service.clone(),
                            })
                            .post(CreateTaskController {
                                store: store.clone(),
                                token_service: token_service.clone(),
                            })
                            .push(
                                Router::with_path("<id:num>")
                                    .get(ShowTaskController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    })
                                    .put(UpdateTaskController {
                                        store: store.clone(),
                                        token_service: token_service.clone(),
                                    })
                                    .delete(DeleteTaskController {
                                        store: store.clone(),
                                        token_service,
                                    }),
                            ),
                    ),
            )
            .hoop(Logger)
    }
}
