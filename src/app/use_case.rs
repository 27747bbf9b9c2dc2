use crate::error::{
    app::ApplicationError,
    persistence::PersistenceError,
    resource::{ConflictError, IntegrityError, NotFoundError},
};

/// Map a store-level unique violation on save into the caller-facing
/// conflict, leaving every other persistence failure untouched.
fn conflict_on_unique<R>(
    err: PersistenceError,
    resource_type: &'static str,
    field: &'static str,
    value: &str,
) -> ApplicationError<R> {
    match err {
        PersistenceError::UniqueViolation(_) => ConflictError {
            resource_type,
            field,
            value: value.into(),
        }
        .into(),
        other => other.into(),
    }
}

/// Map a store-level referential restrict on delete into the caller-facing
/// integrity violation.
fn integrity_on_restrict<R>(
    err: PersistenceError,
    resource_type: &'static str,
    id: i64,
    referenced_by: &'static str,
) -> ApplicationError<R> {
    match err {
        PersistenceError::ForeignKeyRestrict(_) => IntegrityError {
            resource_type,
            id,
            referenced_by,
        }
        .into(),
        other => other.into(),
    }
}

fn not_found<R>(resource_type: &'static str, id: i64) -> ApplicationError<R> {
    NotFoundError { resource_type, id }.into()
}

pub mod iam {
    use std::time::Duration;

    use crate::{
        app::resource::{
            iam::{
                AuthenticateUserResponse, CreateUser, UpdateUser, UserCredential, UserResponse,
            },
            Field,
        },
        domain::{
            access::UserPolicy,
            datatype::security::TokenPayload,
            entity::{iam::UserState, Entity},
            repository::{Store, TaskRepository, UserRepository},
            service::{PasswordHashService, TokenEncryptionService},
        },
        error::{
            app::ApplicationError,
            resource::{IntegrityError, ValidationError, ValidationErrorKind, ValidationFieldError},
            security::{AuthenticationError, ForbiddenError},
        },
    };

    use super::{conflict_on_unique, not_found};

    const RESOURCE: &str = "iam::User";

    mod validation {
        use crate::domain::validation;

        use super::*;

        fn check(
            errors: &mut Vec<ValidationFieldError>,
            type_id: &'static str,
            path: &str,
            value: &str,
            kinds: Vec<ValidationErrorKind>,
        ) {
            if !kinds.is_empty() {
                errors.push(ValidationFieldError::new(
                    type_id,
                    value.into(),
                    path.into(),
                    kinds,
                ));
            }
        }

        pub(super) fn check_present<F>(
            errors: &mut Vec<ValidationFieldError>,
            type_id: &'static str,
            path: &str,
            field: &Field<Option<String>>,
            required: bool,
            validate: F,
        ) where
            F: Fn(&str) -> Vec<ValidationErrorKind>,
        {
            match field {
                Field::Absent => {}
                Field::Present(None) => {
                    if required {
                        errors.push(ValidationFieldError::new(
                            type_id,
                            "null".into(),
                            path.into(),
                            vec![ValidationErrorKind::Required],
                        ));
                    }
                }
                Field::Present(Some(value)) => {
                    check(errors, type_id, path, value, validate(value));
                }
            }
        }

        pub fn create_user<'dto>(
            dto: &CreateUser<'dto>,
        ) -> Result<(), ApplicationError<CreateUser<'dto>>> {
            let mut errors = Vec::new();

            check(
                &mut errors,
                "base::email",
                "/email",
                dto.email,
                validation::email(dto.email),
            );
            check(
                &mut errors,
                "base::string",
                "/firstName",
                dto.first_name,
                validation::non_blank(dto.first_name),
            );
            check(
                &mut errors,
                "base::string",
                "/lastName",
                dto.last_name,
                validation::non_blank(dto.last_name),
            );
            check(
                &mut errors,
                "base::password",
                "/password",
                "",
                validation::min_length(dto.password, 3),
            );

            if !errors.is_empty() {
                return Err(ValidationError::from_resource(dto.clone(), errors).into());
            }

            Ok(())
        }

        pub fn update_user(dto: &UpdateUser) -> Result<(), ApplicationError<UpdateUser>> {
            let mut errors = Vec::new();

            check_present(
                &mut errors,
                "base::email",
                "/email",
                &dto.email,
                true,
                validation::email,
            );
            check_present(
                &mut errors,
                "base::string",
                "/firstName",
                &dto.first_name,
                true,
                validation::non_blank,
            );
            check_present(
                &mut errors,
                "base::string",
                "/lastName",
                &dto.last_name,
                true,
                validation::non_blank,
            );
            check_present(
                &mut errors,
                "base::password",
                "/password",
                &dto.password,
                true,
                |value| validation::min_length(value, 3),
            );

            if !errors.is_empty() {
                return Err(ValidationError::from_resource(dto.clone(), errors).into());
            }

            Ok(())
        }
    }

    pub async fn create_user<'dto, HS: PasswordHashService>(
        store: &Store,
        hash_service: &HS,
        dto: CreateUser<'dto>,
    ) -> Result<UserResponse, ApplicationError<CreateUser<'dto>>> {
        validation::create_user(&dto)?;

        let password_hash = hash_service.hash_password(dto.password).map_err(|_| {
            ValidationError::from_resource(
                dto.clone(),
                vec![ValidationFieldError::new(
                    "base::password",
                    String::new(),
                    "/password".into(),
                    vec![ValidationErrorKind::Invalid],
                )],
            )
        })?;
        let state = UserState::new(
            dto.email.into(),
            dto.first_name.into(),
            dto.last_name.into(),
            password_hash,
        );

        let user = store
            .users
            .insert(state)
            .await
            .map_err(|err| conflict_on_unique(err, RESOURCE, "email", dto.email))?;

        Ok(UserResponse::from(&user))
    }

    pub async fn find_user(store: &Store, id: i64) -> Result<UserResponse, ApplicationError<()>> {
        let user = store
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<()>(RESOURCE, id))?;

        Ok(UserResponse::from(&user))
    }

    pub async fn list_users(store: &Store) -> Result<Vec<UserResponse>, ApplicationError<()>> {
        let users = store.users.find_all().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    pub async fn update_user<HS: PasswordHashService>(
        store: &Store,
        hash_service: &HS,
        principal: &str,
        id: i64,
        dto: UpdateUser,
    ) -> Result<UserResponse, ApplicationError<UpdateUser>> {
        validation::update_user(&dto)?;

        let user = store
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<UpdateUser>(RESOURCE, id))?;

        if !UserPolicy::may_mutate(principal, &user) {
            return Err(ForbiddenError::AccessDenied.into());
        }

        let password_hash = match &dto.password {
            Field::Present(Some(password)) => {
                Some(hash_service.hash_password(password).map_err(|_| {
                    ValidationError::from_resource(
                        dto.clone(),
                        vec![ValidationFieldError::new(
                            "base::password",
                            String::new(),
                            "/password".into(),
                            vec![ValidationErrorKind::Invalid],
                        )],
                    )
                })?)
            }
            _ => None,
        };

        let email_for_conflict = match &dto.email {
            Field::Present(Some(email)) => email.clone(),
            _ => user.email().clone(),
        };

        let UpdateUser {
            email,
            first_name,
            last_name,
            password: _,
        } = dto;

        let updated = user.transform(|state| {
            UserState::new(
                email.merge_required(state.email),
                first_name.merge_required(state.first_name),
                last_name.merge_required(state.last_name),
                password_hash.unwrap_or(state.password_hash),
            )
        });

        let saved = store
            .users
            .update(&updated)
            .await
            .map_err(|err| conflict_on_unique(err, RESOURCE, "email", &email_for_conflict))?;

        Ok(UserResponse::from(&saved))
    }

    pub async fn delete_user(
        store: &Store,
        principal: &str,
        id: i64,
    ) -> Result<(), ApplicationError<()>> {
        let user = store
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<()>(RESOURCE, id))?;

        if !UserPolicy::may_mutate(principal, &user) {
            return Err(ForbiddenError::AccessDenied.into());
        }

        if store.tasks.exists_with_assignee(user.ident()).await? {
            return Err(IntegrityError {
                resource_type: RESOURCE,
                id,
                referenced_by: "board::Task",
            }
            .into());
        }

        let deleted = store.users.delete_by_id(id).await?;
        if !deleted {
            return Err(not_found::<()>(RESOURCE, id));
        }

        Ok(())
    }

    const AUTHENTICATION_TOKEN_EXPIRATION: Duration = Duration::from_secs(60 * 60 * 8);

    pub async fn authenticate_user<'dto, HS, TS>(
        store: &Store,
        hash_service: &HS,
        token_service: &TS,
        credential: UserCredential<'dto>,
    ) -> Result<AuthenticateUserResponse, ApplicationError<UserCredential<'dto>>>
    where
        HS: PasswordHashService,
        TS: TokenEncryptionService,
    {
        let user = store
            .users
            .find_by_email(credential.email)
            .await?
            .ok_or(AuthenticationError::InvalidCredential)?;

        if hash_service
            .verify_password(credential.password, user.password_hash())
            .is_err()
        {
            return Err(AuthenticationError::InvalidCredential.into());
        }

        let payload = TokenPayload::new(AUTHENTICATION_TOKEN_EXPIRATION, user.email().clone());
        let token = token_service
            .issue_token(&payload)
            .expect("Expect to sign a user authentication token");

        Ok(AuthenticateUserResponse {
            user: UserResponse::from(&user),
            token,
        })
    }
}

pub mod board {
    use std::collections::BTreeSet;

    use crate::{
        app::resource::{
            board::{
                CreateLabel, CreateTask, CreateTaskStatus, LabelResponse, TaskResponse,
                TaskStatusResponse, UpdateLabel, UpdateTask, UpdateTaskStatus,
            },
            Field,
        },
        domain::{
            entity::{
                board::{LabelState, TaskState, TaskStatusState},
                Entity,
            },
            repository::{
                LabelRepository, Store, TaskRepository, TaskStatusRepository, UserRepository,
            },
            validation,
        },
        error::{
            app::ApplicationError,
            resource::{ValidationError, ValidationErrorKind, ValidationFieldError},
        },
    };

    use super::{conflict_on_unique, integrity_on_restrict, not_found};

    const STATUS_RESOURCE: &str = "board::TaskStatus";
    const LABEL_RESOURCE: &str = "board::Label";
    const TASK_RESOURCE: &str = "board::Task";

    mod mapping {
        use crate::{
            domain::entity::board::{Label, TaskStatus},
            error::resource::ReferenceError,
        };

        use super::*;

        /// A task's status slug must resolve; an unknown slug rejects the
        /// whole request.
        pub async fn resolve_status<R>(
            store: &Store,
            slug: &str,
        ) -> Result<TaskStatus, ApplicationError<R>> {
            let status = store.task_statuses.find_by_slug(slug).await?;
            status.ok_or_else(|| {
                ReferenceError {
                    resource_type: STATUS_RESOURCE,
                    reference: slug.into(),
                }
                .into()
            })
        }

        /// A present assignee id must resolve to an existing user.
        pub async fn resolve_assignee<R>(
            store: &Store,
            assignee_id: Option<i64>,
        ) -> Result<Option<i64>, ApplicationError<R>> {
            let Some(id) = assignee_id else {
                return Ok(None);
            };

            let user = store.users.find_by_id(id).await?;
            user.map(|user| Some(user.ident())).ok_or_else(|| {
                ReferenceError {
                    resource_type: "iam::User",
                    reference: id.to_string(),
                }
                .into()
            })
        }

        /// Label ids resolve to the labels the store knows; unknown ids are
        /// dropped silently.
        pub async fn resolve_labels<R>(
            store: &Store,
            ids: &BTreeSet<i64>,
        ) -> Result<Vec<Label>, ApplicationError<R>> {
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let ids: Vec<i64> = ids.iter().copied().collect();
            Ok(store.labels.find_by_ids(&ids).await?)
        }
    }

    mod task_status {
        use super::*;

        pub fn validate_create<'dto>(
            dto: &CreateTaskStatus<'dto>,
        ) -> Result<(), ApplicationError<CreateTaskStatus<'dto>>> {
            let mut errors = Vec::new();

            let name_kinds = validation::min_length(dto.name, 1);
            if !name_kinds.is_empty() {
                errors.push(ValidationFieldError::new(
                    "base::string",
                    dto.name.into(),
                    "/name".into(),
                    name_kinds,
                ));
            }
            let slug_kinds = validation::min_length(dto.slug, 1);
            if !slug_kinds.is_empty() {
                errors.push(ValidationFieldError::new(
                    "base::string",
                    dto.slug.into(),
                    "/slug".into(),
                    slug_kinds,
                ));
            }

            if !errors.is_empty() {
                return Err(ValidationError::from_resource(dto.clone(), errors).into());
            }

            Ok(())
        }

        pub fn validate_update(
            dto: &UpdateTaskStatus,
        ) -> Result<(), ApplicationError<UpdateTaskStatus>> {
            let mut errors = Vec::new();

            present_min_length(&mut errors, "/name", &dto.name, 1);
            present_min_length(&mut errors, "/slug", &dto.slug, 1);

            if !errors.is_empty() {
                return Err(ValidationError::from_resource(dto.clone(), errors).into());
            }

            Ok(())
        }
    }

    fn present_min_length(
        errors: &mut Vec<ValidationFieldError>,
        path: &str,
        field: &Field<Option<String>>,
        min: u64,
    ) {
        match field {
            Field::Absent => {}
            Field::Present(None) => errors.push(ValidationFieldError::new(
                "base::string",
                "null".into(),
                path.into(),
                vec![ValidationErrorKind::Required],
            )),
            Field::Present(Some(value)) => {
                let kinds = validation::min_length(value, min);
                if !kinds.is_empty() {
                    errors.push(ValidationFieldError::new(
                        "base::string",
                        value.clone(),
                        path.into(),
                        kinds,
                    ));
                }
            }
        }
    }

    pub async fn create_task_status<'dto>(
        store: &Store,
        dto: CreateTaskStatus<'dto>,
    ) -> Result<TaskStatusResponse, ApplicationError<CreateTaskStatus<'dto>>> {
        task_status::validate_create(&dto)?;

        let state = TaskStatusState::new(dto.name.into(), dto.slug.into());
        let status = store
            .task_statuses
            .insert(state)
            .await
            .map_err(|err| conflict_on_unique(err, STATUS_RESOURCE, "slug", dto.slug))?;

        Ok(TaskStatusResponse::from(&status))
    }

    pub async fn find_task_status(
        store: &Store,
        id: i64,
    ) -> Result<TaskStatusResponse, ApplicationError<()>> {
        let status = store
            .task_statuses
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<()>(STATUS_RESOURCE, id))?;

        Ok(TaskStatusResponse::from(&status))
    }

    pub async fn list_task_statuses(
        store: &Store,
    ) -> Result<Vec<TaskStatusResponse>, ApplicationError<()>> {
        let statuses = store.task_statuses.find_all().await?;
        Ok(statuses.iter().map(TaskStatusResponse::from).collect())
    }

    pub async fn update_task_status(
        store: &Store,
        id: i64,
        dto: UpdateTaskStatus,
    ) -> Result<TaskStatusResponse, ApplicationError<UpdateTaskStatus>> {
        task_status::validate_update(&dto)?;

        let status = store
            .task_statuses
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<UpdateTaskStatus>(STATUS_RESOURCE, id))?;

        let slug_for_conflict = match &dto.slug {
            Field::Present(Some(slug)) => slug.clone(),
            _ => status.slug().clone(),
        };

        let UpdateTaskStatus { name, slug } = dto;
        let updated = status.transform(|state| {
            TaskStatusState::new(name.merge_required(state.name), slug.merge_required(state.slug))
        });

        let saved = store
            .task_statuses
            .update(&updated)
            .await
            .map_err(|err| conflict_on_unique(err, STATUS_RESOURCE, "slug", &slug_for_conflict))?;

        Ok(TaskStatusResponse::from(&saved))
    }

    /// No pre-check here: the store's referential constraint rejects the
    /// delete of a status that tasks still reference.
    pub async fn delete_task_status(store: &Store, id: i64) -> Result<(), ApplicationError<()>> {
        let deleted = store
            .task_statuses
            .delete_by_id(id)
            .await
            .map_err(|err| integrity_on_restrict(err, STATUS_RESOURCE, id, TASK_RESOURCE))?;

        if !deleted {
            return Err(not_found::<()>(STATUS_RESOURCE, id));
        }

        Ok(())
    }

    pub async fn create_label<'dto>(
        store: &Store,
        dto: CreateLabel<'dto>,
    ) -> Result<LabelResponse, ApplicationError<CreateLabel<'dto>>> {
        let kinds = validation::length_range(dto.name, 3, 1000);
        if !kinds.is_empty() {
            return Err(ValidationError::from_resource(
                dto.clone(),
                vec![ValidationFieldError::new(
                    "base::string",
                    dto.name.into(),
                    "/name".into(),
                    kinds,
                )],
            )
            .into());
        }

        let label = store
            .labels
            .insert(LabelState::new(dto.name.into()))
            .await
            .map_err(|err| conflict_on_unique(err, LABEL_RESOURCE, "name", dto.name))?;

        Ok(LabelResponse::from(&label))
    }

    pub async fn find_label(store: &Store, id: i64) -> Result<LabelResponse, ApplicationError<()>> {
        let label = store
            .labels
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<()>(LABEL_RESOURCE, id))?;

        Ok(LabelResponse::from(&label))
    }

    pub async fn list_labels(store: &Store) -> Result<Vec<LabelResponse>, ApplicationError<()>> {
        let labels = store.labels.find_all().await?;
        Ok(labels.iter().map(LabelResponse::from).collect())
    }

    pub async fn update_label(
        store: &Store,
        id: i64,
        dto: UpdateLabel,
    ) -> Result<LabelResponse, ApplicationError<UpdateLabel>> {
        let mut errors = Vec::new();
        match &dto.name {
            Field::Absent => {}
            Field::Present(None) => errors.push(ValidationFieldError::new(
                "base::string",
                "null".into(),
                "/name".into(),
                vec![ValidationErrorKind::Required],
            )),
            Field::Present(Some(name)) => {
                let kinds = validation::length_range(name, 3, 1000);
                if !kinds.is_empty() {
                    errors.push(ValidationFieldError::new(
                        "base::string",
                        name.clone(),
                        "/name".into(),
                        kinds,
                    ));
                }
            }
        }
        if !errors.is_empty() {
            return Err(ValidationError::from_resource(dto.clone(), errors).into());
        }

        let label = store
            .labels
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<UpdateLabel>(LABEL_RESOURCE, id))?;

        let name_for_conflict = match &dto.name {
            Field::Present(Some(name)) => name.clone(),
            _ => label.name().clone(),
        };

        let UpdateLabel { name } = dto;
        let updated = label.transform(|state| LabelState::new(name.merge_required(state.name)));

        let saved = store
            .labels
            .update(&updated)
            .await
            .map_err(|err| conflict_on_unique(err, LABEL_RESOURCE, "name", &name_for_conflict))?;

        Ok(LabelResponse::from(&saved))
    }

    /// Same storage-level pattern as task statuses: a label attached to any
    /// task cannot be deleted.
    pub async fn delete_label(store: &Store, id: i64) -> Result<(), ApplicationError<()>> {
        let deleted = store
            .labels
            .delete_by_id(id)
            .await
            .map_err(|err| integrity_on_restrict(err, LABEL_RESOURCE, id, TASK_RESOURCE))?;

        if !deleted {
            return Err(not_found::<()>(LABEL_RESOURCE, id));
        }

        Ok(())
    }

    mod task {
        use super::*;

        pub fn validate_create<'dto>(
            dto: &CreateTask<'dto>,
        ) -> Result<(), ApplicationError<CreateTask<'dto>>> {
            let kinds = validation::min_length(dto.title, 1);
            if kinds.is_empty() {
                return Ok(());
            }

            Err(ValidationError::from_resource(
                dto.clone(),
                vec![ValidationFieldError::new(
                    "base::string",
                    dto.title.into(),
                    "/title".into(),
                    kinds,
                )],
            )
            .into())
        }

        pub fn validate_update(dto: &UpdateTask) -> Result<(), ApplicationError<UpdateTask>> {
            let mut errors = Vec::new();

            present_min_length(&mut errors, "/title", &dto.title, 1);
            present_min_length(&mut errors, "/status", &dto.status, 1);

            if !errors.is_empty() {
                return Err(ValidationError::from_resource(dto.clone(), errors).into());
            }

            Ok(())
        }
    }

    pub async fn create_task<'dto>(
        store: &Store,
        dto: CreateTask<'dto>,
    ) -> Result<TaskResponse, ApplicationError<CreateTask<'dto>>> {
        task::validate_create(&dto)?;

        let status = mapping::resolve_status(store, dto.status).await?;
        let assignee_id = mapping::resolve_assignee(store, dto.assignee_id).await?;
        let labels = mapping::resolve_labels(store, &dto.task_label_ids).await?;

        let state = TaskState::new(
            dto.index,
            assignee_id,
            dto.title.into(),
            dto.content.map(Into::into),
            status,
            labels,
        );

        let created = store.tasks.insert(state).await?;

        Ok(TaskResponse::from(&created))
    }

    pub async fn find_task(store: &Store, id: i64) -> Result<TaskResponse, ApplicationError<()>> {
        let task = store
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<()>(TASK_RESOURCE, id))?;

        Ok(TaskResponse::from(&task))
    }

    pub async fn list_tasks(store: &Store) -> Result<Vec<TaskResponse>, ApplicationError<()>> {
        let tasks = store.tasks.find_all().await?;
        Ok(tasks.iter().map(TaskResponse::from).collect())
    }

    pub async fn update_task(
        store: &Store,
        id: i64,
        dto: UpdateTask,
    ) -> Result<TaskResponse, ApplicationError<UpdateTask>> {
        task::validate_update(&dto)?;

        let task = store
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<UpdateTask>(TASK_RESOURCE, id))?;

        // Resolve every present reference before touching the entity, so a
        // failed resolution leaves no partial merge behind.
        let status = match &dto.status {
            Field::Present(Some(slug)) => Some(mapping::resolve_status(store, slug).await?),
            _ => None,
        };
        if let Field::Present(Some(assignee_id)) = &dto.assignee_id {
            mapping::resolve_assignee(store, Some(*assignee_id)).await?;
        }
        let labels = match &dto.task_label_ids {
            Field::Present(Some(ids)) => Some(mapping::resolve_labels(store, ids).await?),
            Field::Present(None) => Some(Vec::new()),
            Field::Absent => None,
        };

        let UpdateTask {
            index,
            assignee_id,
            title,
            content,
            status: _,
            task_label_ids: _,
        } = dto;

        let updated = task.transform(|state| {
            TaskState::new(
                index.merge(state.index),
                assignee_id.merge(state.assignee_id),
                title.merge_required(state.name),
                content.merge(state.description),
                status.unwrap_or(state.status),
                labels.unwrap_or(state.labels),
            )
        });

        let saved = store.tasks.update(&updated).await?;

        Ok(TaskResponse::from(&saved))
    }

    pub async fn delete_task(store: &Store, id: i64) -> Result<(), ApplicationError<()>> {
        let deleted = store.tasks.delete_by_id(id).await?;

        if !deleted {
            return Err(not_found::<()>(TASK_RESOURCE, id));
        }

        Ok(())
    }
}

pub mod seed {
    use crate::{
        domain::{
            entity::{
                board::{LabelState, TaskStatusState},
                iam::UserState,
            },
            repository::{LabelRepository, Store, TaskStatusRepository, UserRepository},
            service::PasswordHashService,
        },
        error::persistence::PersistenceError,
    };

    pub const DEFAULT_ADMIN_EMAIL: &str = "hexlet@example.com";
    pub const DEFAULT_ADMIN_PASSWORD: &str = "qwerty";

    const DEFAULT_STATUSES: [(&str, &str); 5] = [
        ("Draft", "draft"),
        ("To Review", "to_review"),
        ("To Be Fixed", "to_be_fixed"),
        ("To Publish", "to_publish"),
        ("Published", "published"),
    ];

    const DEFAULT_LABELS: [&str; 2] = ["feature", "bug"];

    /// One-shot startup seeding. Records already present are left alone, so
    /// restarting the process is safe.
    pub async fn initialize<HS: PasswordHashService>(
        store: &Store,
        hash_service: &HS,
    ) -> Result<(), PersistenceError> {
        if store
            .users
            .find_by_email(DEFAULT_ADMIN_EMAIL)
            .await?
            .is_none()
        {
            let password_hash = hash_service
                .hash_password(DEFAULT_ADMIN_PASSWORD)
                .expect("Expect to hash the default admin password");
            store
                .users
                .insert(UserState::new(
                    DEFAULT_ADMIN_EMAIL.into(),
                    "tirion".into(),
                    "lannister".into(),
                    password_hash,
                ))
                .await?;
        }

        for (name, slug) in DEFAULT_STATUSES {
            if store.task_statuses.find_by_slug(slug).await?.is_none() {
                store
                    .task_statuses
                    .insert(TaskStatusState::new(name.into(), slug.into()))
                    .await?;
            }
        }

        for name in DEFAULT_LABELS {
            if store.labels.find_by_name(name).await?.is_none() {
                store.labels.insert(LabelState::new(name.into())).await?;
            }
        }

        tracing::info!("default data seeded");

        Ok(())
    }
}
