use std::sync::Arc;

use async_trait::async_trait;
use salvo::{
    http::{HeaderValue, StatusCode},
    writer::Json,
    Depot, FlowCtrl, Handler, Request, Response,
};

use crate::{
    app::{
        resource::{
            board::{CreateLabel, CreateTask, CreateTaskStatus, UpdateLabel, UpdateTask, UpdateTaskStatus},
            iam::{CreateUser, UpdateUser, UserCredential},
        },
        use_case,
    },
    domain::{
        datatype::security::TokenPayload, repository::Store, service::TokenEncryptionService,
    },
    error::{app::ApplicationError, http::BadRequest, security::UnauthorizedError},
    infra::service::security::{Argon2HashService, JWTEncryptionService},
};

macro_rules! map_res_err {
    ($result:ident, $response:ident) => {
        match $result {
            Err(err) => {
                $response.render(err);
                return;
            }
            Ok(ok) => ok,
        }
    };
}

/// Extract a authorization token from a request.
///
/// Token must be formated in the Bearer authentication scheme
/// described in [RFC 7617](https://datatracker.ietf.org/doc/html/rfc7617)
fn extract_token<'req>(req: &'req Request) -> Result<&'req str, UnauthorizedError> {
    let scheme: Option<&str> = req.header("authorization");
    scheme
        .ok_or(UnauthorizedError::TokenNotPresent)?
        .strip_prefix("Bearer ")
        .ok_or(UnauthorizedError::MalformattedToken)
}

/// Verify the bearer token and return its claims.
fn authenticate(
    req: &Request,
    token_service: &JWTEncryptionService,
) -> Result<TokenPayload, ApplicationError<()>> {
    let token = extract_token(req)?;
    let payload = token_service
        .verify_token(token)
        .map_err(UnauthorizedError::from)?;
    Ok(payload)
}

/// Extract a numeric id from a request id param
///
/// # Panic
///
/// Panics if a id param is not present or the content is not a valid i64
fn extract_id(req: &Request) -> i64 {
    req.params()
        .get("id")
        .expect("Expect to route only with valid numeric id")
        .parse()
        .expect("Expect id param as a valid i64")
}

fn put_total_count(res: &mut Response, count: usize) {
    if let Ok(value) = HeaderValue::from_str(&count.to_string()) {
        res.headers_mut().insert("x-total-count", value);
    }
}

pub struct WelcomeController;

#[async_trait]
impl Handler for WelcomeController {
    async fn handle(&self, _: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        res.render("Welcome to the task manager!");
    }
}

pub struct AuthenticateUserController {
    pub(crate) store: Store,
    pub(crate) hash_service: Arc<Argon2HashService>,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for AuthenticateUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<UserCredential, _> = req.parse_body().await.map_err(BadRequest::from);
        let credential = map_res_err!(result, res);

        let result = use_case::iam::authenticate_user(
            &self.store,
            self.hash_service.as_ref(),
            self.token_service.as_ref(),
            credential,
        )
        .await;
        let auth_response = map_res_err!(result, res);

        res.render(Json(auth_response));
        res.set_status_code(StatusCode::OK);
    }
}

pub struct CreateUserController {
    pub(crate) store: Store,
    pub(crate) hash_service: Arc<Argon2HashService>,
}

#[async_trait]
impl Handler for CreateUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<CreateUser, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::iam::create_user(&self.store, self.hash_service.as_ref(), dto).await;
        let user = map_res_err!(result, res);

        res.render(Json(user));
        res.set_status_code(StatusCode::CREATED);
    }
}

pub struct ListUsersController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for ListUsersController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::iam::list_users(&self.store).await;
        let users = map_res_err!(result, res);

        put_total_count(res, users.len());
        res.render(Json(users));
    }
}

pub struct ShowUserController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for ShowUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::iam::find_user(&self.store, extract_id(req)).await;
        let user = map_res_err!(result, res);

        res.render(Json(user));
    }
}

pub struct UpdateUserController {
    pub(crate) store: Store,
    pub(crate) hash_service: Arc<Argon2HashService>,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for UpdateUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        let principal = map_res_err!(result, res);
        let id = extract_id(req);

        let result: Result<UpdateUser, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::iam::update_user(
            &self.store,
            self.hash_service.as_ref(),
            &principal.sub,
            id,
            dto,
        )
        .await;
        let user = map_res_err!(result, res);

        res.render(Json(user));
    }
}

pub struct DeleteUserController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for DeleteUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        let principal = map_res_err!(result, res);

        let result = use_case::iam::delete_user(&self.store, &principal.sub, extract_id(req)).await;
        map_res_err!(result, res);

        res.set_status_code(StatusCode::NO_CONTENT);
    }
}

pub struct CreateTaskStatusController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for CreateTaskStatusController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result: Result<CreateTaskStatus, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::board::create_task_status(&self.store, dto).await;
        let status = map_res_err!(result, res);

        res.render(Json(status));
        res.set_status_code(StatusCode::CREATED);
    }
}

pub struct ListTaskStatusesController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for ListTaskStatusesController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::list_task_statuses(&self.store).await;
        let statuses = map_res_err!(result, res);

        put_total_count(res, statuses.len());
        res.render(Json(statuses));
    }
}

pub struct ShowTaskStatusController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for ShowTaskStatusController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::find_task_status(&self.store, extract_id(req)).await;
        let status = map_res_err!(result, res);

        res.render(Json(status));
    }
}

pub struct UpdateTaskStatusController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for UpdateTaskStatusController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);
        let id = extract_id(req);

        let result: Result<UpdateTaskStatus, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::board::update_task_status(&self.store, id, dto).await;
        let status = map_res_err!(result, res);

        res.render(Json(status));
    }
}

pub struct DeleteTaskStatusController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for DeleteTaskStatusController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::delete_task_status(&self.store, extract_id(req)).await;
        map_res_err!(result, res);

        res.set_status_code(StatusCode::NO_CONTENT);
    }
}

pub struct CreateLabelController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for CreateLabelController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result: Result<CreateLabel, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::board::create_label(&self.store, dto).await;
        let label = map_res_err!(result, res);

        res.render(Json(label));
        res.set_status_code(StatusCode::CREATED);
    }
}

pub struct ListLabelsController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for ListLabelsController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::list_labels(&self.store).await;
        let labels = map_res_err!(result, res);

        put_total_count(res, labels.len());
        res.render(Json(labels));
    }
}

pub struct ShowLabelController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for ShowLabelController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::find_label(&self.store, extract_id(req)).await;
        let label = map_res_err!(result, res);

        res.render(Json(label));
    }
}

pub struct UpdateLabelController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for UpdateLabelController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);
        let id = extract_id(req);

        let result: Result<UpdateLabel, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::board::update_label(&self.store, id, dto).await;
        let label = map_res_err!(result, res);

        res.render(Json(label));
    }
}

pub struct DeleteLabelController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for DeleteLabelController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::delete_label(&self.store, extract_id(req)).await;
        map_res_err!(result, res);

        res.set_status_code(StatusCode::NO_CONTENT);
    }
}

pub struct CreateTaskController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for CreateTaskController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result: Result<CreateTask, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::board::create_task(&self.store, dto).await;
        let task = map_res_err!(result, res);

        res.render(Json(task));
        res.set_status_code(StatusCode::CREATED);
    }
}

pub struct ListTasksController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for ListTasksController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::list_tasks(&self.store).await;
        let tasks = map_res_err!(result, res);

        put_total_count(res, tasks.len());
        res.render(Json(tasks));
    }
}

pub struct ShowTaskController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for ShowTaskController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::find_task(&self.store, extract_id(req)).await;
        let task = map_res_err!(result, res);

        res.render(Json(task));
    }
}

pub struct UpdateTaskController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for UpdateTaskController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);
        let id = extract_id(req);

        let result: Result<UpdateTask, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::board::update_task(&self.store, id, dto).await;
        let task = map_res_err!(result, res);

        res.render(Json(task));
    }
}

pub struct DeleteTaskController {
    pub(crate) store: Store,
    pub(crate) token_service: Arc<JWTEncryptionService>,
}

#[async_trait]
impl Handler for DeleteTaskController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = authenticate(req, self.token_service.as_ref());
        map_res_err!(result, res);

        let result = use_case::board::delete_task(&self.store, extract_id(req)).await;
        map_res_err!(result, res);

        res.set_status_code(StatusCode::NO_CONTENT);
    }
}
