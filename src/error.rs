use derive_more::Display;
use salvo::{prelude::StatusError, writer::Json, Piece, Response};

use self::http::ErrorResponse;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Display)]
pub struct UnknownError(BoxedError);

impl std::error::Error for UnknownError {}

impl UnknownError {
    pub fn new(err: BoxedError) -> Self {
        Self(err)
    }

    pub fn inner(self) -> BoxedError {
        self.0
    }

    pub fn ref_inner(&self) -> &BoxedError {
        &self.0
    }
}

impl From<BoxedError> for UnknownError {
    fn from(err: BoxedError) -> Self {
        Self::new(err)
    }
}

#[derive(Debug, Display)]
struct StrError(pub Box<str>);

impl std::error::Error for StrError {}

impl<'a> From<&'a str> for UnknownError {
    fn from(err: &'a str) -> Self {
        UnknownError(Box::new(StrError(Box::from(err))))
    }
}

impl From<sqlx::error::Error> for UnknownError {
    fn from(err: sqlx::error::Error) -> Self {
        Self::new(err.into())
    }
}

impl Piece for UnknownError {
    fn render(self, res: &mut Response) {
        let status = StatusError::internal_server_error();
        res.render(Json(ErrorResponse::from_status_error(&status, ())));
        res.set_status_error(status);
    }
}

pub mod app {
    use derive_more::Display;
    use salvo::{prelude::StatusError, writer::Json, Piece};
    use serde::Serialize;

    use super::{
        http::ErrorResponse,
        persistence::PersistenceError,
        resource::{
            ConflictError, IntegrityError, NotFoundError, ReferenceError, ValidationError,
        },
        security::{AuthenticationError, ForbiddenError, UnauthorizedError},
    };

    #[derive(Debug, Display, Serialize)]
    pub enum ApplicationError<R> {
        Authentication(AuthenticationError),
        Unauthorized(UnauthorizedError),
        Forbidden(ForbiddenError),
        Validation(ValidationError<R>),
        Reference(ReferenceError),
        NotFound(NotFoundError),
        Conflict(ConflictError),
        Integrity(IntegrityError),
        Persistence(PersistenceError),
    }

    impl<R: std::fmt::Debug> std::error::Error for ApplicationError<R> {}

    impl<R> From<AuthenticationError> for ApplicationError<R> {
        fn from(err: AuthenticationError) -> Self {
            Self::Authentication(err)
        }
    }

    impl<R> From<UnauthorizedError> for ApplicationError<R> {
        fn from(err: UnauthorizedError) -> Self {
            Self::Unauthorized(err)
        }
    }

    impl<R> From<ForbiddenError> for ApplicationError<R> {
        fn from(err: ForbiddenError) -> Self {
            Self::Forbidden(err)
        }
    }

    impl<R> From<ValidationError<R>> for ApplicationError<R> {
        fn from(err: ValidationError<R>) -> Self {
            Self::Validation(err)
        }
    }

    impl<R> From<ReferenceError> for ApplicationError<R> {
        fn from(err: ReferenceError) -> Self {
            Self::Reference(err)
        }
    }

    impl<R> From<NotFoundError> for ApplicationError<R> {
        fn from(err: NotFoundError) -> Self {
            Self::NotFound(err)
        }
    }

    impl<R> From<ConflictError> for ApplicationError<R> {
        fn from(err: ConflictError) -> Self {
            Self::Conflict(err)
        }
    }

    impl<R> From<IntegrityError> for ApplicationError<R> {
        fn from(err: IntegrityError) -> Self {
            Self::Integrity(err)
        }
    }

    impl<R> From<PersistenceError> for ApplicationError<R> {
        fn from(err: PersistenceError) -> Self {
            Self::Persistence(err)
        }
    }

    impl<R: Serialize + Send> Piece for ApplicationError<R> {
        fn render(self, res: &mut salvo::Response) {
            let status = match &self {
                ApplicationError::Persistence(_) => StatusError::service_unavailable(),
                ApplicationError::Validation(_) => StatusError::bad_request(),
                ApplicationError::Authentication(_) | ApplicationError::Unauthorized(_) => {
                    StatusError::unauthorized()
                }
                ApplicationError::Forbidden(_) => StatusError::forbidden(),
                ApplicationError::Reference(_) | ApplicationError::NotFound(_) => {
                    StatusError::not_found()
                }
                ApplicationError::Conflict(_) | ApplicationError::Integrity(_) => {
                    StatusError::conflict()
                }
            };
            res.render(Json(ErrorResponse::from_status_error(&status, self)));
            res.set_status_error(status);
        }
    }
}

pub mod persistence {
    use std::io;

    use derive_more::Display;
    use serde::Serialize;

    use super::UnknownError;

    pub type SqlState = String;

    #[derive(Debug, Display)]
    pub enum PersistenceError {
        /// A uniqueness constraint rejected a save.
        #[display(fmt = "unique constraint violated: {_0:?}")]
        UniqueViolation(Option<String>),
        /// A referential constraint rejected a delete or insert.
        #[display(fmt = "referential constraint violated: {_0:?}")]
        ForeignKeyRestrict(Option<String>),
        #[display(fmt = "database persistence error: SQLSTATE {_0:?}")]
        Database(Option<SqlState>),
        #[display(fmt = "persistence layer connection error: {_0}")]
        Connection(io::Error),
        #[display(fmt = "PersistenceError data not found")]
        NotFound,
        #[display(fmt = "PersistenceError decoding data")]
        DecodeData,
        #[display(fmt = "unknown persistence error: {_0}")]
        Unknown(UnknownError),
    }

    impl std::error::Error for PersistenceError {}

    impl Serialize for PersistenceError {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_none()
        }
    }

    const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";
    const SQLSTATE_FOREIGN_KEY_VIOLATION: &str = "23503";

    type SqlxError = sqlx::error::Error;

    impl From<SqlxError> for PersistenceError {
        fn from(err: SqlxError) -> Self {
            match err {
                SqlxError::Configuration(_) => {
                    Self::Connection(io::ErrorKind::InvalidInput.into())
                }
                SqlxError::Database(db) => {
                    let constraint = db.constraint().map(String::from);
                    match db.code().as_deref() {
                        Some(SQLSTATE_UNIQUE_VIOLATION) => Self::UniqueViolation(constraint),
                        Some(SQLSTATE_FOREIGN_KEY_VIOLATION) => {
                            Self::ForeignKeyRestrict(constraint)
                        }
                        code => Self::Database(code.map(String::from)),
                    }
                }
                SqlxError::Io(io) => Self::Connection(io),
                SqlxError::Tls(_) => Self::Connection(io::ErrorKind::ConnectionRefused.into()),
                SqlxError::Protocol(msg) => {
                    Self::Connection(io::Error::new(io::ErrorKind::InvalidData, msg))
                }
                SqlxError::RowNotFound => Self::NotFound,
                SqlxError::TypeNotFound { .. } => Self::DecodeData,
                SqlxError::ColumnIndexOutOfBounds { .. } => Self::DecodeData,
                SqlxError::ColumnNotFound(_) => Self::NotFound,
                SqlxError::ColumnDecode { .. } => Self::DecodeData,
                SqlxError::Decode(_) => Self::DecodeData,
                SqlxError::PoolTimedOut => Self::Connection(io::ErrorKind::TimedOut.into()),
                SqlxError::PoolClosed => Self::Connection(io::ErrorKind::NotConnected.into()),
                SqlxError::WorkerCrashed => {
                    tracing::error!("FATAL: sqlx background worker error, {err}");
                    panic!("sqlx background worker error: {err}");
                }
                _ => PersistenceError::Unknown(err.into()),
            }
        }
    }
}

pub mod resource {
    use derive_more::{Display, Error};
    use serde::{Deserialize, Serialize};

    use crate::base::ResourceID;

    #[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum ValidationErrorKind {
        /// When a required property is missing or explicitly null.
        Required,

        /// Maximum inclusive string length.
        MaxLength(u64),
        /// Minimum inclusive string length.
        MinLength(u64),
        /// When the input doesn't match to a pattern.
        Pattern(String),
        /// When the input is empty or whitespace only.
        Blank,

        /// The input value doesn't match any of specified options.
        UnknownVariant,
        /// The input value doesn't match one or multiple required types.
        InvalidType,
        /// Duplicated input value.
        Duplicated,
        /// Input value already exists.
        AlreadyExists,
        /// Input value was not found.
        NotFound,
        /// Generic kind.
        Invalid,
    }

    impl std::error::Error for ValidationErrorKind {}

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
    pub struct ValidationError<R> {
        /// Resource value
        pub resource: R,
        /// Name of the resource
        pub resource_type: &'static str,
        /// Invalid resource fields
        pub fields: Vec<ValidationFieldError>,
    }

    impl<R> ValidationError<R> {
        pub fn from_resource(resource: R, fields: Vec<ValidationFieldError>) -> Self
        where
            R: ResourceID,
        {
            Self {
                resource,
                resource_type: R::resource_id(),
                fields,
            }
        }
    }

    impl<R> std::fmt::Display for ValidationError<R> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!(
                "Invalid resource {}, fields {:?}",
                self.resource_type, self.fields
            ))
        }
    }

    impl<R: std::fmt::Debug> std::error::Error for ValidationError<R> {}

    #[derive(Debug, Display, Error, Clone, PartialEq, Eq, Hash, Serialize)]
    #[display(fmt = "{path}: {value:?}, {kinds:?}")]
    pub struct ValidationFieldError {
        /// Resource field path with invalid value
        pub path: String,
        /// Displayed invalid value
        pub value: String,
        /// Value type id
        pub type_id: &'static str,
        /// Kinds of validation errors
        pub kinds: Vec<ValidationErrorKind>,
    }

    impl ValidationFieldError {
        pub fn from_resource<T>(value: String, path: String, kinds: Vec<ValidationErrorKind>) -> Self
        where
            T: ResourceID,
        {
            Self {
                path,
                type_id: T::resource_id(),
                value,
                kinds,
            }
        }

        pub fn new(
            type_id: &'static str,
            value: String,
            path: String,
            kinds: Vec<ValidationErrorKind>,
        ) -> Self {
            Self {
                path,
                type_id,
                value,
                kinds,
            }
        }
    }

    /// Uniqueness conflict reported by the store on save.
    #[derive(Debug, Display, Clone, Error, PartialEq, Eq, Hash, Serialize)]
    #[display(fmt = "Conflicting {resource_type}: {field} {value:?} already exists")]
    pub struct ConflictError {
        /// Name of the resource
        pub resource_type: &'static str,
        /// Field owning the uniqueness constraint
        pub field: &'static str,
        /// Conflicting value
        pub value: String,
    }

    /// Target entity of the operation does not exist.
    #[derive(Debug, Display, Clone, Error, PartialEq, Eq, Hash, Serialize)]
    #[display(fmt = "{resource_type} with id {id} not found")]
    pub struct NotFoundError {
        pub resource_type: &'static str,
        pub id: i64,
    }

    /// A referenced slug or id in the payload did not resolve.
    #[derive(Debug, Display, Clone, Error, PartialEq, Eq, Hash, Serialize)]
    #[display(fmt = "{resource_type} {reference:?} not found")]
    pub struct ReferenceError {
        pub resource_type: &'static str,
        /// The unresolved reference, as given in the payload
        pub reference: String,
    }

    /// Delete blocked by a live reference from another entity.
    #[derive(Debug, Display, Clone, Error, PartialEq, Eq, Hash, Serialize)]
    #[display(fmt = "{resource_type} with id {id} is still referenced by {referenced_by}")]
    pub struct IntegrityError {
        pub resource_type: &'static str,
        pub id: i64,
        pub referenced_by: &'static str,
    }
}

pub mod security {
    use derive_more::Display;
    use serde::Serialize;

    use crate::domain::datatype::security::{PasswordHashError, TokenEncryptionError};

    /// Unauthorized access to a resource.
    ///
    /// The caller did not present a usable authentication token.
    #[derive(Debug, Display, Serialize)]
    pub enum UnauthorizedError {
        /// Authentication token is not present.
        #[display(fmt = "token_not_present")]
        TokenNotPresent,

        /// Authentication token is malformatted.
        ///
        /// The token is not formated as the required authentication scheme
        #[display(fmt = "malformatted_token")]
        MalformattedToken,

        /// Authentication token is invalid.
        #[display(fmt = "invalid_token")]
        InvalidToken,
    }

    #[derive(Debug, Display, Serialize)]
    pub enum AuthenticationError {
        /// Attempt to authenticate with invalid credentials.
        #[display(fmt = "invalid_credential")]
        InvalidCredential,
    }

    #[derive(Debug, Display, Serialize)]
    pub enum ForbiddenError {
        /// Access denied.
        ///
        /// The user is authenticated, however does not have access to the requested resource.
        #[display(fmt = "access_denied")]
        AccessDenied,
    }

    impl From<PasswordHashError> for AuthenticationError {
        fn from(_: PasswordHashError) -> Self {
            Self::InvalidCredential
        }
    }

    impl From<TokenEncryptionError> for UnauthorizedError {
        fn from(_: TokenEncryptionError) -> Self {
            Self::InvalidToken
        }
    }
}

pub mod http {
    use derive_more::{Display, Error};
    use salvo::{http::ParseError, prelude::StatusError, writer::Json, Piece, Response};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Display, Clone, Error, Serialize, Deserialize)]
    pub enum BadRequest {
        InvalidContent,
    }

    #[derive(Debug, Display, Clone, Serialize, Deserialize)]
    #[display(fmt = "Response error: {title}, {message}")]
    pub struct ErrorResponse<T> {
        pub title: String,
        pub message: String,
        pub error: T,
    }

    impl<T> ErrorResponse<T> {
        pub fn from_status_error(status: &StatusError, err: T) -> Self {
            Self {
                title: status.name.clone(),
                message: status
                    .summary
                    .clone()
                    .unwrap_or_else(|| status.name.clone()),
                error: err,
            }
        }
    }

    impl From<ParseError> for BadRequest {
        fn from(_: ParseError) -> Self {
            BadRequest::InvalidContent
        }
    }

    impl Piece for BadRequest {
        fn render(self, res: &mut Response) {
            let status = StatusError::bad_request();
            res.render(Json(ErrorResponse::from_status_error(&status, self)));
            res.set_status_error(status);
        }
    }
}
