use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{
    base::ResourceID,
    error::resource::{ValidationErrorKind, ValidationFieldError},
};

/// Password hash in the [PHC string format][1].
///
/// The core never sees a plaintext password beyond the mapping boundary: the
/// one-way transform output is the only representation an entity carries.
///
/// [1]: https://github.com/P-H-C/phc-string-format/blob/master/phc-sf-spec.md#specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ResourceID for PasswordHash {
    fn resource_id() -> &'static str {
        "base::password_hash"
    }
}

impl FromStr for PasswordHash {
    type Err = ValidationFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        password_hash::PasswordHash::new(s).map_err(|_| {
            Self::Err::from_resource::<Self>(
                s.into(),
                String::new(),
                vec![ValidationErrorKind::Invalid],
            )
        })?;

        Ok(Self(s.into()))
    }
}

impl From<password_hash::PasswordHash<'_>> for PasswordHash {
    fn from(hash: password_hash::PasswordHash<'_>) -> Self {
        Self(hash.to_string())
    }
}

impl std::fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
pub enum PasswordHashError {
    /// Unsupported Algorithm.
    UnsupportedAlgorithm,

    /// Invalid password.
    InvalidPassword,

    /// Invalid password hash.
    InvalidPasswordHash,

    /// Cryptographic error.
    Cryptographic,

    /// Error in the hasher configuration.
    Config,

    /// Unknown hashing error.
    Unknown,
}

impl From<password_hash::Error> for PasswordHashError {
    fn from(err: password_hash::Error) -> Self {
        match err {
            password_hash::Error::Algorithm => Self::UnsupportedAlgorithm,
            password_hash::Error::B64Encoding(_) => Self::InvalidPasswordHash,
            password_hash::Error::Crypto => Self::Cryptographic,
            password_hash::Error::OutputTooShort => Self::Cryptographic,
            password_hash::Error::OutputTooLong => Self::Cryptographic,
            password_hash::Error::ParamNameDuplicated => Self::Config,
            password_hash::Error::ParamNameInvalid => Self::Config,
            password_hash::Error::ParamValueInvalid(_) => Self::Config,
            password_hash::Error::ParamsMaxExceeded => Self::Config,
            password_hash::Error::Password => Self::InvalidPassword,
            password_hash::Error::PhcStringInvalid => Self::InvalidPasswordHash,
            password_hash::Error::PhcStringTooShort => Self::InvalidPasswordHash,
            password_hash::Error::PhcStringTooLong => Self::InvalidPasswordHash,
            password_hash::Error::SaltInvalid(_) => Self::Config,
            password_hash::Error::Version => Self::UnsupportedAlgorithm,
            _ => Self::Unknown,
        }
    }
}

pub struct TokenIssuer;

impl TokenIssuer {
    pub fn as_str() -> &'static str {
        "taskboard_api"
    }
}

/// Signed token claims.
///
/// `sub` carries the authenticated user's email, the identity the
/// authorization policy compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub iss: String,
    pub sub: String,
    pub exp: u64,
    pub iat: u64,
}

impl TokenPayload {
    pub fn new(expiration: Duration, subject: String) -> Self {
        let issued_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Expect current time after the unix epoch")
            .as_secs();

        Self {
            iss: TokenIssuer::as_str().into(),
            sub: subject,
            exp: issued_at + expiration.as_secs(),
            iat: issued_at,
        }
    }
}

#[derive(Debug)]
pub enum TokenEncryptionError {
    /// Token signature, claims or encoding failed verification.
    InvalidToken,

    /// Token expiration claim is in the past.
    Expired,

    /// Signing a new token failed.
    Issue,
}

impl From<jsonwebtoken::errors::Error> for TokenEncryptionError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::InvalidToken,
        }
    }
}
