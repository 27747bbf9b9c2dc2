use super::datatype::security::{
    PasswordHash, PasswordHashError, TokenEncryptionError, TokenPayload,
};

/// One-way transform applied to passwords before storage or comparison.
pub trait PasswordHashService {
    fn hash_password(&self, pwd: &str) -> Result<PasswordHash, PasswordHashError>;
    fn verify_password(&self, pwd: &str, hash: &PasswordHash) -> Result<(), PasswordHashError>;
}

/// Signed token with a subject claim, issued on authentication and verified
/// on every guarded request.
pub trait TokenEncryptionService {
    fn issue_token(&self, payload: &TokenPayload) -> Result<String, TokenEncryptionError>;
    fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenEncryptionError>;
}
