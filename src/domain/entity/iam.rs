use crate::domain::datatype::security::PasswordHash;

use super::{state_ref, EntityCtl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: PasswordHash,
}

pub type User = EntityCtl<UserState>;

impl User {
    state_ref!(email, String);
    state_ref!(first_name, String);
    state_ref!(last_name, String);
    state_ref!(password_hash, PasswordHash);
}

impl UserState {
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            email,
            first_name,
            last_name,
            password_hash,
        }
    }
}
