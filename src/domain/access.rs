use super::entity::iam::User;

/// Ownership policy over user records.
///
/// Only applied to update and delete: creation is open and reads carry no
/// per-resource check.
pub struct UserPolicy;

impl UserPolicy {
    /// The acting principal may mutate the target user only when its subject
    /// claim matches the target's email exactly (case-sensitive).
    pub fn may_mutate(principal_email: &str, target: &User) -> bool {
        target.email() == principal_email
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        datatype::security::PasswordHash,
        entity::{iam::UserState, EntityCtl, EntityData},
    };

    fn user(id: i64, email: &str) -> User {
        EntityCtl::restore(
            EntityData {
                id,
                created: Utc::now(),
                updated: None,
                version: 1,
            },
            UserState::new(
                email.into(),
                "Ada".into(),
                "Lovelace".into(),
                "$argon2id$v=19$m=4096,t=3,p=1$c2FsdHNhbHQ$QUJDREVGR0hJSktMTU5PUA"
                    .parse::<PasswordHash>()
                    .unwrap(),
            ),
        )
    }

    #[test]
    fn owner_may_mutate() {
        assert!(UserPolicy::may_mutate("a@x.com", &user(1, "a@x.com")));
    }

    #[test]
    fn other_principal_may_not_mutate() {
        assert!(!UserPolicy::may_mutate("a@x.com", &user(2, "b@x.com")));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!UserPolicy::may_mutate("A@x.com", &user(1, "a@x.com")));
    }
}
