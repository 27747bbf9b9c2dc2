use sqlx::{postgres::PgRow, Row};

use super::entity::{
    board::{Label, LabelState, TaskStatus, TaskStatusState},
    iam::{User, UserState},
    EntityData,
};

impl From<&PgRow> for EntityData {
    fn from(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            created: row.get("created"),
            updated: row.get("updated"),
            version: row.get::<i64, _>("version") as u32,
        }
    }
}

impl From<&PgRow> for UserState {
    fn from(row: &PgRow) -> Self {
        Self {
            email: row.get("email"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            password_hash: row
                .get::<&str, _>("password_hash")
                .parse()
                .expect("user table to have password_hash of type TEXT with valid PHC string"),
        }
    }
}

impl From<&PgRow> for User {
    fn from(row: &PgRow) -> Self {
        Self::restore(row.into(), row.into())
    }
}

impl From<&PgRow> for TaskStatusState {
    fn from(row: &PgRow) -> Self {
        Self {
            name: row.get("name"),
            slug: row.get("slug"),
        }
    }
}

impl From<&PgRow> for TaskStatus {
    fn from(row: &PgRow) -> Self {
        Self::restore(row.into(), row.into())
    }
}

impl From<&PgRow> for LabelState {
    fn from(row: &PgRow) -> Self {
        Self {
            name: row.get("name"),
        }
    }
}

impl From<&PgRow> for Label {
    fn from(row: &PgRow) -> Self {
        Self::restore(row.into(), row.into())
    }
}
