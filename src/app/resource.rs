use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Partial-update field state.
///
/// Distinguishes a field omitted from the payload from one included with a
/// value, where the value may itself be `None` for fields that accept an
/// explicit null. Update DTOs wrap every field in `Field` so the merge can
/// tell "leave unchanged" apart from "overwrite, possibly clearing".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field<T> {
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// Absent keeps the current value, present overwrites unconditionally.
    pub fn merge(self, current: T) -> T {
        match self {
            Field::Absent => current,
            Field::Present(value) => value,
        }
    }
}

impl<T> Field<Option<T>> {
    /// Merge for required fields: a present value overwrites, while absent
    /// keeps the current one. A present null never reaches this point —
    /// validation rejects it for required fields — so it is treated as
    /// absent rather than clearing.
    pub fn merge_required(self, current: T) -> T {
        match self {
            Field::Present(Some(value)) => value,
            Field::Absent | Field::Present(None) => current,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Field::Present)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Field::Absent => serializer.serialize_none(),
            Field::Present(value) => value.serialize(serializer),
        }
    }
}

pub mod iam {
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    use crate::base::resource_id;

    use super::Field;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateUser<'a> {
        pub email: &'a str,
        #[serde(rename = "firstName")]
        pub first_name: &'a str,
        #[serde(rename = "lastName")]
        pub last_name: &'a str,
        pub password: &'a str,
    }

    resource_id!(CreateUser<'_>, "iam::CreateUser");

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct UpdateUser {
        #[serde(default)]
        pub email: Field<Option<String>>,
        #[serde(default, rename = "firstName")]
        pub first_name: Field<Option<String>>,
        #[serde(default, rename = "lastName")]
        pub last_name: Field<Option<String>>,
        #[serde(default)]
        pub password: Field<Option<String>>,
    }

    resource_id!(UpdateUser, "iam::UpdateUser");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserCredential<'a> {
        pub email: &'a str,
        pub password: &'a str,
    }

    resource_id!(UserCredential<'_>, "iam::UserCredential");

    /// User read model. The password hash never leaves the store boundary.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct UserResponse {
        pub id: i64,
        pub email: String,
        #[serde(rename = "firstName")]
        pub first_name: String,
        #[serde(rename = "lastName")]
        pub last_name: String,
        #[serde(rename = "createdAt")]
        pub created_at: NaiveDate,
    }

    resource_id!(UserResponse, "iam::User");

    #[derive(Debug, Clone, Serialize)]
    pub struct AuthenticateUserResponse {
        pub user: UserResponse,
        pub token: String,
    }

    resource_id!(AuthenticateUserResponse, "iam::AuthenticateUser");
}

pub mod board {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    use crate::base::resource_id;

    use super::Field;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateTaskStatus<'a> {
        pub name: &'a str,
        pub slug: &'a str,
    }

    resource_id!(CreateTaskStatus<'_>, "board::CreateTaskStatus");

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct UpdateTaskStatus {
        #[serde(default)]
        pub name: Field<Option<String>>,
        #[serde(default)]
        pub slug: Field<Option<String>>,
    }

    resource_id!(UpdateTaskStatus, "board::UpdateTaskStatus");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct TaskStatusResponse {
        pub id: i64,
        pub name: String,
        pub slug: String,
        #[serde(rename = "createdAt")]
        pub created_at: NaiveDate,
    }

    resource_id!(TaskStatusResponse, "board::TaskStatus");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateLabel<'a> {
        pub name: &'a str,
    }

    resource_id!(CreateLabel<'_>, "board::CreateLabel");

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct UpdateLabel {
        #[serde(default)]
        pub name: Field<Option<String>>,
    }

    resource_id!(UpdateLabel, "board::UpdateLabel");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct LabelResponse {
        pub id: i64,
        pub name: String,
        #[serde(rename = "createdAt")]
        pub created_at: NaiveDate,
    }

    resource_id!(LabelResponse, "board::Label");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateTask<'a> {
        #[serde(default)]
        pub index: Option<i32>,
        #[serde(default)]
        pub assignee_id: Option<i64>,
        pub title: &'a str,
        #[serde(default)]
        pub content: Option<&'a str>,
        pub status: &'a str,
        #[serde(default, rename = "taskLabelIds")]
        pub task_label_ids: BTreeSet<i64>,
    }

    resource_id!(CreateTask<'_>, "board::CreateTask");

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct UpdateTask {
        #[serde(default)]
        pub index: Field<Option<i32>>,
        #[serde(default)]
        pub assignee_id: Field<Option<i64>>,
        #[serde(default)]
        pub title: Field<Option<String>>,
        #[serde(default)]
        pub content: Field<Option<String>>,
        #[serde(default)]
        pub status: Field<Option<String>>,
        #[serde(default, rename = "taskLabelIds")]
        pub task_label_ids: Field<Option<BTreeSet<i64>>>,
    }

    resource_id!(UpdateTask, "board::UpdateTask");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct TaskResponse {
        pub id: i64,
        pub index: Option<i32>,
        pub assignee_id: Option<i64>,
        pub title: String,
        pub content: Option<String>,
        pub status: String,
        #[serde(rename = "taskLabelIds")]
        pub task_label_ids: BTreeSet<i64>,
        #[serde(rename = "createdAt")]
        pub created_at: NaiveDate,
    }

    resource_id!(TaskResponse, "board::Task");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        board::UpdateTask,
        iam::UpdateUser,
        Field,
    };

    #[test]
    fn omitted_field_deserializes_as_absent() {
        let dto: UpdateUser = serde_json::from_str(r#"{"email":"new@x.com"}"#).unwrap();

        assert_eq!(dto.email, Field::Present(Some("new@x.com".into())));
        assert_eq!(dto.first_name, Field::Absent);
        assert_eq!(dto.last_name, Field::Absent);
        assert_eq!(dto.password, Field::Absent);
    }

    #[test]
    fn null_field_deserializes_as_present_none() {
        let dto: UpdateTask =
            serde_json::from_str(r#"{"content":null,"assignee_id":null}"#).unwrap();

        assert_eq!(dto.content, Field::Present(None));
        assert_eq!(dto.assignee_id, Field::Present(None));
        assert_eq!(dto.index, Field::Absent);
    }

    #[test]
    fn label_id_set_deserializes_as_present_set() {
        let dto: UpdateTask = serde_json::from_str(r#"{"taskLabelIds":[3,1,2]}"#).unwrap();

        let ids = match dto.task_label_ids {
            Field::Present(Some(ids)) => ids,
            other => panic!("expected present set, got {other:?}"),
        };
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn merge_keeps_current_on_absent() {
        let current = Some("keep".to_string());
        assert_eq!(
            Field::<Option<String>>::Absent.merge(current.clone()),
            current
        );
    }

    #[test]
    fn merge_overwrites_on_present() {
        assert_eq!(
            Field::Present(None).merge(Some("gone".to_string())),
            None::<String>
        );
        assert_eq!(
            Field::Present(Some(7)).merge(Some(3)),
            Some(7)
        );
    }

    #[test]
    fn merge_required_never_clears() {
        assert_eq!(
            Field::<Option<String>>::Present(None).merge_required("kept".to_string()),
            "kept"
        );
        assert_eq!(
            Field::Present(Some("new".to_string())).merge_required("old".to_string()),
            "new"
        );
        assert_eq!(
            Field::<Option<String>>::Absent.merge_required("old".to_string()),
            "old"
        );
    }

    #[test]
    fn merge_is_idempotent_for_same_value() {
        let first = Field::Present(Some(5)).merge(None);
        let second = Field::Present(Some(5)).merge(first);
        assert_eq!(first, second);
    }
}
