pub mod connection {
    use std::time::Duration;

    use crate::config::env_var;

    pub async fn create_sqlx_pool() -> sqlx::PgPool {
        let dburl = env_var::get().database_url.clone();
        sqlx::postgres::PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .acquire_timeout(Duration::from_millis(1000))
            .idle_timeout(Duration::from_millis(1000 * 30))
            .max_lifetime(Duration::from_millis(1000 * 10))
            .connect(&dburl)
            .await
            .expect("Expect to create a database pool with a open connection")
    }
}

pub mod sql {
    use sqlx::{Database, Encode, QueryBuilder, Type};

    pub fn push_list<'args, I, T, DB>(qb: &mut QueryBuilder<'args, DB>, list: I)
    where
        I: IntoIterator<Item = T>,
        T: 'args + Encode<'args, DB> + Send + Type<DB>,
        DB: Database,
    {
        qb.push("(");
        let mut sep = qb.separated(", ");
        for item in list {
            sep.push_bind(item);
        }
        sep.push_unseparated(")");
    }
}

pub mod repository {
    use std::sync::Arc;

    use async_trait::async_trait;
    use futures::TryStreamExt;
    use sqlx::{postgres::PgRow, PgPool, QueryBuilder, Row};

    use super::sql;
    use crate::{
        domain::{
            entity::{
                board::{Label, LabelState, Task, TaskState, TaskStatus, TaskStatusState},
                iam::{User, UserState},
                Entity, EntityData,
            },
            repository::{
                LabelRepository, PersistenceResult, Store, TaskRepository, TaskStatusRepository,
                UserRepository,
            },
        },
        error::persistence::PersistenceError,
    };

    pub fn create_store(pool: &PgPool) -> Store {
        Store {
            users: Arc::new(PgUserRepository { pool: pool.clone() }),
            task_statuses: Arc::new(PgTaskStatusRepository { pool: pool.clone() }),
            labels: Arc::new(PgLabelRepository { pool: pool.clone() }),
            tasks: Arc::new(PgTaskRepository { pool: pool.clone() }),
        }
    }

    pub struct PgUserRepository {
        pool: PgPool,
    }

    #[async_trait]
    impl UserRepository for PgUserRepository {
        async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<User>> {
            let row = sqlx::query(
                "SELECT id, created, updated, version, email, first_name, last_name, password_hash \
                 FROM users WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(User::from))
        }

        async fn find_by_email(&self, email: &str) -> PersistenceResult<Option<User>> {
            let row = sqlx::query(
                "SELECT id, created, updated, version, email, first_name, last_name, password_hash \
                 FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(User::from))
        }

        async fn find_all(&self) -> PersistenceResult<Vec<User>> {
            let mut rows = sqlx::query(
                "SELECT id, created, updated, version, email, first_name, last_name, password_hash \
                 FROM users ORDER BY id",
            )
            .fetch(&self.pool);

            let mut users = Vec::new();
            while let Some(row) = rows.try_next().await? {
                users.push(User::from(&row));
            }

            Ok(users)
        }

        async fn insert(&self, state: UserState) -> PersistenceResult<User> {
            let row = sqlx::query(
                "INSERT INTO users (created, version, email, first_name, last_name, password_hash) \
                 VALUES (now(), 1, $1, $2, $3, $4) \
                 RETURNING id, created, updated, version, email, first_name, last_name, password_hash",
            )
            .bind(&state.email)
            .bind(&state.first_name)
            .bind(&state.last_name)
            .bind(state.password_hash.as_str())
            .fetch_one(&self.pool)
            .await?;

            Ok(User::from(&row))
        }

        async fn update(&self, user: &User) -> PersistenceResult<User> {
            let row = sqlx::query(
                "UPDATE users SET updated = now(), version = version + 1, \
                 email = $2, first_name = $3, last_name = $4, password_hash = $5 \
                 WHERE id = $1 \
                 RETURNING id, created, updated, version, email, first_name, last_name, password_hash",
            )
            .bind(user.ident())
            .bind(user.email())
            .bind(user.first_name())
            .bind(user.last_name())
            .bind(user.password_hash().as_str())
            .fetch_one(&self.pool)
            .await?;

            Ok(User::from(&row))
        }

        async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool> {
            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        }
    }

    pub struct PgTaskStatusRepository {
        pool: PgPool,
    }

    #[async_trait]
    impl TaskStatusRepository for PgTaskStatusRepository {
        async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<TaskStatus>> {
            let row = sqlx::query(
                "SELECT id, created, updated, version, name, slug FROM task_statuses WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(TaskStatus::from))
        }

        async fn find_by_slug(&self, slug: &str) -> PersistenceResult<Option<TaskStatus>> {
            let row = sqlx::query(
                "SELECT id, created, updated, version, name, slug FROM task_statuses WHERE slug = $1",
            )
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(TaskStatus::from))
        }

        async fn find_all(&self) -> PersistenceResult<Vec<TaskStatus>> {
            let rows = sqlx::query(
                "SELECT id, created, updated, version, name, slug FROM task_statuses ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.iter().map(TaskStatus::from).collect())
        }

        async fn insert(&self, state: TaskStatusState) -> PersistenceResult<TaskStatus> {
            let row = sqlx::query(
                "INSERT INTO task_statuses (created, version, name, slug) \
                 VALUES (now(), 1, $1, $2) \
                 RETURNING id, created, updated, version, name, slug",
            )
            .bind(&state.name)
            .bind(&state.slug)
            .fetch_one(&self.pool)
            .await?;

            Ok(TaskStatus::from(&row))
        }

        async fn update(&self, status: &TaskStatus) -> PersistenceResult<TaskStatus> {
            let row = sqlx::query(
                "UPDATE task_statuses SET updated = now(), version = version + 1, \
                 name = $2, slug = $3 WHERE id = $1 \
                 RETURNING id, created, updated, version, name, slug",
            )
            .bind(status.ident())
            .bind(status.name())
            .bind(status.slug())
            .fetch_one(&self.pool)
            .await?;

            Ok(TaskStatus::from(&row))
        }

        async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool> {
            let result = sqlx::query("DELETE FROM task_statuses WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        }
    }

    pub struct PgLabelRepository {
        pool: PgPool,
    }

    #[async_trait]
    impl LabelRepository for PgLabelRepository {
        async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Label>> {
            let row = sqlx::query(
                "SELECT id, created, updated, version, name FROM labels WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(Label::from))
        }

        async fn find_by_name(&self, name: &str) -> PersistenceResult<Option<Label>> {
            let row = sqlx::query(
                "SELECT id, created, updated, version, name FROM labels WHERE name = $1",
            )
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(Label::from))
        }

        async fn find_by_ids(&self, ids: &[i64]) -> PersistenceResult<Vec<Label>> {
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let mut qb = QueryBuilder::new(
                "SELECT id, created, updated, version, name FROM labels WHERE id IN ",
            );
            sql::push_list(&mut qb, ids.iter().copied());
            qb.push(" ORDER BY id");

            let rows = qb.build().fetch_all(&self.pool).await?;

            Ok(rows.iter().map(Label::from).collect())
        }

        async fn find_all(&self) -> PersistenceResult<Vec<Label>> {
            let rows = sqlx::query(
                "SELECT id, created, updated, version, name FROM labels ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.iter().map(Label::from).collect())
        }

        async fn insert(&self, state: LabelState) -> PersistenceResult<Label> {
            let row = sqlx::query(
                "INSERT INTO labels (created, version, name) VALUES (now(), 1, $1) \
                 RETURNING id, created, updated, version, name",
            )
            .bind(&state.name)
            .fetch_one(&self.pool)
            .await?;

            Ok(Label::from(&row))
        }

        async fn update(&self, label: &Label) -> PersistenceResult<Label> {
            let row = sqlx::query(
                "UPDATE labels SET updated = now(), version = version + 1, name = $2 \
                 WHERE id = $1 RETURNING id, created, updated, version, name",
            )
            .bind(label.ident())
            .bind(label.name())
            .fetch_one(&self.pool)
            .await?;

            Ok(Label::from(&row))
        }

        async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool> {
            let result = sqlx::query("DELETE FROM labels WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        }
    }

    pub struct PgTaskRepository {
        pool: PgPool,
    }

    const TASK_SELECT: &str =
        "SELECT t.id, t.created, t.updated, t.version, t.index, t.assignee_id, t.name, t.description, \
         s.id AS status_id, s.created AS status_created, s.updated AS status_updated, \
         s.version AS status_version, s.name AS status_name, s.slug AS status_slug \
         FROM tasks t JOIN task_statuses s ON s.id = t.task_status_id";

    fn task_from_row(row: &PgRow, labels: Vec<Label>) -> Task {
        let status = TaskStatus::restore(
            EntityData {
                id: row.get("status_id"),
                created: row.get("status_created"),
                updated: row.get("status_updated"),
                version: row.get::<i64, _>("status_version") as u32,
            },
            TaskStatusState::new(row.get("status_name"), row.get("status_slug")),
        );

        Task::restore(
            EntityData {
                id: row.get("id"),
                created: row.get("created"),
                updated: row.get("updated"),
                version: row.get::<i64, _>("version") as u32,
            },
            TaskState::new(
                row.get("index"),
                row.get("assignee_id"),
                row.get("name"),
                row.get("description"),
                status,
                labels,
            ),
        )
    }

    impl PgTaskRepository {
        async fn labels_of(&self, task_id: i64) -> PersistenceResult<Vec<Label>> {
            let rows = sqlx::query(
                "SELECT l.id, l.created, l.updated, l.version, l.name FROM labels l \
                 JOIN task_labels tl ON tl.label_id = l.id WHERE tl.task_id = $1 ORDER BY l.id",
            )
            .bind(task_id)
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.iter().map(Label::from).collect())
        }

        async fn attach_labels(&self, task_id: i64, labels: &[Label]) -> PersistenceResult<()> {
            if labels.is_empty() {
                return Ok(());
            }

            let mut qb = QueryBuilder::new("INSERT INTO task_labels (task_id, label_id) ");
            qb.push_values(labels.iter(), |mut qb, label| {
                qb.push_bind(task_id);
                qb.push_bind(label.ident());
            });
            qb.build().execute(&self.pool).await?;

            Ok(())
        }
    }

    #[async_trait]
    impl TaskRepository for PgTaskRepository {
        async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Task>> {
            let query = format!("{TASK_SELECT} WHERE t.id = $1");
            let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

            match row {
                Some(row) => {
                    let labels = self.labels_of(id).await?;
                    Ok(Some(task_from_row(&row, labels)))
                }
                None => Ok(None),
            }
        }

        async fn find_all(&self) -> PersistenceResult<Vec<Task>> {
            let query = format!("{TASK_SELECT} ORDER BY t.id");
            let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

            let mut tasks = Vec::with_capacity(rows.len());
            for row in &rows {
                let labels = self.labels_of(row.get("id")).await?;
                tasks.push(task_from_row(row, labels));
            }

            Ok(tasks)
        }

        async fn insert(&self, state: TaskState) -> PersistenceResult<Task> {
            let row = sqlx::query(
                "INSERT INTO tasks (created, version, index, assignee_id, name, description, task_status_id) \
                 VALUES (now(), 1, $1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(state.index)
            .bind(state.assignee_id)
            .bind(&state.name)
            .bind(&state.description)
            .bind(state.status.ident())
            .fetch_one(&self.pool)
            .await?;

            let id: i64 = row.get("id");
            self.attach_labels(id, &state.labels).await?;

            self.find_by_id(id).await?.ok_or(PersistenceError::NotFound)
        }

        async fn update(&self, task: &Task) -> PersistenceResult<Task> {
            sqlx::query(
                "UPDATE tasks SET updated = now(), version = version + 1, \
                 index = $2, assignee_id = $3, name = $4, description = $5, task_status_id = $6 \
                 WHERE id = $1",
            )
            .bind(task.ident())
            .bind(task.index())
            .bind(task.assignee_id())
            .bind(task.name())
            .bind(task.description())
            .bind(task.status().ident())
            .execute(&self.pool)
            .await?;

            sqlx::query("DELETE FROM task_labels WHERE task_id = $1")
                .bind(task.ident())
                .execute(&self.pool)
                .await?;
            self.attach_labels(task.ident(), task.labels()).await?;

            self.find_by_id(task.ident())
                .await?
                .ok_or(PersistenceError::NotFound)
        }

        async fn delete_by_id(&self, id: i64) -> PersistenceResult<bool> {
            let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        }

        async fn exists_with_assignee(&self, user_id: i64) -> PersistenceResult<bool> {
            let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM tasks WHERE assignee_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

            Ok(row.get::<bool, _>(0))
        }
    }
}
