use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::backend_error;
use crate::database::ports::users::UserCollection;
use crate::error::BackendResult;
use crate::user::{InsertedId, User, UserId};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: UserId(row.user_id),
            name: row.name,
        }
    }
}

/// PostgreSQL-backed implementation of the `UserCollection` port.
#[derive(Clone, Debug)]
pub struct PostgresUserCollection {
    pool: PgPool,
}

impl PostgresUserCollection {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserCollection for PostgresUserCollection {
    async fn find_latest(&self) -> BackendResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, name
            FROM users
            ORDER BY user_id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool())
        .await
        .map_err(backend_error)?;

        Ok(row.map(User::from))
    }

    async fn insert_one(&self, user: &User) -> BackendResult<InsertedId> {
        let inserted_id = InsertedId::generate();

        sqlx::query(
            r#"
            INSERT INTO users (object_id, user_id, name)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(inserted_id.0)
        .bind(user.user_id.as_i64())
        .bind(&user.name)
        .execute(self.pool())
        .await
        .map_err(backend_error)?;

        debug!(user_id = %user.user_id, %inserted_id, "Inserted user document");
        Ok(inserted_id)
    }

    async fn find_by_id(&self, user_id: UserId) -> BackendResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, name
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(self.pool())
        .await
        .map_err(backend_error)?;

        Ok(row.map(User::from))
    }

    async fn find_all(&self) -> BackendResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT user_id, name FROM users")
            .fetch_all(self.pool())
            .await
            .map_err(backend_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
