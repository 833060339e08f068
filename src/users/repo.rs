use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use tracing::debug;

use crate::users::repo_types::{NewUser, User, UserChanges};

const USER_COLUMNS: &str = "id, username, email, created_at, updated_at, deleted_at";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a row and return its generated id.
    async fn create(&self, user: NewUser) -> RepoResult<i64>;
    async fn get_by_id(&self, id: i64) -> RepoResult<User>;
    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<()>;
    /// Marks the row with `deleted_at`; the row stays readable.
    async fn delete(&self, id: i64) -> RepoResult<()>;
    /// Rows in insertion order, without password.
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// Statement builders. Every value goes through `push_bind`.

fn insert_query(user: NewUser) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "INSERT INTO users (username, email, password, created_at, updated_at) VALUES (",
    );
    qb.separated(", ")
        .push_bind(user.username)
        .push_bind(user.email)
        .push_bind(user.password_hash)
        .push_bind(user.created_at)
        .push_bind(user.updated_at)
        .push_unseparated(") RETURNING id");
    qb
}

fn select_by_id_query(id: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE id = "));
    qb.push_bind(id);
    qb
}

fn update_query(id: i64, changes: UserChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE users SET ");
    {
        let mut set = qb.separated(", ");
        set.push("username = ").push_bind_unseparated(changes.username);
        set.push("email = ").push_bind_unseparated(changes.email);
        set.push("password = ").push_bind_unseparated(changes.password_hash);
        set.push("updated_at = ").push_bind_unseparated(changes.updated_at);
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}

fn delete_query(id: i64, deleted_at: OffsetDateTime) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE users SET deleted_at = ");
    qb.push_bind(deleted_at);
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}

fn list_query(limit: i64, offset: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"));
    qb.push(" LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    qb
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<i64> {
        let mut qb = insert_query(user);
        let id = qb.build_query_scalar::<i64>().fetch_one(&self.db).await?;
        debug!(user_id = id, "inserted user");
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<User> {
        select_by_id_query(id)
            .build_query_as::<User>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<()> {
        let done = update_query(id, changes).build().execute(&self.db).await?;
        if done.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let done = delete_query(id, OffsetDateTime::now_utc())
            .build()
            .execute(&self.db)
            .await?;
        if done.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let rows = list_query(limit, offset)
            .build_query_as::<User>()
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }
}
