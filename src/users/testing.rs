//! In-process repositories used by the router tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::users::repo::{RepoError, RepoResult, UserRepository};
use crate::users::repo_types::{NewUser, User, UserChanges};

#[derive(Default)]
pub struct MemoryUserRepository {
    rows: Mutex<Vec<(User, String)>>,
}

impl MemoryUserRepository {
    /// Stored password hash for `id`.
    pub async fn password_of(&self, id: i64) -> Option<String> {
        let rows = self.rows.lock().await;
        rows.iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, hash)| hash.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<i64> {
        let mut rows = self.rows.lock().await;
        let id = rows.last().map(|(u, _)| u.id + 1).unwrap_or(1);
        rows.push((
            User {
                id,
                username: user.username,
                email: user.email,
                created_at: user.created_at,
                updated_at: user.updated_at,
                deleted_at: None,
            },
            user.password_hash,
        ));
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<User> {
        let rows = self.rows.lock().await;
        rows.iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone())
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<()> {
        let mut rows = self.rows.lock().await;
        let (user, hash) = rows
            .iter_mut()
            .find(|(u, _)| u.id == id)
            .ok_or(RepoError::NotFound)?;
        user.username = changes.username;
        user.email = changes.email;
        user.updated_at = changes.updated_at;
        *hash = changes.password_hash;
        Ok(())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let mut rows = self.rows.lock().await;
        let (user, _) = rows
            .iter_mut()
            .find(|(u, _)| u.id == id)
            .ok_or(RepoError::NotFound)?;
        user.deleted_at = Some(OffsetDateTime::now_utc());
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(u, _)| u.clone())
            .collect())
    }
}

/// Every call fails the way a dropped connection would.
pub struct BrokenUserRepository;

#[async_trait]
impl UserRepository for BrokenUserRepository {
    async fn create(&self, _user: NewUser) -> RepoResult<i64> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
    async fn get_by_id(&self, _id: i64) -> RepoResult<User> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
    async fn update(&self, _id: i64, _changes: UserChanges) -> RepoResult<()> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
    async fn delete(&self, _id: i64) -> RepoResult<()> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
    async fn list(&self, _limit: i64, _offset: i64) -> RepoResult<Vec<User>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}
