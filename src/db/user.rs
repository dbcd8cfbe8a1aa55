use async_trait::async_trait;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use super::{map_unique_violation, UserStore};
use crate::{errors::BoothError, models::User, PGPool};

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    pwd_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            pwd_hash: row.pwd_hash,
        }
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PGPool,
}

impl PgUserStore {
    pub fn new(pool: PGPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: User) -> Result<(), BoothError> {
        sqlx::query("INSERT INTO users (id, username, pwd_hash) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.pwd_hash)
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique_violation(err, BoothError::DuplicateUser(user.username.clone())))?;
        Ok(())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, BoothError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, pwd_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }
}
