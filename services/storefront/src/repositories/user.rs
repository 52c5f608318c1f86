//! User repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Page, Pagination, Role, User};

const USER_COLUMNS: &str = "id, email, name, password_hash, role, is_active, created_by, \
     last_login_at, created_at, updated_at";

/// Default page size of the user listing
pub const DEFAULT_USER_PAGE_SIZE: u32 = 20;

/// Writable user columns, with the password already hashed
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(
        &self,
        record: &UserRecord,
        created_by: Option<Uuid>,
    ) -> DatabaseResult<User> {
        info!("Creating new {} user", record.role.as_str());

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, name, password_hash, role, is_active, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&record.email)
        .bind(&record.name)
        .bind(&record.password_hash)
        .bind(record.role)
        .bind(record.is_active)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email, case-insensitively
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        debug!("Finding user by email");

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List users, newest first
    pub async fn list(&self, pagination: &Pagination) -> DatabaseResult<Page<User>> {
        let limit = pagination.limit(DEFAULT_USER_PAGE_SIZE);

        let items = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit as i64)
        .bind(pagination.offset(DEFAULT_USER_PAGE_SIZE))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page {
            items,
            page: pagination.page(),
            limit,
            total,
        })
    }

    /// Replace every writable column of a user
    pub async fn update(&self, id: Uuid, record: &UserRecord) -> DatabaseResult<Option<User>> {
        info!("Updating user {}", id);

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET email = $2, name = $3, password_hash = $4, role = $5, is_active = $6,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&record.email)
        .bind(&record.name)
        .bind(&record.password_hash)
        .bind(record.role)
        .bind(record.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting user {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login
    pub async fn touch_last_login(&self, id: Uuid) -> DatabaseResult<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Number of users holding a role
    pub async fn count_by_role(&self, role: Role) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
