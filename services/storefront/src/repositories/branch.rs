//! Branch repository for database operations

use common::error::DatabaseResult;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::models::{Branch, BranchInput};

const BRANCH_COLUMNS: &str = "id, name, address, city, phone, email, latitude, longitude, \
     opening_hours, image, is_active, sort_order, created_at, updated_at";

/// Branch repository
#[derive(Clone)]
pub struct BranchRepository {
    pool: PgPool,
}

impl BranchRepository {
    /// Create a new branch repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List branches by display order
    pub async fn list(&self, active_only: bool) -> DatabaseResult<Vec<Branch>> {
        let branches = sqlx::query_as::<_, Branch>(&format!(
            "SELECT {} FROM branches WHERE is_active OR NOT $1 ORDER BY sort_order, name",
            BRANCH_COLUMNS
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    /// Find a branch by ID
    pub async fn find_by_id(&self, id: Uuid, active_only: bool) -> DatabaseResult<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>(&format!(
            "SELECT {} FROM branches WHERE id = $1 AND (is_active OR NOT $2)",
            BRANCH_COLUMNS
        ))
        .bind(id)
        .bind(active_only)
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch)
    }

    /// Create a new branch
    pub async fn create(&self, input: &BranchInput) -> DatabaseResult<Branch> {
        info!("Creating branch: {}", input.name);

        let sql = format!(
            "INSERT INTO branches (id, name, address, city, phone, email, latitude, longitude,
                                   opening_hours, image, is_active, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {}",
            BRANCH_COLUMNS
        );

        let branch = bind_input(sqlx::query_as::<_, Branch>(&sql).bind(Uuid::new_v4()), input)
            .fetch_one(&self.pool)
            .await?;

        Ok(branch)
    }

    /// Replace every writable column of a branch
    pub async fn update(&self, id: Uuid, input: &BranchInput) -> DatabaseResult<Option<Branch>> {
        info!("Updating branch {}", id);

        let sql = format!(
            "UPDATE branches
             SET name = $2, address = $3, city = $4, phone = $5, email = $6, latitude = $7,
                 longitude = $8, opening_hours = $9, image = $10, is_active = $11,
                 sort_order = $12, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            BRANCH_COLUMNS
        );

        let branch = bind_input(sqlx::query_as::<_, Branch>(&sql).bind(id), input)
            .fetch_optional(&self.pool)
            .await?;

        Ok(branch)
    }

    /// Delete a branch, returning the deleted row
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<Option<Branch>> {
        info!("Deleting branch {}", id);

        let branch = sqlx::query_as::<_, Branch>(&format!(
            "DELETE FROM branches WHERE id = $1 RETURNING {}",
            BRANCH_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch)
    }
}

fn bind_input<'q>(
    query: QueryAs<'q, Postgres, Branch, PgArguments>,
    input: &BranchInput,
) -> QueryAs<'q, Postgres, Branch, PgArguments> {
    query
        .bind(input.name.clone())
        .bind(input.address.clone())
        .bind(input.city.clone())
        .bind(input.phone.clone())
        .bind(input.email.clone())
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.opening_hours.clone())
        .bind(input.image.encode())
        .bind(input.is_active)
        .bind(input.sort_order)
}
