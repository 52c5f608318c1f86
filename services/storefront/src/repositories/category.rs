//! Category repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::Category;

const CATEGORY_COLUMNS: &str =
    "id, name, slug, description, image, sort_order, is_active, created_at, updated_at";

/// Writable category columns after slug resolution
#[derive(Debug, Clone)]
pub struct CategoryRecord {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Category repository
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List categories by display order
    pub async fn list(&self, active_only: bool) -> DatabaseResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE is_active OR NOT $1 ORDER BY sort_order, name",
            CATEGORY_COLUMNS
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Find a category by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Create a new category
    pub async fn create(&self, record: &CategoryRecord) -> DatabaseResult<Category> {
        info!("Creating category: {}", record.slug);

        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (id, name, slug, description, image, sort_order, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.description)
        .bind(&record.image)
        .bind(record.sort_order)
        .bind(record.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Update a category
    pub async fn update(
        &self,
        id: Uuid,
        record: &CategoryRecord,
    ) -> DatabaseResult<Option<Category>> {
        info!("Updating category {}", id);

        let category = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories
             SET name = $2, slug = $3, description = $4, image = $5, sort_order = $6,
                 is_active = $7, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.description)
        .bind(&record.image)
        .bind(record.sort_order)
        .bind(record.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Delete a category. Its products keep existing without a category.
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting category {}", id);

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
