//! Slideshow repository for database operations

use common::error::DatabaseResult;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Slide, SlideInput};

const SLIDE_COLUMNS: &str = "id, title, subtitle, button_text, button_link, image, sort_order, \
     is_active, created_at, updated_at";

/// Slideshow repository
#[derive(Clone)]
pub struct SlideRepository {
    pool: PgPool,
}

impl SlideRepository {
    /// Create a new slide repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List slides in display order
    pub async fn list(&self, active_only: bool) -> DatabaseResult<Vec<Slide>> {
        let slides = sqlx::query_as::<_, Slide>(&format!(
            "SELECT {} FROM slides WHERE is_active OR NOT $1 ORDER BY sort_order, created_at",
            SLIDE_COLUMNS
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(slides)
    }

    /// Find a slide by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Slide>> {
        let slide = sqlx::query_as::<_, Slide>(&format!(
            "SELECT {} FROM slides WHERE id = $1",
            SLIDE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slide)
    }

    /// Create a new slide
    pub async fn create(&self, input: &SlideInput) -> DatabaseResult<Slide> {
        info!("Creating slide: {}", input.title);

        let sql = format!(
            "INSERT INTO slides (id, title, subtitle, button_text, button_link, image,
                                 sort_order, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            SLIDE_COLUMNS
        );

        let slide = bind_input(sqlx::query_as::<_, Slide>(&sql).bind(Uuid::new_v4()), input)
            .fetch_one(&self.pool)
            .await?;

        Ok(slide)
    }

    /// Replace every writable column of a slide
    pub async fn update(&self, id: Uuid, input: &SlideInput) -> DatabaseResult<Option<Slide>> {
        info!("Updating slide {}", id);

        let sql = format!(
            "UPDATE slides
             SET title = $2, subtitle = $3, button_text = $4, button_link = $5, image = $6,
                 sort_order = $7, is_active = $8, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            SLIDE_COLUMNS
        );

        let slide = bind_input(sqlx::query_as::<_, Slide>(&sql).bind(id), input)
            .fetch_optional(&self.pool)
            .await?;

        Ok(slide)
    }

    /// Delete a slide, returning the deleted row
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<Option<Slide>> {
        info!("Deleting slide {}", id);

        let slide = sqlx::query_as::<_, Slide>(&format!(
            "DELETE FROM slides WHERE id = $1 RETURNING {}",
            SLIDE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slide)
    }

    /// Set `sort_order` to each slide's position in `ids`.
    ///
    /// Runs in one transaction. Returns false, changing nothing, when any id
    /// does not exist.
    pub async fn reorder(&self, ids: &[Uuid]) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await?;

        for (position, id) in ids.iter().enumerate() {
            let result = sqlx::query(
                "UPDATE slides SET sort_order = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!("Slide {} not found, reorder rolled back", id);
                tx.rollback().await?;
                return Ok(false);
            }
        }

        tx.commit().await?;
        info!("Reordered {} slides", ids.len());

        Ok(true)
    }
}

fn bind_input<'q>(
    query: QueryAs<'q, Postgres, Slide, PgArguments>,
    input: &SlideInput,
) -> QueryAs<'q, Postgres, Slide, PgArguments> {
    query
        .bind(input.title.clone())
        .bind(input.subtitle.clone())
        .bind(input.button_text.clone())
        .bind(input.button_link.clone())
        .bind(input.image.encode())
        .bind(input.sort_order)
        .bind(input.is_active)
}
