//! Product repository for database operations

use common::error::DatabaseResult;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::like_pattern;
use crate::models::product::DEFAULT_PAGE_SIZE;
use crate::models::{Page, Product, ProductInput, ProductQuery};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.slug, p.description, p.price, p.compare_at_price, \
     p.unit, p.stock, p.category_id, c.slug AS category_slug, p.images, p.is_active, \
     p.is_featured, p.created_at, p.updated_at";

const PRODUCT_JOIN: &str = "LEFT JOIN categories c ON c.id = p.category_id";

/// Product repository for database operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get products with pagination, sorting, and filtering
    pub async fn list(
        &self,
        query: &ProductQuery,
        active_only: bool,
    ) -> DatabaseResult<Page<Product>> {
        let pagination = query.pagination();
        let limit = pagination.limit(DEFAULT_PAGE_SIZE);

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM products p {}",
            PRODUCT_COLUMNS, PRODUCT_JOIN
        ));
        push_filters(&mut select, query, active_only);
        select.push(" ORDER BY ").push(query.sort.order_by());
        select
            .push(" LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(pagination.offset(DEFAULT_PAGE_SIZE));

        let items = select
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) FROM products p {}",
            PRODUCT_JOIN
        ));
        push_filters(&mut count, query, active_only);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(Page {
            items,
            page: pagination.page(),
            limit,
            total,
        })
    }

    /// Get active featured products, most recently updated first
    pub async fn featured(&self, limit: u32) -> DatabaseResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products p {} \
             WHERE p.is_featured AND p.is_active \
             ORDER BY p.updated_at DESC, p.id \
             LIMIT $1",
            PRODUCT_COLUMNS, PRODUCT_JOIN
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Find a product by slug
    pub async fn find_by_slug(
        &self,
        slug: &str,
        active_only: bool,
    ) -> DatabaseResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products p {} WHERE p.slug = $1 AND (p.is_active OR NOT $2)",
            PRODUCT_COLUMNS, PRODUCT_JOIN
        ))
        .bind(slug)
        .bind(active_only)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products p {} WHERE p.id = $1",
            PRODUCT_COLUMNS, PRODUCT_JOIN
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, input: &ProductInput) -> DatabaseResult<Product> {
        let sql = format!(
            "WITH p AS (
                INSERT INTO products (id, name, slug, description, price, compare_at_price, unit,
                                      stock, category_id, images, is_active, is_featured)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING *
            )
            SELECT {} FROM p {}",
            PRODUCT_COLUMNS, PRODUCT_JOIN
        );

        let product = bind_input(sqlx::query_as::<_, Product>(&sql).bind(Uuid::new_v4()), input)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    /// Replace every writable column of a product
    pub async fn update(&self, id: Uuid, input: &ProductInput) -> DatabaseResult<Option<Product>> {
        let sql = format!(
            "WITH p AS (
                UPDATE products
                SET name = $2, slug = $3, description = $4, price = $5, compare_at_price = $6,
                    unit = $7, stock = $8, category_id = $9, images = $10, is_active = $11,
                    is_featured = $12, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {} FROM p {}",
            PRODUCT_COLUMNS, PRODUCT_JOIN
        );

        let product = bind_input(sqlx::query_as::<_, Product>(&sql).bind(id), input)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Delete a product, returning the deleted row
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<Option<Product>> {
        let sql = format!(
            "WITH p AS (DELETE FROM products WHERE id = $1 RETURNING *) SELECT {} FROM p {}",
            PRODUCT_COLUMNS, PRODUCT_JOIN
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery, active_only: bool) {
    builder.push(" WHERE TRUE");

    if active_only {
        builder.push(" AND p.is_active");
    }

    if let Some(category) = &query.category {
        builder.push(" AND c.slug = ").push_bind(category.clone());
    }

    if query.featured == Some(true) {
        builder.push(" AND p.is_featured");
    }

    if let Some(term) = query.search_term() {
        let pattern = like_pattern(term);
        builder
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Bind $2..$12 in column order
fn bind_input<'q>(
    query: QueryAs<'q, Postgres, Product, PgArguments>,
    input: &ProductInput,
) -> QueryAs<'q, Postgres, Product, PgArguments> {
    query
        .bind(input.name.clone())
        .bind(input.slug.clone())
        .bind(input.description.clone())
        .bind(input.price)
        .bind(input.compare_at_price)
        .bind(input.unit.clone())
        .bind(input.stock)
        .bind(input.category_id)
        .bind(input.images.encode())
        .bind(input.is_active)
        .bind(input.is_featured)
}
