//! Public product and category endpoints

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use common::{Fetched, with_fallback};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult, QueryParams},
    fallback_data,
    models::{Category, Page, Pagination, Product, ProductQuery},
    response::ApiResponse,
    state::AppState,
};

/// Default size of the featured products strip
const DEFAULT_FEATURED_LIMIT: u32 = 8;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/featured", get(featured_products))
        .route("/products/:slug", get(get_product))
        .route("/categories", get(list_categories))
        .route("/categories/:slug/products", get(category_products))
}

#[derive(Debug, Default, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<u32>,
}

async fn fetch_products(state: &AppState, query: &ProductQuery) -> Fetched<Page<Product>> {
    with_fallback(
        "products",
        state.product_repository.list(query, true),
        || query.apply(fallback_data::products()),
    )
    .await
}

/// Active products, filtered, sorted and paginated
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> ApiResponse<Page<Product>> {
    ApiResponse::from_fetched(fetch_products(&state, &query).await)
}

/// Products that are both featured and active
pub async fn featured_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FeaturedQuery>,
) -> ApiResponse<Vec<Product>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_FEATURED_LIMIT)
        .clamp(1, Pagination::MAX_LIMIT);

    let fetched = with_fallback(
        "featured products",
        state.product_repository.featured(limit),
        || {
            fallback_data::products()
                .into_iter()
                .filter(Product::is_featured_listing)
                .take(limit as usize)
                .collect()
        },
    )
    .await;

    ApiResponse::from_fetched(fetched)
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ApiResponse<Product>> {
    let fetched = with_fallback(
        "product by slug",
        state.product_repository.find_by_slug(&slug, true),
        || {
            fallback_data::products()
                .into_iter()
                .find(|p| p.slug == slug && p.is_listed())
        },
    )
    .await;

    let source = fetched.source;
    let product = fetched.data.ok_or_else(|| ApiError::not_found("Product"))?;

    Ok(ApiResponse::from_fetched(Fetched {
        data: product,
        source,
    }))
}

/// Active categories in display order
pub async fn list_categories(State(state): State<AppState>) -> ApiResponse<Vec<Category>> {
    let fetched = with_fallback(
        "categories",
        state.category_repository.list(true),
        || {
            let mut categories: Vec<Category> = fallback_data::categories()
                .into_iter()
                .filter(|c| c.is_active)
                .collect();
            categories.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
            categories
        },
    )
    .await;

    ApiResponse::from_fetched(fetched)
}

/// Active products of one category
pub async fn category_products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    QueryParams(mut query): QueryParams<ProductQuery>,
) -> ApiResponse<Page<Product>> {
    query.category = Some(slug);
    ApiResponse::from_fetched(fetch_products(&state, &query).await)
}
