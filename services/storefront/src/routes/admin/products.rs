//! Admin product management

use axum::extract::{Path, State};
use media::ImageSet;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{Deleted, commit_with_images, discard_images, store_images};
use crate::{
    error::{ApiError, ApiResult, QueryParams},
    models::{ImageList, Page, Product, ProductInput, ProductQuery},
    response::ApiResponse,
    slug::slugify,
    state::AppState,
    upload::MultipartForm,
    validation::{validate_name, validate_price, validate_slug},
};

const IMAGE_FOLDER: &str = "products";

/// Every product, active or not
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> ApiResult<ApiResponse<Page<Product>>> {
    let page = state.product_repository.list(&query, false).await?;
    Ok(ApiResponse::ok(page))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Product>> {
    let product = state
        .product_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    Ok(ApiResponse::ok(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<Product>> {
    let mut input = product_from_form(&form, None)?;

    let uploads = form.take_files("images");
    let fresh = store_images(&state.image_pipeline, uploads, IMAGE_FOLDER).await?;
    input.images = ImageList(fresh.clone());

    let product = commit_with_images(
        &state.image_pipeline,
        &fresh,
        state.product_repository.create(&input),
    )
    .await?;

    info!("Created product {} ({})", product.id, product.slug);
    Ok(ApiResponse::created(product).with_message("Product created"))
}

/// Update a product.
///
/// `keep_images`, when sent, lists the existing image sets to retain; the
/// others are deleted once the update is saved. New `images` are appended.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<Product>> {
    let existing = state
        .product_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    let mut input = product_from_form(&form, Some(&existing))?;

    let kept: Vec<ImageSet> = match form.json::<Vec<ImageSet>>("keep_images")? {
        Some(keep) => existing
            .images
            .0
            .iter()
            .filter(|set| keep.contains(set))
            .cloned()
            .collect(),
        None => existing.images.0.clone(),
    };
    let dropped: Vec<ImageSet> = existing
        .images
        .0
        .iter()
        .filter(|set| !kept.contains(set))
        .cloned()
        .collect();

    let uploads = form.take_files("images");
    let fresh = store_images(&state.image_pipeline, uploads, IMAGE_FOLDER).await?;
    input.images = ImageList(kept.into_iter().chain(fresh.iter().cloned()).collect());

    let product = commit_with_images(
        &state.image_pipeline,
        &fresh,
        state.product_repository.update(id, &input),
    )
    .await?;

    let Some(product) = product else {
        discard_images(&state.image_pipeline, &fresh).await;
        return Err(ApiError::not_found("Product"));
    };

    discard_images(&state.image_pipeline, &dropped).await;

    info!("Updated product {}", product.id);
    Ok(ApiResponse::ok(product).with_message("Product updated"))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Deleted>> {
    let product = state
        .product_repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    discard_images(&state.image_pipeline, &product.images.0).await;

    info!("Deleted product {}", product.id);
    Ok(ApiResponse::ok(Deleted { id }).with_message("Product deleted"))
}

/// Build the writable columns from the form, falling back to `base` for
/// fields that were not sent. Images are left to the caller.
fn product_from_form(form: &MultipartForm, base: Option<&Product>) -> ApiResult<ProductInput> {
    let name = match (form.text("name"), base) {
        (Some(name), _) => name,
        (None, Some(product)) if !form.has("name") => product.name.clone(),
        _ => return Err(ApiError::validation("Name is required")),
    };
    validate_name("Name", &name).map_err(ApiError::Validation)?;

    let slug = match (form.text("slug"), base) {
        (Some(slug), _) => slugify(&slug),
        (None, Some(product)) if !form.has("slug") => product.slug.clone(),
        _ => slugify(&name),
    };
    if slug.is_empty() {
        return Err(ApiError::validation("Slug could not be derived from the name"));
    }
    validate_slug(&slug).map_err(ApiError::Validation)?;

    let price: Decimal = match (form.parse("price", "Price")?, base) {
        (Some(price), _) => price,
        (None, Some(product)) => product.price,
        (None, None) => return Err(ApiError::validation("Price is required")),
    };
    validate_price("Price", price).map_err(ApiError::Validation)?;

    let compare_at_price: Option<Decimal> = if form.has("compare_at_price") {
        form.parse("compare_at_price", "Compare-at price")?
    } else {
        base.and_then(|p| p.compare_at_price)
    };
    if let Some(compare_at_price) = compare_at_price {
        validate_price("Compare-at price", compare_at_price).map_err(ApiError::Validation)?;
    }

    let stock: i32 = form
        .parse("stock", "Stock")?
        .or(base.map(|p| p.stock))
        .unwrap_or(0);
    if stock < 0 {
        return Err(ApiError::validation("Stock must not be negative"));
    }

    let category_id: Option<Uuid> = if form.has("category_id") {
        form.parse("category_id", "Category")?
    } else {
        base.and_then(|p| p.category_id)
    };

    Ok(ProductInput {
        name,
        slug,
        description: if form.has("description") {
            form.text("description").unwrap_or_default()
        } else {
            base.map(|p| p.description.clone()).unwrap_or_default()
        },
        price,
        compare_at_price,
        unit: form
            .text("unit")
            .or_else(|| base.map(|p| p.unit.clone()))
            .unwrap_or_else(|| "kg".to_string()),
        stock,
        category_id,
        images: base.map(|p| p.images.clone()).unwrap_or_default(),
        is_active: form
            .bool("is_active")?
            .or(base.map(|p| p.is_active))
            .unwrap_or(true),
        is_featured: form
            .bool("is_featured")?
            .or(base.map(|p| p.is_featured))
            .unwrap_or(false),
    })
}
