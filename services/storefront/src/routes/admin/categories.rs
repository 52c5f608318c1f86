//! Admin category management

use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use super::Deleted;
use crate::{
    error::{ApiError, ApiResult, JsonBody},
    models::{Category, CategoryInput},
    repositories::CategoryRecord,
    response::ApiResponse,
    slug::slugify,
    state::AppState,
    validation::{validate_name, validate_slug},
};

/// Every category, active or not
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<Category>>> {
    let categories = state.category_repository.list(false).await?;
    Ok(ApiResponse::ok(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Category>> {
    let category = state
        .category_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    Ok(ApiResponse::ok(category))
}

pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> ApiResult<ApiResponse<Category>> {
    let record = category_record(input)?;
    let category = state.category_repository.create(&record).await?;

    info!("Created category {} ({})", category.id, category.slug);
    Ok(ApiResponse::created(category).with_message("Category created"))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> ApiResult<ApiResponse<Category>> {
    let record = category_record(input)?;
    let category = state
        .category_repository
        .update(id, &record)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    Ok(ApiResponse::ok(category).with_message("Category updated"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Deleted>> {
    if !state.category_repository.delete(id).await? {
        return Err(ApiError::not_found("Category"));
    }

    Ok(ApiResponse::ok(Deleted { id }).with_message("Category deleted"))
}

fn category_record(input: CategoryInput) -> ApiResult<CategoryRecord> {
    let name = input.name.trim().to_string();
    validate_name("Name", &name).map_err(ApiError::Validation)?;

    let slug = match input.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slugify(slug),
        _ => slugify(&name),
    };
    if slug.is_empty() {
        return Err(ApiError::validation("Slug could not be derived from the name"));
    }
    validate_slug(&slug).map_err(ApiError::Validation)?;

    Ok(CategoryRecord {
        name,
        slug,
        description: input.description.trim().to_string(),
        image: input
            .image
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty()),
        sort_order: input.sort_order,
        is_active: input.is_active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, slug: Option<&str>) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            slug: slug.map(str::to_string),
            description: String::new(),
            image: Some("  ".to_string()),
            sort_order: 3,
            is_active: true,
        }
    }

    #[test]
    fn test_slug_derived_or_normalised() {
        assert_eq!(
            category_record(input("Smoked & Cured", None)).unwrap().slug,
            "smoked-and-cured"
        );
        assert_eq!(
            category_record(input("Shellfish", Some(" Crabs Lobsters "))).unwrap().slug,
            "crabs-lobsters"
        );
    }

    #[test]
    fn test_blank_image_is_dropped_and_name_required() {
        assert_eq!(category_record(input("Frozen", None)).unwrap().image, None);
        assert!(category_record(input("  ", None)).is_err());
        assert!(category_record(input("???", None)).is_err());
    }
}
