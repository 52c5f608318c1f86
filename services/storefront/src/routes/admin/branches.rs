//! Admin branch management

use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use super::{Deleted, commit_with_images, discard_images, replace_image};
use crate::{
    error::{ApiError, ApiResult},
    models::{Branch, BranchInput, StoredImage},
    response::ApiResponse,
    state::AppState,
    upload::MultipartForm,
    validation::{validate_coordinates, validate_email, validate_name},
};

const IMAGE_FOLDER: &str = "branches";

/// Every branch, active or not
pub async fn list_branches(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Branch>>> {
    let branches = state.branch_repository.list(false).await?;
    Ok(ApiResponse::ok(branches))
}

pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Branch>> {
    let branch = state
        .branch_repository
        .find_by_id(id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Branch"))?;

    Ok(ApiResponse::ok(branch))
}

pub async fn create_branch(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<Branch>> {
    let mut input = branch_from_form(&form, None)?;

    let image = replace_image(
        &state.image_pipeline,
        &mut form,
        IMAGE_FOLDER,
        &StoredImage::default(),
    )
    .await?;
    input.image = image.current.clone();

    let branch = commit_with_images(
        &state.image_pipeline,
        image.fresh(),
        state.branch_repository.create(&input),
    )
    .await?;

    info!("Created branch {} ({})", branch.id, branch.name);
    Ok(ApiResponse::created(branch).with_message("Branch created"))
}

pub async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<Branch>> {
    let existing = state
        .branch_repository
        .find_by_id(id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Branch"))?;

    let mut input = branch_from_form(&form, Some(&existing))?;

    let image =
        replace_image(&state.image_pipeline, &mut form, IMAGE_FOLDER, &existing.image).await?;
    input.image = image.current.clone();

    let branch = commit_with_images(
        &state.image_pipeline,
        image.fresh(),
        state.branch_repository.update(id, &input),
    )
    .await?;

    let Some(branch) = branch else {
        discard_images(&state.image_pipeline, image.fresh()).await;
        return Err(ApiError::not_found("Branch"));
    };

    discard_images(&state.image_pipeline, image.replaced()).await;

    info!("Updated branch {}", branch.id);
    Ok(ApiResponse::ok(branch).with_message("Branch updated"))
}

pub async fn delete_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Deleted>> {
    let branch = state
        .branch_repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Branch"))?;

    if let Some(set) = &branch.image.0 {
        state.image_pipeline.remove(set).await;
    }

    info!("Deleted branch {}", branch.id);
    Ok(ApiResponse::ok(Deleted { id }).with_message("Branch deleted"))
}

fn branch_from_form(form: &MultipartForm, base: Option<&Branch>) -> ApiResult<BranchInput> {
    let text = |name: &str, label: &str, current: Option<&String>| -> ApiResult<String> {
        match (form.text(name), current) {
            (Some(value), _) => Ok(value),
            (None, Some(current)) if !form.has(name) => Ok(current.clone()),
            _ => Err(ApiError::Validation(format!("{} is required", label))),
        }
    };

    let name = text("name", "Name", base.map(|b| &b.name))?;
    validate_name("Name", &name).map_err(ApiError::Validation)?;
    let address = text("address", "Address", base.map(|b| &b.address))?;
    let city = text("city", "City", base.map(|b| &b.city))?;

    let email = if form.has("email") {
        form.text("email")
    } else {
        base.and_then(|b| b.email.clone())
    };
    if let Some(email) = &email {
        validate_email(email).map_err(ApiError::Validation)?;
    }

    let latitude = match (form.parse::<f64>("latitude", "Latitude")?, base) {
        (Some(latitude), _) => latitude,
        (None, Some(branch)) => branch.latitude,
        (None, None) => return Err(ApiError::validation("Latitude is required")),
    };
    let longitude = match (form.parse::<f64>("longitude", "Longitude")?, base) {
        (Some(longitude), _) => longitude,
        (None, Some(branch)) => branch.longitude,
        (None, None) => return Err(ApiError::validation("Longitude is required")),
    };
    validate_coordinates(latitude, longitude).map_err(ApiError::Validation)?;

    Ok(BranchInput {
        name,
        address,
        city,
        phone: if form.has("phone") {
            form.text("phone").unwrap_or_default()
        } else {
            base.map(|b| b.phone.clone()).unwrap_or_default()
        },
        email,
        latitude,
        longitude,
        opening_hours: if form.has("opening_hours") {
            form.text("opening_hours").unwrap_or_default()
        } else {
            base.map(|b| b.opening_hours.clone()).unwrap_or_default()
        },
        image: base.map(|b| b.image.clone()).unwrap_or_default(),
        is_active: form
            .bool("is_active")?
            .or(base.map(|b| b.is_active))
            .unwrap_or(true),
        sort_order: form
            .parse("sort_order", "Sort order")?
            .or(base.map(|b| b.sort_order))
            .unwrap_or(0),
    })
}
