//! Admin slideshow management

use axum::extract::{Path, State};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use super::{Deleted, commit_with_images, discard_images, replace_image};
use crate::{
    error::{ApiError, ApiResult, JsonBody},
    models::{Slide, SlideInput, SlideOrder, StoredImage},
    response::ApiResponse,
    state::AppState,
    upload::MultipartForm,
    validation::validate_name,
};

const IMAGE_FOLDER: &str = "slideshow";

/// Every slide in display order, active or not
pub async fn list_slides(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Slide>>> {
    let slides = state.slide_repository.list(false).await?;
    Ok(ApiResponse::ok(slides))
}

pub async fn get_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Slide>> {
    let slide = state
        .slide_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Slide"))?;

    Ok(ApiResponse::ok(slide))
}

pub async fn create_slide(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<Slide>> {
    let mut input = slide_from_form(&form, None)?;

    let image = replace_image(
        &state.image_pipeline,
        &mut form,
        IMAGE_FOLDER,
        &StoredImage::default(),
    )
    .await?;
    if image.current.0.is_none() {
        return Err(ApiError::validation("Image is required"));
    }
    input.image = image.current.clone();

    let slide = commit_with_images(
        &state.image_pipeline,
        image.fresh(),
        state.slide_repository.create(&input),
    )
    .await?;

    info!("Created slide {} ({})", slide.id, slide.title);
    Ok(ApiResponse::created(slide).with_message("Slide created"))
}

pub async fn update_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<Slide>> {
    let existing = state
        .slide_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Slide"))?;

    let mut input = slide_from_form(&form, Some(&existing))?;

    let image =
        replace_image(&state.image_pipeline, &mut form, IMAGE_FOLDER, &existing.image).await?;
    if image.current.0.is_none() {
        return Err(ApiError::validation("A slide must keep an image"));
    }
    input.image = image.current.clone();

    let slide = commit_with_images(
        &state.image_pipeline,
        image.fresh(),
        state.slide_repository.update(id, &input),
    )
    .await?;

    let Some(slide) = slide else {
        discard_images(&state.image_pipeline, image.fresh()).await;
        return Err(ApiError::not_found("Slide"));
    };

    discard_images(&state.image_pipeline, image.replaced()).await;

    info!("Updated slide {}", slide.id);
    Ok(ApiResponse::ok(slide).with_message("Slide updated"))
}

pub async fn delete_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Deleted>> {
    let slide = state
        .slide_repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Slide"))?;

    if let Some(set) = &slide.image.0 {
        state.image_pipeline.remove(set).await;
    }

    info!("Deleted slide {}", slide.id);
    Ok(ApiResponse::ok(Deleted { id }).with_message("Slide deleted"))
}

/// Set the display order to the order of `ids`
pub async fn reorder_slides(
    State(state): State<AppState>,
    JsonBody(order): JsonBody<SlideOrder>,
) -> ApiResult<ApiResponse<Vec<Slide>>> {
    if order.ids.is_empty() {
        return Err(ApiError::validation("ids must not be empty"));
    }

    let unique: HashSet<&Uuid> = order.ids.iter().collect();
    if unique.len() != order.ids.len() {
        return Err(ApiError::validation("ids must not contain duplicates"));
    }

    if !state.slide_repository.reorder(&order.ids).await? {
        return Err(ApiError::not_found("Slide"));
    }

    let slides = state.slide_repository.list(false).await?;
    Ok(ApiResponse::ok(slides).with_message("Slideshow reordered"))
}

fn slide_from_form(form: &MultipartForm, base: Option<&Slide>) -> ApiResult<SlideInput> {
    let title = match (form.text("title"), base) {
        (Some(title), _) => title,
        (None, Some(slide)) if !form.has("title") => slide.title.clone(),
        _ => return Err(ApiError::validation("Title is required")),
    };
    validate_name("Title", &title).map_err(ApiError::Validation)?;

    let optional = |name: &str, current: Option<&Option<String>>| -> Option<String> {
        if form.has(name) {
            form.text(name)
        } else {
            current.cloned().flatten()
        }
    };

    Ok(SlideInput {
        title,
        subtitle: optional("subtitle", base.map(|s| &s.subtitle)),
        button_text: optional("button_text", base.map(|s| &s.button_text)),
        button_link: optional("button_link", base.map(|s| &s.button_link)),
        image: base.map(|s| s.image.clone()).unwrap_or_default(),
        sort_order: form
            .parse("sort_order", "Sort order")?
            .or(base.map(|s| s.sort_order))
            .unwrap_or(0),
        is_active: form
            .bool("is_active")?
            .or(base.map(|s| s.is_active))
            .unwrap_or(true),
    })
}
