//! Admin special offer management

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{Deleted, commit_with_images, discard_images, replace_image};
use crate::{
    error::{ApiError, ApiResult},
    models::{OfferInput, OfferView, SpecialOffer, StoredImage},
    response::ApiResponse,
    state::AppState,
    upload::MultipartForm,
    validation::{validate_name, validate_price, validate_window},
};

const IMAGE_FOLDER: &str = "offers";

/// Every offer, including expired and exhausted ones
pub async fn list_offers(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<OfferView>>> {
    let now = Utc::now();
    let offers = state.offer_repository.list_all().await?;

    Ok(ApiResponse::ok(
        offers.into_iter().map(|o| OfferView::at(o, now)).collect(),
    ))
}

pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<OfferView>> {
    let offer = state
        .offer_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Offer"))?;

    Ok(ApiResponse::ok(OfferView::at(offer, Utc::now())))
}

pub async fn create_offer(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<OfferView>> {
    let mut input = offer_from_form(&form, None)?;

    let image = replace_image(
        &state.image_pipeline,
        &mut form,
        IMAGE_FOLDER,
        &StoredImage::default(),
    )
    .await?;
    input.image = image.current.clone();

    let offer = commit_with_images(
        &state.image_pipeline,
        image.fresh(),
        state.offer_repository.create(&input),
    )
    .await?;

    info!("Created offer {} ({})", offer.id, offer.title);
    Ok(ApiResponse::created(OfferView::at(offer, Utc::now())).with_message("Offer created"))
}

pub async fn update_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<OfferView>> {
    let existing = state
        .offer_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Offer"))?;

    let mut input = offer_from_form(&form, Some(&existing))?;

    let image =
        replace_image(&state.image_pipeline, &mut form, IMAGE_FOLDER, &existing.image).await?;
    input.image = image.current.clone();

    let offer = commit_with_images(
        &state.image_pipeline,
        image.fresh(),
        state.offer_repository.update(id, &input),
    )
    .await?;

    let Some(offer) = offer else {
        discard_images(&state.image_pipeline, image.fresh()).await;
        return Err(ApiError::not_found("Offer"));
    };

    discard_images(&state.image_pipeline, image.replaced()).await;

    info!("Updated offer {}", offer.id);
    Ok(ApiResponse::ok(OfferView::at(offer, Utc::now())).with_message("Offer updated"))
}

pub async fn delete_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Deleted>> {
    let offer = state
        .offer_repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Offer"))?;

    if let Some(set) = &offer.image.0 {
        state.image_pipeline.remove(set).await;
    }

    info!("Deleted offer {}", offer.id);
    Ok(ApiResponse::ok(Deleted { id }).with_message("Offer deleted"))
}

fn offer_from_form(form: &MultipartForm, base: Option<&SpecialOffer>) -> ApiResult<OfferInput> {
    let title = match (form.text("title"), base) {
        (Some(title), _) => title,
        (None, Some(offer)) if !form.has("title") => offer.title.clone(),
        _ => return Err(ApiError::validation("Title is required")),
    };
    validate_name("Title", &title).map_err(ApiError::Validation)?;

    let original_price: Decimal = required_or(
        form.parse("original_price", "Original price")?,
        base.map(|o| o.original_price),
        "Original price",
    )?;
    let offer_price: Decimal = required_or(
        form.parse("offer_price", "Offer price")?,
        base.map(|o| o.offer_price),
        "Offer price",
    )?;
    validate_price("Original price", original_price).map_err(ApiError::Validation)?;
    validate_price("Offer price", offer_price).map_err(ApiError::Validation)?;
    if offer_price > original_price {
        return Err(ApiError::validation(
            "Offer price must not exceed the original price",
        ));
    }

    let valid_from: DateTime<Utc> = required_or(
        form.parse("valid_from", "Start date")?,
        base.map(|o| o.valid_from),
        "Start date",
    )?;
    let valid_until: DateTime<Utc> = required_or(
        form.parse("valid_until", "End date")?,
        base.map(|o| o.valid_until),
        "End date",
    )?;
    validate_window(valid_from, valid_until).map_err(ApiError::Validation)?;

    let max_redemptions: Option<i32> = if form.has("max_redemptions") {
        form.parse("max_redemptions", "Maximum redemptions")?
    } else {
        base.and_then(|o| o.max_redemptions)
    };
    if max_redemptions.is_some_and(|max| max <= 0) {
        return Err(ApiError::validation(
            "Maximum redemptions must be positive",
        ));
    }

    let product_id: Option<Uuid> = if form.has("product_id") {
        form.parse("product_id", "Product")?
    } else {
        base.and_then(|o| o.product_id)
    };

    Ok(OfferInput {
        title,
        description: if form.has("description") {
            form.text("description").unwrap_or_default()
        } else {
            base.map(|o| o.description.clone()).unwrap_or_default()
        },
        product_id,
        original_price,
        offer_price,
        valid_from,
        valid_until,
        max_redemptions,
        image: base.map(|o| o.image.clone()).unwrap_or_default(),
        is_active: form
            .bool("is_active")?
            .or(base.map(|o| o.is_active))
            .unwrap_or(true),
    })
}

fn required_or<T>(sent: Option<T>, current: Option<T>, label: &str) -> ApiResult<T> {
    sent.or(current)
        .ok_or_else(|| ApiError::Validation(format!("{} is required", label)))
}
