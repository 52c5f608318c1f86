//! Standalone image upload

use axum::extract::State;
use media::ImageSet;
use serde::Deserialize;
use tracing::info;

use super::store_images;
use crate::{
    error::{ApiError, ApiResult, QueryParams},
    response::ApiResponse,
    state::AppState,
    upload::MultipartForm,
};

const DEFAULT_FOLDER: &str = "general";

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub folder: Option<String>,
}

/// Derive the `file` upload into `folder` and return its image set
pub async fn upload_image(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UploadQuery>,
    mut form: MultipartForm,
) -> ApiResult<ApiResponse<ImageSet>> {
    let folder = query
        .folder
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FOLDER)
        .to_string();

    let upload = form
        .take_file("file")
        .ok_or_else(|| ApiError::validation("No file uploaded"))?;

    let set = store_images(&state.image_pipeline, vec![upload], &folder)
        .await?
        .into_iter()
        .next()
        .ok_or(ApiError::InternalServerError)?;

    info!("Stored upload in {}: {}", folder, set.medium);
    Ok(ApiResponse::created(set).with_message("Image uploaded"))
}
