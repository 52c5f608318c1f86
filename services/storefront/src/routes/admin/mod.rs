//! Admin panel endpoints. Every route requires a staff token; user
//! management requires an admin token.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use media::{ImagePipeline, ImageSet, UploadedFile};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::ApiResult,
    middleware::{auth_middleware, require_admin, require_staff},
    models::StoredImage,
    state::AppState,
    upload::MultipartForm,
};

pub mod branches;
pub mod categories;
pub mod offers;
pub mod products;
pub mod slides;
pub mod uploads;
pub mod users;

pub fn router(state: AppState) -> Router<AppState> {
    let user_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/branches",
            get(branches::list_branches).post(branches::create_branch),
        )
        .route(
            "/branches/:id",
            get(branches::get_branch)
                .put(branches::update_branch)
                .delete(branches::delete_branch),
        )
        .route("/offers", get(offers::list_offers).post(offers::create_offer))
        .route(
            "/offers/:id",
            get(offers::get_offer)
                .put(offers::update_offer)
                .delete(offers::delete_offer),
        )
        .route("/slideshow", get(slides::list_slides).post(slides::create_slide))
        .route("/slideshow/order", put(slides::reorder_slides))
        .route(
            "/slideshow/:id",
            get(slides::get_slide)
                .put(slides::update_slide)
                .delete(slides::delete_slide),
        )
        .route("/uploads", post(uploads::upload_image))
        .merge(user_routes)
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Payload of delete endpoints
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}

/// Derive every upload into `folder`. If one fails, the sets already written
/// are removed before the error is returned.
pub(crate) async fn store_images(
    pipeline: &ImagePipeline,
    uploads: Vec<UploadedFile>,
    folder: &str,
) -> ApiResult<Vec<ImageSet>> {
    let mut stored = Vec::with_capacity(uploads.len());

    for upload in uploads {
        match pipeline.process(upload, folder).await {
            Ok(set) => stored.push(set),
            Err(e) => {
                discard_images(pipeline, &stored).await;
                return Err(e.into());
            }
        }
    }

    Ok(stored)
}

pub(crate) async fn discard_images(pipeline: &ImagePipeline, sets: &[ImageSet]) {
    for set in sets {
        pipeline.remove(set).await;
    }
}

/// Run a database write that references freshly stored images; when it
/// fails the images are removed again.
pub(crate) async fn commit_with_images<T, E>(
    pipeline: &ImagePipeline,
    fresh: &[ImageSet],
    write: impl std::future::Future<Output = Result<T, E>>,
) -> Result<T, E> {
    let result = write.await;

    if result.is_err() && !fresh.is_empty() {
        warn!("Write failed, removing {} new image sets", fresh.len());
        discard_images(pipeline, fresh).await;
    }

    result
}

/// Result of applying the `image` / `remove_image` form fields to a record
pub(crate) struct ImageChange {
    /// Image the record should hold after the write
    pub current: StoredImage,
    fresh: Vec<ImageSet>,
    replaced: Vec<ImageSet>,
}

impl ImageChange {
    /// Sets written for this request, to remove if the write fails
    pub fn fresh(&self) -> &[ImageSet] {
        &self.fresh
    }

    /// Sets the record no longer references, to remove after the write
    pub fn replaced(&self) -> &[ImageSet] {
        &self.replaced
    }
}

/// Store the `image` upload, if any. `remove_image=true` without an upload
/// clears the image.
pub(crate) async fn replace_image(
    pipeline: &ImagePipeline,
    form: &mut MultipartForm,
    folder: &str,
    existing: &StoredImage,
) -> ApiResult<ImageChange> {
    let remove = form.bool("remove_image")?.unwrap_or(false);

    let fresh = match form.take_file("image") {
        Some(upload) => store_images(pipeline, vec![upload], folder).await?,
        None => Vec::new(),
    };

    let current = match fresh.first() {
        Some(set) => StoredImage::from(set.clone()),
        None if remove => StoredImage::default(),
        None => existing.clone(),
    };

    let replaced = match &existing.0 {
        Some(old) if current.0.as_ref() != Some(old) => vec![old.clone()],
        _ => Vec::new(),
    };

    Ok(ImageChange {
        current,
        fresh,
        replaced,
    })
}
