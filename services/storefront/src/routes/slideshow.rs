//! Public homepage slideshow

use axum::{Router, extract::State, routing::get};
use common::with_fallback;

use crate::{fallback_data, models::Slide, response::ApiResponse, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/slideshow", get(list_slides))
}

/// Active slides in display order
pub async fn list_slides(State(state): State<AppState>) -> ApiResponse<Vec<Slide>> {
    let fetched = with_fallback("slideshow", state.slide_repository.list(true), || {
        let mut slides: Vec<Slide> = fallback_data::slides()
            .into_iter()
            .filter(|s| s.is_active)
            .collect();
        slides.sort_by_key(|s| s.sort_order);
        slides
    })
    .await;

    ApiResponse::from_fetched(fetched)
}
