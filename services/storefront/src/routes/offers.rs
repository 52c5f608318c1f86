//! Public offer endpoints and redemption

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use chrono::Utc;
use common::{Fetched, with_fallback};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    fallback_data,
    models::{AuthUser, OfferView, SpecialOffer},
    repositories::Redemption,
    response::ApiResponse,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/offers", get(list_offers))
        .route("/offers/:id", get(get_offer))
}

/// Offers redeemable right now
pub async fn list_offers(State(state): State<AppState>) -> ApiResponse<Vec<OfferView>> {
    let now = Utc::now();

    let fetched = with_fallback(
        "offers",
        state.offer_repository.list_redeemable(now),
        || {
            let mut offers: Vec<SpecialOffer> = fallback_data::offers(now)
                .into_iter()
                .filter(|o| o.is_redeemable_at(now))
                .collect();
            offers.sort_by_key(|o| o.valid_until);
            offers
        },
    )
    .await;

    ApiResponse::from_fetched(
        fetched.map(|offers| offers.into_iter().map(|o| OfferView::at(o, now)).collect()),
    )
}

/// One active offer, redeemable or not
pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<OfferView>> {
    let now = Utc::now();

    let fetched = with_fallback(
        "offer by id",
        async {
            let offer = state.offer_repository.find_by_id(id).await?;
            Ok::<_, common::error::DatabaseError>(offer.filter(|o| o.is_active))
        },
        || {
            fallback_data::offers(now)
                .into_iter()
                .find(|o| o.id == id && o.is_active)
        },
    )
    .await;

    let source = fetched.source;
    let offer = fetched.data.ok_or_else(|| ApiError::not_found("Offer"))?;

    Ok(ApiResponse::from_fetched(Fetched {
        data: OfferView::at(offer, now),
        source,
    }))
}

/// Count one redemption for the caller
pub async fn redeem_offer(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<OfferView>> {
    let now = Utc::now();

    match state.offer_repository.redeem(id, now).await? {
        Redemption::Redeemed(offer) => {
            info!("User {} redeemed offer {}", caller.id, offer.id);
            Ok(ApiResponse::ok(OfferView::at(offer, now)).with_message("Offer redeemed"))
        }
        Redemption::Unavailable => Err(ApiError::validation(
            "Offer is not available for redemption",
        )),
        Redemption::NotFound => Err(ApiError::not_found("Offer")),
    }
}
