//! Special offer model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::StoredImage;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOffer {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub product_id: Option<Uuid>,
    pub original_price: Decimal,
    pub offer_price: Decimal,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub max_redemptions: Option<i32>,
    pub redemption_count: i32,
    #[sqlx(try_from = "Option<String>")]
    pub image: StoredImage,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpecialOffer {
    /// Redemptions left before the cap, `None` when uncapped
    pub fn remaining_redemptions(&self) -> Option<i32> {
        self.max_redemptions
            .map(|max| (max - self.redemption_count).max(0))
    }

    /// Active, inside its validity window and under its redemption cap
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.valid_from <= now
            && now <= self.valid_until
            && self.remaining_redemptions().is_none_or(|left| left > 0)
    }

    /// Discount relative to the original price, in percent rounded to 0.1
    pub fn discount_percent(&self) -> Decimal {
        if self.original_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        ((self.original_price - self.offer_price) / self.original_price * Decimal::ONE_HUNDRED)
            .round_dp(1)
            .max(Decimal::ZERO)
    }
}

/// Offer as returned by the API, with derived fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    #[serde(flatten)]
    pub offer: SpecialOffer,
    pub discount_percent: Decimal,
    pub remaining_redemptions: Option<i32>,
    pub is_redeemable: bool,
}

impl OfferView {
    pub fn at(offer: SpecialOffer, now: DateTime<Utc>) -> Self {
        Self {
            discount_percent: offer.discount_percent(),
            remaining_redemptions: offer.remaining_redemptions(),
            is_redeemable: offer.is_redeemable_at(now),
            offer,
        }
    }
}

/// Full set of writable offer columns
#[derive(Debug, Clone)]
pub struct OfferInput {
    pub title: String,
    pub description: String,
    pub product_id: Option<Uuid>,
    pub original_price: Decimal,
    pub offer_price: Decimal,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub max_redemptions: Option<i32>,
    pub image: StoredImage,
    pub is_active: bool,
}

impl From<&SpecialOffer> for OfferInput {
    fn from(offer: &SpecialOffer) -> Self {
        Self {
            title: offer.title.clone(),
            description: offer.description.clone(),
            product_id: offer.product_id,
            original_price: offer.original_price,
            offer_price: offer.offer_price,
            valid_from: offer.valid_from,
            valid_until: offer.valid_until,
            max_redemptions: offer.max_redemptions,
            image: offer.image.clone(),
            is_active: offer.is_active,
        }
    }
}
