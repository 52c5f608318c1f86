//! Special offer repository for database operations

use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::models::{OfferInput, SpecialOffer};

const OFFER_COLUMNS: &str = "id, title, description, product_id, original_price, offer_price, \
     valid_from, valid_until, max_redemptions, redemption_count, image, is_active, \
     created_at, updated_at";

/// Offers that can be redeemed at `$1`
const REDEEMABLE: &str = "is_active AND valid_from <= $1 AND valid_until >= $1 \
     AND (max_redemptions IS NULL OR redemption_count < max_redemptions)";

/// Outcome of a redemption attempt
#[derive(Debug, Clone)]
pub enum Redemption {
    Redeemed(SpecialOffer),
    /// The offer exists but is inactive, outside its window, or exhausted
    Unavailable,
    NotFound,
}

/// Special offer repository
#[derive(Clone)]
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    /// Create a new offer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Offers currently redeemable, ending soonest first
    pub async fn list_redeemable(&self, now: DateTime<Utc>) -> DatabaseResult<Vec<SpecialOffer>> {
        let offers = sqlx::query_as::<_, SpecialOffer>(&format!(
            "SELECT {} FROM special_offers WHERE {} ORDER BY valid_until, id",
            OFFER_COLUMNS, REDEEMABLE
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    /// Every offer, newest first
    pub async fn list_all(&self) -> DatabaseResult<Vec<SpecialOffer>> {
        let offers = sqlx::query_as::<_, SpecialOffer>(&format!(
            "SELECT {} FROM special_offers ORDER BY created_at DESC, id",
            OFFER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    /// Find an offer by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<SpecialOffer>> {
        let offer = sqlx::query_as::<_, SpecialOffer>(&format!(
            "SELECT {} FROM special_offers WHERE id = $1",
            OFFER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offer)
    }

    /// Create a new offer
    pub async fn create(&self, input: &OfferInput) -> DatabaseResult<SpecialOffer> {
        info!("Creating offer: {}", input.title);

        let sql = format!(
            "INSERT INTO special_offers (id, title, description, product_id, original_price,
                                         offer_price, valid_from, valid_until, max_redemptions,
                                         image, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {}",
            OFFER_COLUMNS
        );

        let offer = bind_input(sqlx::query_as::<_, SpecialOffer>(&sql).bind(Uuid::new_v4()), input)
            .fetch_one(&self.pool)
            .await?;

        Ok(offer)
    }

    /// Replace every writable column of an offer. The redemption count is kept.
    pub async fn update(
        &self,
        id: Uuid,
        input: &OfferInput,
    ) -> DatabaseResult<Option<SpecialOffer>> {
        info!("Updating offer {}", id);

        let sql = format!(
            "UPDATE special_offers
             SET title = $2, description = $3, product_id = $4, original_price = $5,
                 offer_price = $6, valid_from = $7, valid_until = $8, max_redemptions = $9,
                 image = $10, is_active = $11, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            OFFER_COLUMNS
        );

        let offer = bind_input(sqlx::query_as::<_, SpecialOffer>(&sql).bind(id), input)
            .fetch_optional(&self.pool)
            .await?;

        Ok(offer)
    }

    /// Delete an offer, returning the deleted row
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<Option<SpecialOffer>> {
        info!("Deleting offer {}", id);

        let offer = sqlx::query_as::<_, SpecialOffer>(&format!(
            "DELETE FROM special_offers WHERE id = $1 RETURNING {}",
            OFFER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offer)
    }

    /// Count one redemption.
    ///
    /// The availability check and the increment happen in one statement, so
    /// concurrent redemptions never push the count past the cap.
    pub async fn redeem(&self, id: Uuid, now: DateTime<Utc>) -> DatabaseResult<Redemption> {
        let redeemed = sqlx::query_as::<_, SpecialOffer>(&format!(
            "UPDATE special_offers
             SET redemption_count = redemption_count + 1, updated_at = NOW()
             WHERE id = $2 AND {}
             RETURNING {}",
            REDEEMABLE, OFFER_COLUMNS
        ))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(offer) = redeemed {
            info!(
                "Offer {} redeemed ({} so far)",
                offer.id, offer.redemption_count
            );
            return Ok(Redemption::Redeemed(offer));
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM special_offers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(if exists {
            Redemption::Unavailable
        } else {
            Redemption::NotFound
        })
    }
}

fn bind_input<'q>(
    query: QueryAs<'q, Postgres, SpecialOffer, PgArguments>,
    input: &OfferInput,
) -> QueryAs<'q, Postgres, SpecialOffer, PgArguments> {
    query
        .bind(input.title.clone())
        .bind(input.description.clone())
        .bind(input.product_id)
        .bind(input.original_price)
        .bind(input.offer_price)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .bind(input.max_redemptions)
        .bind(input.image.encode())
        .bind(input.is_active)
}
