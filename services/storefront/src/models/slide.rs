//! Homepage slideshow model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::StoredImage;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    #[sqlx(try_from = "Option<String>")]
    pub image: StoredImage,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full set of writable slide columns
#[derive(Debug, Clone)]
pub struct SlideInput {
    pub title: String,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub image: StoredImage,
    pub sort_order: i32,
    pub is_active: bool,
}

impl From<&Slide> for SlideInput {
    fn from(slide: &Slide) -> Self {
        Self {
            title: slide.title.clone(),
            subtitle: slide.subtitle.clone(),
            button_text: slide.button_text.clone(),
            button_link: slide.button_link.clone(),
            image: slide.image.clone(),
            sort_order: slide.sort_order,
            is_active: slide.is_active,
        }
    }
}

/// New slideshow order: slide ids, first shown first
#[derive(Debug, Clone, Deserialize)]
pub struct SlideOrder {
    pub ids: Vec<Uuid>,
}
