//! Store branch model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::StoredImage;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub opening_hours: String,
    #[sqlx(try_from = "Option<String>")]
    pub image: StoredImage,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full set of writable branch columns
#[derive(Debug, Clone)]
pub struct BranchInput {
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub opening_hours: String,
    pub image: StoredImage,
    pub is_active: bool,
    pub sort_order: i32,
}

impl From<&Branch> for BranchInput {
    fn from(branch: &Branch) -> Self {
        Self {
            name: branch.name.clone(),
            address: branch.address.clone(),
            city: branch.city.clone(),
            phone: branch.phone.clone(),
            email: branch.email.clone(),
            latitude: branch.latitude,
            longitude: branch.longitude,
            opening_hours: branch.opening_hours.clone(),
            image: branch.image.clone(),
            is_active: branch.is_active,
            sort_order: branch.sort_order,
        }
    }
}
