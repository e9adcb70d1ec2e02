use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::province::Province;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct City {
    pub id: i32,
    pub province_id: i32,
    pub code: String,
    pub name: String,
    /// Either "city" or "regency".
    pub classification: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// City row with its parent province embedded, as listing responses ship it.
#[derive(Debug, Clone, Serialize)]
pub struct CityWithProvince {
    #[serde(flatten)]
    pub city: City,
    pub province: Option<Province>,
}
