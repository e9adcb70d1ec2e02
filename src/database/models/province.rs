use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::city::City;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Province {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Province with its cities embedded, for `withCities` listings, show
/// responses and the public geo tree.
#[derive(Debug, Clone, Serialize)]
pub struct ProvinceWithCities {
    #[serde(flatten)]
    pub province: Province,
    pub cities: Vec<City>,
}
