// Initiate-content builder: everything a client needs to drive a listing
// screen for one resource.
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::stores::{CityStore, ProvinceStore, UserStore};
use crate::filter::{parse_filter_string, CITIES_REGISTRY, PROVINCES_REGISTRY, USERS_REGISTRY};
use crate::pagination::{normalize_limit, normalize_page, ALLOWED_LIMITS};

/// Echo of the request's pagination/filter inputs after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamsSnapshot {
    pub page: i64,
    pub limit: i64,
    pub filter: String,
}

#[derive(Debug, Serialize)]
pub struct InitiateContent {
    pub params: ParamsSnapshot,
    pub valid_order_by: &'static [&'static str],
    pub valid_search_by: &'static [&'static str],
    pub valid_limit: [i64; 4],
    pub valid_operator: Value,
    pub enum_data: Value,
    pub count_data: i64,
}

/// Trim each comma-separated chunk, drop empties, rejoin with ", ".
pub fn normalize_filter_string(filter: Option<&str>) -> String {
    match filter {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        None => String::new(),
    }
}

fn params_snapshot(page: Option<&str>, limit: Option<&str>, filter: Option<&str>) -> ParamsSnapshot {
    ParamsSnapshot {
        page: normalize_page(page),
        limit: normalize_limit(limit),
        filter: normalize_filter_string(filter),
    }
}

pub async fn build_users_initiate_content(
    pool: &PgPool,
    page: Option<&str>,
    limit: Option<&str>,
    filter: Option<&str>,
) -> Result<InitiateContent, DatabaseError> {
    let clauses = parse_filter_string(filter.unwrap_or_default(), &USERS_REGISTRY);
    Ok(InitiateContent {
        params: params_snapshot(page, limit, filter),
        valid_order_by: &["id", "full_name", "email", "created_at"],
        valid_search_by: &["full_name", "email"],
        valid_limit: ALLOWED_LIMITS,
        valid_operator: USERS_REGISTRY.to_json(),
        enum_data: Value::Null,
        count_data: UserStore::count(pool, &clauses).await?,
    })
}

pub async fn build_provinces_initiate_content(
    pool: &PgPool,
    page: Option<&str>,
    limit: Option<&str>,
    filter: Option<&str>,
) -> Result<InitiateContent, DatabaseError> {
    let clauses = parse_filter_string(filter.unwrap_or_default(), &PROVINCES_REGISTRY);
    Ok(InitiateContent {
        params: params_snapshot(page, limit, filter),
        valid_order_by: &["id", "code", "name"],
        valid_search_by: &["code", "name"],
        valid_limit: ALLOWED_LIMITS,
        valid_operator: PROVINCES_REGISTRY.to_json(),
        enum_data: Value::Null,
        count_data: ProvinceStore::count(pool, &clauses).await?,
    })
}

pub async fn build_cities_initiate_content(
    pool: &PgPool,
    page: Option<&str>,
    limit: Option<&str>,
    filter: Option<&str>,
) -> Result<InitiateContent, DatabaseError> {
    let clauses = parse_filter_string(filter.unwrap_or_default(), &CITIES_REGISTRY);
    Ok(InitiateContent {
        params: params_snapshot(page, limit, filter),
        valid_order_by: &["id", "code", "name", "province_id"],
        valid_search_by: &["code", "name", "province_id"],
        valid_limit: ALLOWED_LIMITS,
        valid_operator: CITIES_REGISTRY.to_json(),
        enum_data: Value::Null,
        count_data: CityStore::count(pool, &clauses).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_string_normalization() {
        assert_eq!(normalize_filter_string(None), "");
        assert_eq!(normalize_filter_string(Some("")), "");
        assert_eq!(
            normalize_filter_string(Some("  name like a ,, id eq 1 ")),
            "name like a, id eq 1"
        );
    }

    #[test]
    fn params_snapshot_normalizes_all_inputs() {
        let snapshot = params_snapshot(Some("0"), Some("35"), Some(" a eq 1 ,b eq 2"));
        assert_eq!(
            snapshot,
            ParamsSnapshot {
                page: 1,
                limit: 20,
                filter: "a eq 1, b eq 2".to_string(),
            }
        );
    }
}
