use std::collections::HashMap;

use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{City, CityWithProvince, Province};
use crate::filter::{FilterApply, FilterOp, FilterValue, ParsedClause};

pub struct CityStore;

impl CityStore {
    /// Filtered, paginated city listing. An explicit `provinceId` constraint
    /// composes with whatever the filter grammar produced.
    pub async fn list(
        pool: &PgPool,
        clauses: &[ParsedClause],
        province_id: Option<i32>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<City>, i64), DatabaseError> {
        let apply = Self::build_apply(clauses, province_id);

        let select_sql =
            apply.to_select_sql("cities", "\"name\" ASC", per_page, (page - 1) * per_page);
        let mut query = sqlx::query_as::<_, City>(&select_sql);
        for param in apply.params() {
            query = match param {
                FilterValue::Text(text) => query.bind(text.clone()),
                FilterValue::Number(number) => query.bind(*number),
            };
        }
        let rows = query.fetch_all(pool).await?;

        let count_sql = apply.to_count_sql("cities");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in apply.params() {
            count_query = match param {
                FilterValue::Text(text) => count_query.bind(text.clone()),
                FilterValue::Number(number) => count_query.bind(*number),
            };
        }
        let total = count_query.fetch_one(pool).await?;

        Ok((rows, total))
    }

    pub async fn count(pool: &PgPool, clauses: &[ParsedClause]) -> Result<i64, DatabaseError> {
        let apply = Self::build_apply(clauses, None);
        let sql = apply.to_count_sql("cities");
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for param in apply.params() {
            query = match param {
                FilterValue::Text(text) => query.bind(text.clone()),
                FilterValue::Number(number) => query.bind(*number),
            };
        }
        Ok(query.fetch_one(pool).await?)
    }

    fn build_apply(clauses: &[ParsedClause], province_id: Option<i32>) -> FilterApply {
        let mut apply = FilterApply::from_clauses(clauses);
        if let Some(id) = province_id {
            apply.push_condition("province_id", FilterOp::Eq, FilterValue::Number(id as f64));
        }
        apply
    }

    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<City>, DatabaseError> {
        Ok(
            sqlx::query_as::<_, City>("SELECT * FROM \"cities\" WHERE \"id\" = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?,
        )
    }

    pub async fn find_required(pool: &PgPool, id: i32) -> Result<City, DatabaseError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("City {} not found", id)))
    }

    pub async fn code_in_use(
        pool: &PgPool,
        province_id: i32,
        code: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DatabaseError> {
        Self::id_in_use(
            pool,
            "SELECT \"id\" FROM \"cities\" WHERE \"province_id\" = $1 AND \"code\" = $2",
            province_id,
            code,
            exclude_id,
        )
        .await
    }

    pub async fn name_in_use(
        pool: &PgPool,
        province_id: i32,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DatabaseError> {
        Self::id_in_use(
            pool,
            "SELECT \"id\" FROM \"cities\" WHERE \"province_id\" = $1 AND \"name\" = $2",
            province_id,
            name,
            exclude_id,
        )
        .await
    }

    async fn id_in_use(
        pool: &PgPool,
        sql: &str,
        province_id: i32,
        value: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DatabaseError> {
        let existing = sqlx::query_scalar::<_, i32>(sql)
            .bind(province_id)
            .bind(value)
            .fetch_optional(pool)
            .await?;
        Ok(match (existing, exclude_id) {
            (Some(id), Some(exclude)) => id != exclude,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    pub async fn create(
        pool: &PgPool,
        province_id: i32,
        code: &str,
        name: &str,
        classification: &str,
    ) -> Result<City, DatabaseError> {
        Ok(sqlx::query_as::<_, City>(
            "INSERT INTO \"cities\" (\"province_id\", \"code\", \"name\", \"classification\") \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(province_id)
        .bind(code)
        .bind(name)
        .bind(classification)
        .fetch_one(pool)
        .await?)
    }

    pub async fn update(
        pool: &PgPool,
        id: i32,
        province_id: Option<i32>,
        code: Option<String>,
        name: Option<String>,
        classification: Option<String>,
    ) -> Result<City, DatabaseError> {
        sqlx::query_as::<_, City>(
            "UPDATE \"cities\" SET \
             \"province_id\" = COALESCE($2, \"province_id\"), \
             \"code\" = COALESCE($3, \"code\"), \
             \"name\" = COALESCE($4, \"name\"), \
             \"classification\" = COALESCE($5, \"classification\"), \
             \"updated_at\" = NOW() \
             WHERE \"id\" = $1 RETURNING *",
        )
        .bind(id)
        .bind(province_id)
        .bind(code)
        .bind(name)
        .bind(classification)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("City {} not found", id)))
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM \"cities\" WHERE \"id\" = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("City {} not found", id)));
        }
        Ok(())
    }

    /// Attach each city's parent province, as listing and show responses
    /// embed it.
    pub async fn with_province(
        pool: &PgPool,
        cities: Vec<City>,
    ) -> Result<Vec<CityWithProvince>, DatabaseError> {
        let mut ids: Vec<i32> = cities.iter().map(|c| c.province_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut provinces: HashMap<i32, Province> = HashMap::new();
        if !ids.is_empty() {
            let rows = sqlx::query_as::<_, Province>(
                "SELECT * FROM \"provinces\" WHERE \"id\" = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(pool)
            .await?;
            for province in rows {
                provinces.insert(province.id, province);
            }
        }

        Ok(cities
            .into_iter()
            .map(|city| {
                let province = provinces.get(&city.province_id).cloned();
                CityWithProvince { city, province }
            })
            .collect())
    }
}
