use std::collections::HashMap;

use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{City, Province, ProvinceWithCities};
use crate::database::repository::Repository;
use crate::filter::ParsedClause;

pub struct ProvinceStore;

impl ProvinceStore {
    fn repository() -> Repository<Province> {
        Repository::new("provinces", "\"name\" ASC")
    }

    pub async fn list(
        pool: &PgPool,
        clauses: &[ParsedClause],
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Province>, i64), DatabaseError> {
        let repository = Self::repository();
        let rows = repository
            .list(pool, clauses, per_page, (page - 1) * per_page)
            .await?;
        let total = repository.count(pool, clauses).await?;
        Ok((rows, total))
    }

    pub async fn count(pool: &PgPool, clauses: &[ParsedClause]) -> Result<i64, DatabaseError> {
        Self::repository().count(pool, clauses).await
    }

    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Province>, DatabaseError> {
        Ok(
            sqlx::query_as::<_, Province>("SELECT * FROM \"provinces\" WHERE \"id\" = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?,
        )
    }

    pub async fn find_required(pool: &PgPool, id: i32) -> Result<Province, DatabaseError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Province {} not found", id)))
    }

    pub async fn code_in_use(
        pool: &PgPool,
        code: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DatabaseError> {
        Self::id_in_use(pool, "SELECT \"id\" FROM \"provinces\" WHERE \"code\" = $1", code, exclude_id)
            .await
    }

    pub async fn name_in_use(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DatabaseError> {
        Self::id_in_use(pool, "SELECT \"id\" FROM \"provinces\" WHERE \"name\" = $1", name, exclude_id)
            .await
    }

    async fn id_in_use(
        pool: &PgPool,
        sql: &str,
        value: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DatabaseError> {
        let existing = sqlx::query_scalar::<_, i32>(sql)
            .bind(value)
            .fetch_optional(pool)
            .await?;
        Ok(match (existing, exclude_id) {
            (Some(id), Some(exclude)) => id != exclude,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    pub async fn create(pool: &PgPool, code: &str, name: &str) -> Result<Province, DatabaseError> {
        Ok(sqlx::query_as::<_, Province>(
            "INSERT INTO \"provinces\" (\"code\", \"name\") VALUES ($1, $2) RETURNING *",
        )
        .bind(code)
        .bind(name)
        .fetch_one(pool)
        .await?)
    }

    pub async fn update(
        pool: &PgPool,
        id: i32,
        code: Option<String>,
        name: Option<String>,
    ) -> Result<Province, DatabaseError> {
        sqlx::query_as::<_, Province>(
            "UPDATE \"provinces\" SET \
             \"code\" = COALESCE($2, \"code\"), \
             \"name\" = COALESCE($3, \"name\"), \
             \"updated_at\" = NOW() \
             WHERE \"id\" = $1 RETURNING *",
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Province {} not found", id)))
    }

    /// Cities go with it via the FK cascade.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM \"provinces\" WHERE \"id\" = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Province {} not found", id)));
        }
        Ok(())
    }

    pub async fn cities_for(pool: &PgPool, ids: &[i32]) -> Result<Vec<City>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(sqlx::query_as::<_, City>(
            "SELECT * FROM \"cities\" WHERE \"province_id\" = ANY($1) ORDER BY \"name\" ASC",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?)
    }

    /// Attach cities to an already-fetched page of provinces.
    pub async fn with_cities(
        pool: &PgPool,
        provinces: Vec<Province>,
    ) -> Result<Vec<ProvinceWithCities>, DatabaseError> {
        let ids: Vec<i32> = provinces.iter().map(|p| p.id).collect();
        let mut grouped: HashMap<i32, Vec<City>> = HashMap::new();
        for city in Self::cities_for(pool, &ids).await? {
            grouped.entry(city.province_id).or_default().push(city);
        }
        Ok(provinces
            .into_iter()
            .map(|province| {
                let cities = grouped.remove(&province.id).unwrap_or_default();
                ProvinceWithCities { province, cities }
            })
            .collect())
    }

    /// Every province ordered by name, each with its cities.
    pub async fn tree(pool: &PgPool) -> Result<Vec<ProvinceWithCities>, DatabaseError> {
        let provinces = sqlx::query_as::<_, Province>(
            "SELECT * FROM \"provinces\" ORDER BY \"name\" ASC",
        )
        .fetch_all(pool)
        .await?;
        Self::with_cities(pool, provinces).await
    }
}
