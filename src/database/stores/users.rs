use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::database::repository::Repository;
use crate::filter::ParsedClause;

pub struct UserStore;

impl UserStore {
    fn repository() -> Repository<User> {
        Repository::new("users", "\"id\" ASC")
    }

    pub async fn list(
        pool: &PgPool,
        clauses: &[ParsedClause],
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<User>, i64), DatabaseError> {
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

    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<User>, DatabaseError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE \"id\" = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?,
        )
    }

    pub async fn find_required(pool: &PgPool, id: i32) -> Result<User, DatabaseError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE \"email\" = $1")
                .bind(email)
                .fetch_optional(pool)
                .await?,
        )
    }

    pub async fn email_in_use(
        pool: &PgPool,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DatabaseError> {
        let existing =
            sqlx::query_scalar::<_, i32>("SELECT \"id\" FROM \"users\" WHERE \"email\" = $1")
                .bind(email)
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
        full_name: Option<String>,
        email: &str,
        password_digest: &str,
    ) -> Result<User, DatabaseError> {
        Ok(sqlx::query_as::<_, User>(
            "INSERT INTO \"users\" (\"full_name\", \"email\", \"password\") \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(full_name)
        .bind(email)
        .bind(password_digest)
        .fetch_one(pool)
        .await?)
    }

    /// Update the provided fields only; absent fields keep their value.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        full_name: Option<String>,
        email: Option<String>,
        password_digest: Option<String>,
    ) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "UPDATE \"users\" SET \
             \"full_name\" = COALESCE($2, \"full_name\"), \
             \"email\" = COALESCE($3, \"email\"), \
             \"password\" = COALESCE($4, \"password\"), \
             \"updated_at\" = NOW() \
             WHERE \"id\" = $1 RETURNING *",
        )
        .bind(id)
        .bind(full_name)
        .bind(email)
        .bind(password_digest)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM \"users\" WHERE \"id\" = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}
