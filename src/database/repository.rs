use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::filter::{FilterApply, FilterValue, ParsedClause};

/// Clause-driven list/count over one table.
///
/// Table and order-by fragments are fixed at construction from static
/// strings; only filter values travel as bind parameters.
pub struct Repository<T> {
    table_name: &'static str,
    order_by: &'static str,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
{
    pub fn new(table_name: &'static str, order_by: &'static str) -> Self {
        Self {
            table_name,
            order_by,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn list(
        &self,
        pool: &PgPool,
        clauses: &[ParsedClause],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<T>, DatabaseError> {
        let apply = FilterApply::from_clauses(clauses);
        let sql = apply.to_select_sql(self.table_name, self.order_by, limit, offset);
        let mut query = sqlx::query_as::<_, T>(&sql);
        for param in apply.params() {
            query = match param {
                FilterValue::Text(text) => query.bind(text.clone()),
                FilterValue::Number(number) => query.bind(*number),
            };
        }
        Ok(query.fetch_all(pool).await?)
    }

    pub async fn count(
        &self,
        pool: &PgPool,
        clauses: &[ParsedClause],
    ) -> Result<i64, DatabaseError> {
        let apply = FilterApply::from_clauses(clauses);
        let sql = apply.to_count_sql(self.table_name);
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for param in apply.params() {
            query = match param {
                FilterValue::Text(text) => query.bind(text.clone()),
                FilterValue::Number(number) => query.bind(*number),
            };
        }
        Ok(query.fetch_one(pool).await?)
    }
}
