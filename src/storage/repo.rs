//! Generic single-table repository.
//!
//! All four entity managers share this one component. SQL is assembled
//! from the static `EntityDef` (table and column names are compile-time
//! literals, values are always bound), rows come back as
//! `row_to_json(table.*)` and are decoded into typed DTOs by the caller.
//! Every operation acquires its own pooled connection, which is released
//! on all exit paths.

use crate::domain::error::ApiError;
use crate::storage::entity::{ColumnType, EntityDef};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

/// Upper bound on `limit` for list and search windows.
pub const MAX_LIMIT: i64 = 1000;

/// One column assignment in a partial update. A JSON `null` value writes
/// SQL NULL (legal only for nullable columns; the payload layer rejects
/// null for required fields before it gets here).
#[derive(Debug, Clone)]
pub struct FieldChange {
    pub column: &'static str,
    pub value: JsonValue,
}

impl FieldChange {
    pub fn set(column: &'static str, value: JsonValue) -> Self {
        Self { column, value }
    }

    pub fn clear(column: &'static str) -> Self {
        Self { column, value: JsonValue::Null }
    }
}

pub struct Repo<'a> {
    pool: &'a PgPool,
    def: &'static EntityDef,
}

impl<'a> Repo<'a> {
    pub fn new(pool: &'a PgPool, def: &'static EntityDef) -> Self {
        Self { pool, def }
    }

    /// Inserts the supplied columns and returns the persisted row,
    /// including the generated id. Uniqueness violations surface as
    /// `Conflict` via the error mapping.
    pub async fn create(&self, values: &Map<String, JsonValue>) -> Result<JsonValue, ApiError> {
        let cols: Vec<&str> = self
            .def
            .columns
            .iter()
            .map(|c| c.name)
            .filter(|name| values.contains_key(*name))
            .collect();
        if cols.is_empty() {
            return Err(ApiError::Validation("no insertable fields supplied".to_string()));
        }

        let sql = insert_sql(self.def, &cols);
        let mut query = sqlx::query(&sql);
        for c in self.def.columns.iter().filter(|c| values.contains_key(c.name)) {
            query = bind_json(query, c.ty, &values[c.name])?;
        }

        let row = query.fetch_one(self.pool).await?;
        Ok(row.try_get("record")?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<JsonValue>, ApiError> {
        let sql = format!(
            "SELECT row_to_json({t}.*) AS record FROM {t} WHERE id = $1",
            t = self.def.table
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(self.pool).await?;
        row.map(|r| r.try_get("record")).transpose().map_err(ApiError::from)
    }

    /// Bounded page in storage-default order (no ORDER BY; not
    /// guaranteed stable across deletions).
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<JsonValue>, ApiError> {
        if skip < 0 {
            return Err(ApiError::Validation("skip must be >= 0".to_string()));
        }
        if limit < 1 || limit > MAX_LIMIT {
            return Err(ApiError::Validation(format!("limit must be between 1 and {MAX_LIMIT}")));
        }
        let sql = format!(
            "SELECT row_to_json({t}.*) AS record FROM {t} OFFSET $1 LIMIT $2",
            t = self.def.table
        );
        let rows = sqlx::query(&sql)
            .bind(skip)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
        rows.into_iter()
            .map(|r| r.try_get("record").map_err(ApiError::from))
            .collect()
    }

    /// Partial update: only the supplied columns change. An empty
    /// change-set reads the row back untouched.
    pub async fn update(
        &self,
        id: i64,
        changes: &[FieldChange],
    ) -> Result<Option<JsonValue>, ApiError> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let cols: Vec<&str> = changes.iter().map(|c| c.column).collect();
        let sql = update_sql(self.def, &cols);
        let mut query = sqlx::query(&sql);
        for change in changes {
            let ty = self
                .def
                .column(change.column)
                .ok_or_else(|| {
                    ApiError::Validation(format!("unknown column '{}'", change.column))
                })?
                .ty;
            query = bind_json(query, ty, &change.value)?;
        }

        let row = query.bind(id).fetch_optional(self.pool).await?;
        row.map(|r| r.try_get("record")).transpose().map_err(ApiError::from)
    }

    /// Returns whether a row was actually removed. No cascade beyond what
    /// the schema declares.
    pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let sql = format!("DELETE FROM {t} WHERE id = $1", t = self.def.table);
        let result = sqlx::query(&sql).bind(id).execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Exact-match lookup on a text column (car by chassis number).
    pub async fn find_one_text_eq(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<JsonValue>, ApiError> {
        let sql = format!(
            "SELECT row_to_json({t}.*) AS record FROM {t} WHERE {column} = $1",
            t = self.def.table
        );
        let row = sqlx::query(&sql).bind(value).fetch_optional(self.pool).await?;
        row.map(|r| r.try_get("record")).transpose().map_err(ApiError::from)
    }

    /// All rows whose integer column equals `value` (sales by car).
    pub async fn find_all_i64_eq(
        &self,
        column: &'static str,
        value: i64,
    ) -> Result<Vec<JsonValue>, ApiError> {
        let sql = format!(
            "SELECT row_to_json({t}.*) AS record FROM {t} WHERE {column} = $1",
            t = self.def.table
        );
        let rows = sqlx::query(&sql).bind(value).fetch_all(self.pool).await?;
        rows.into_iter()
            .map(|r| r.try_get("record").map_err(ApiError::from))
            .collect()
    }

    /// Case-insensitive substring match pushed down to SQL (sales by
    /// buyer name).
    pub async fn find_all_text_ilike(
        &self,
        column: &'static str,
        needle: &str,
    ) -> Result<Vec<JsonValue>, ApiError> {
        let sql = format!(
            "SELECT row_to_json({t}.*) AS record FROM {t} WHERE {column} ILIKE $1",
            t = self.def.table
        );
        let pattern = format!("%{needle}%");
        let rows = sqlx::query(&sql).bind(pattern).fetch_all(self.pool).await?;
        rows.into_iter()
            .map(|r| r.try_get("record").map_err(ApiError::from))
            .collect()
    }
}

fn insert_sql(def: &EntityDef, cols: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=cols.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {t} ({}) VALUES ({}) RETURNING row_to_json({t}.*) AS record",
        cols.join(", "),
        placeholders.join(", "),
        t = def.table
    )
}

fn update_sql(def: &EntityDef, cols: &[&str]) -> String {
    let assignments: Vec<String> = cols
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{c} = ${}", i + 1))
        .collect();
    format!(
        "UPDATE {t} SET {} WHERE id = ${} RETURNING row_to_json({t}.*) AS record",
        assignments.join(", "),
        cols.len() + 1,
        t = def.table
    )
}

fn bind_json<'q>(
    query: Query<'q, Postgres, PgArguments>,
    ty: ColumnType,
    value: &JsonValue,
) -> Result<Query<'q, Postgres, PgArguments>, ApiError> {
    if value.is_null() {
        return Ok(match ty {
            ColumnType::Int => query.bind::<Option<i32>>(None),
            ColumnType::BigInt => query.bind::<Option<i64>>(None),
            ColumnType::Text => query.bind::<Option<String>>(None),
            ColumnType::Float8 => query.bind::<Option<f64>>(None),
            ColumnType::Timestamptz => query.bind::<Option<DateTime<Utc>>>(None),
        });
    }
    match ty {
        ColumnType::Int => {
            let n = value
                .as_i64()
                .ok_or_else(|| ApiError::Validation(format!("expected integer, got {value}")))?;
            let n = i32::try_from(n)
                .map_err(|_| ApiError::Validation(format!("integer out of range: {n}")))?;
            Ok(query.bind(n))
        }
        ColumnType::BigInt => {
            let n = value
                .as_i64()
                .ok_or_else(|| ApiError::Validation(format!("expected integer, got {value}")))?;
            Ok(query.bind(n))
        }
        ColumnType::Text => {
            let s = value
                .as_str()
                .ok_or_else(|| ApiError::Validation(format!("expected string, got {value}")))?;
            Ok(query.bind(s.to_string()))
        }
        ColumnType::Float8 => {
            let f = value
                .as_f64()
                .ok_or_else(|| ApiError::Validation(format!("expected number, got {value}")))?;
            Ok(query.bind(f))
        }
        ColumnType::Timestamptz => {
            let s = value
                .as_str()
                .ok_or_else(|| ApiError::Validation(format!("expected timestamp, got {value}")))?;
            let dt = DateTime::parse_from_rfc3339(s)
                .map_err(|_| ApiError::Validation(format!("expected RFC3339 timestamp: {s}")))?;
            Ok(query.bind(dt.with_timezone(&Utc)))
        }
    }
}
