//! PostgreSQL record store.
//!
//! Renders [`RecordQuery`] values through `sqlx::QueryBuilder` with bound
//! parameters. Identifiers are double-quoted. Rows are decoded by column type,
//! the `id` column becoming [`Record::id`]; column types the flag layer does not
//! understand are left out of the record.

use super::RecordStore;
use crate::config::FlagsConfig;
use crate::models::{ColumnValue, Record, PRIMARY_KEY};
use crate::query_builder::{Assignment, Condition, RecordQuery};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Column, Postgres, QueryBuilder, Row, TypeInfo};
use tracing::debug;

/// `sqlx` backed store
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool to `database_url`
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Connect to the configured `database_url`
    pub async fn from_config(config: &FlagsConfig) -> Result<Self, sqlx::Error> {
        let url = config.database_url.as_deref().ok_or_else(|| {
            sqlx::Error::Configuration("database_url is not configured".into())
        })?;
        Self::connect(url).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// SELECT statement for the query
    pub fn select_builder(query: &RecordQuery) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT * FROM ");
        builder.push(quote_ident(query.table()));
        push_where(&mut builder, query);

        for (index, (column, direction)) in query.order_by_columns().iter().enumerate() {
            builder.push(if index == 0 { " ORDER BY " } else { ", " });
            builder.push(quote_ident(column));
            builder.push(" ");
            builder.push(direction.as_sql());
        }

        if let Some(limit) = query.limit_value() {
            builder.push(" LIMIT ");
            builder.push_bind(i64::from(limit));
        }
        builder
    }

    /// COUNT statement for the query
    pub fn count_builder(query: &RecordQuery) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
        builder.push(quote_ident(query.table()));
        push_where(&mut builder, query);
        builder
    }

    /// UPDATE statement writing `assignments` to the rows matching the query
    pub fn update_builder(
        query: &RecordQuery,
        assignments: &[Assignment],
    ) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("UPDATE ");
        builder.push(quote_ident(query.table()));
        push_assignments(
            &mut builder,
            assignments.iter().map(|a| (a.column.as_str(), &a.value)),
        );
        push_where(&mut builder, query);
        builder
    }

    fn save_builder(table: &str, record: &Record) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("UPDATE ");
        builder.push(quote_ident(table));
        push_assignments(
            &mut builder,
            record
                .attributes
                .iter()
                .map(|(column, value)| (column.as_str(), value)),
        );
        builder.push(" WHERE \"id\" = ");
        builder.push_bind(record.id);
        builder
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &ColumnValue) {
    match value {
        ColumnValue::Null => builder.push("NULL"),
        ColumnValue::Bool(b) => builder.push_bind(*b),
        ColumnValue::Integer(i) => builder.push_bind(*i),
        ColumnValue::Text(s) => builder.push_bind(s.clone()),
        ColumnValue::Timestamp(ts) => builder.push_bind(*ts),
    };
}

fn push_assignments<'a>(
    builder: &mut QueryBuilder<'static, Postgres>,
    assignments: impl Iterator<Item = (&'a str, &'a ColumnValue)>,
) {
    for (index, (column, value)) in assignments.enumerate() {
        builder.push(if index == 0 { " SET " } else { ", " });
        builder.push(quote_ident(column));
        builder.push(" = ");
        push_value(builder, value);
    }
}

fn push_where(builder: &mut QueryBuilder<'static, Postgres>, query: &RecordQuery) {
    for (index, clause) in query.where_clauses().iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        match &clause.condition {
            Condition::Compare {
                field,
                operator,
                value,
            } => {
                builder.push(quote_ident(field));
                builder.push(format!(" {} ", operator.as_sql()));
                push_value(builder, value);
            }
            Condition::IsNull { field } => {
                builder.push(quote_ident(field));
                builder.push(" IS NULL");
            }
            Condition::IsNotNull { field } => {
                builder.push(quote_ident(field));
                builder.push(" IS NOT NULL");
            }
            Condition::IsNotTrue { field } => {
                builder.push(quote_ident(field));
                builder.push(" IS NOT TRUE");
            }
        }
    }
}

fn decode_row(row: &PgRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new(0);

    for column in row.columns() {
        let ordinal = column.ordinal();
        let value: ColumnValue = match column.type_info().name() {
            "BOOL" => row.try_get::<Option<bool>, _>(ordinal)?.into(),
            "INT2" => row
                .try_get::<Option<i16>, _>(ordinal)?
                .map(i64::from)
                .into(),
            "INT4" => row
                .try_get::<Option<i32>, _>(ordinal)?
                .map(i64::from)
                .into(),
            "INT8" => row.try_get::<Option<i64>, _>(ordinal)?.into(),
            "TIMESTAMPTZ" => row.try_get::<Option<DateTime<Utc>>, _>(ordinal)?.into(),
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(ordinal)?
                .map(|naive| naive.and_utc())
                .into(),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
                row.try_get::<Option<String>, _>(ordinal)?.into()
            }
            _ => continue,
        };

        if column.name() == PRIMARY_KEY {
            if let ColumnValue::Integer(id) = value {
                record.id = id;
            }
            continue;
        }
        record.attributes.insert(column.name().to_string(), value);
    }

    Ok(record)
}

#[async_trait]
impl RecordStore for PgRecordStore {
    type Error = sqlx::Error;

    async fn fetch_all(&self, query: &RecordQuery) -> Result<Vec<Record>, Self::Error> {
        let mut builder = Self::select_builder(query);
        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn count(&self, query: &RecordQuery) -> Result<i64, Self::Error> {
        let mut builder = Self::count_builder(query);
        let row = builder.build().fetch_one(&self.pool).await?;
        row.try_get::<i64, _>(0)
    }

    async fn update(
        &self,
        query: &RecordQuery,
        assignments: &[Assignment],
    ) -> Result<u64, Self::Error> {
        if assignments.is_empty() {
            return Ok(0);
        }
        let mut builder = Self::update_builder(query, assignments);
        let result = builder.build().execute(&self.pool).await?;
        debug!(
            table = %query.table(),
            affected = result.rows_affected(),
            "postgres store update"
        );
        Ok(result.rows_affected())
    }

    async fn find(&self, table: &str, id: i64) -> Result<Option<Record>, Self::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        builder.push(quote_ident(table));
        builder.push(" WHERE \"id\" = ");
        builder.push_bind(id);
        let row = builder.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(decode_row).transpose()
    }

    async fn refresh(&self, table: &str, record: &mut Record) -> Result<(), Self::Error> {
        let fresh = self
            .find(table, record.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        *record = fresh;
        Ok(())
    }

    async fn save(&self, table: &str, record: &Record) -> Result<(), Self::Error> {
        if record.attributes.is_empty() {
            return Ok(());
        }
        let mut builder = Self::save_builder(table, record);
        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
