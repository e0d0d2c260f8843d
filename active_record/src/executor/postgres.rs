//! PostgreSQL executor
//!
//! Runs statements through a `sqlx` pool. The executor owns a tokio runtime
//! and blocks on it, so it must not be called from inside another runtime.

use crate::binding::{ColumnBinding, Row};
use crate::errors::ExecutorError;
use crate::executor::{ExecutionOutcome, Executor};
use crate::statement::{Statement, StatementKind};
use chrono::{DateTime, NaiveDateTime, Utc};
use config::{DatabaseConfig, MapperConfig, PlaceholderStyle};
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row as _, TypeInfo, ValueRef};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;
use type_mapping::ColumnValue;

#[derive(Error, Debug)]
pub enum PgExecutorError {
    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Column '{column}' has unsupported type {type_name}")]
    UnsupportedColumn { column: String, type_name: String },
}

pub struct PgExecutor {
    runtime: Runtime,
    pool: PgPool,
    log_statements: bool,
}

impl std::fmt::Debug for PgExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgExecutor")
            .field("pool_size", &self.pool.size())
            .field("log_statements", &self.log_statements)
            .finish()
    }
}

impl PgExecutor {
    /// Start a runtime and open a connection pool
    pub fn connect(config: &DatabaseConfig, mapper: &MapperConfig) -> Result<Self, PgExecutorError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = runtime.block_on(pool_options.connect(&config.connection_string()))?;

        Ok(Self {
            runtime,
            pool,
            log_statements: mapper.log_statements,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn log(&self, statement: &Statement) {
        if self.log_statements {
            tracing::info!(table = statement.table().name(), kind = %statement.kind(), "Executing: {}", statement);
        }
    }

    async fn run(&self, statement: &Statement) -> Result<ExecutionOutcome, PgExecutorError> {
        let (sql, params) = statement.to_sql(PlaceholderStyle::Dollar);

        // Only an identity the database chose is reported back
        if statement.kind() == StatementKind::Insert && statement.supplied_identity().is_none() {
            let sql = format!(
                "{} RETURNING {};",
                sql.trim_end_matches(';'),
                statement.table().identity_column()
            );
            let row = bind_all(sqlx::query(&sql), &params)
                .fetch_one(&self.pool)
                .await?;
            let identity = decode_column(&row, 0)?;
            return Ok(ExecutionOutcome::affected(1).with_identity(identity));
        }

        let result = bind_all(sqlx::query(&sql), &params)
            .execute(&self.pool)
            .await?;
        Ok(ExecutionOutcome::affected(result.rows_affected()))
    }

    async fn fetch(&self, statement: &Statement) -> Result<Option<Row>, PgExecutorError> {
        let (sql, params) = statement.to_sql(PlaceholderStyle::Dollar);
        let Some(pg_row) = bind_all(sqlx::query(&sql), &params)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let row = pg_row
            .columns()
            .iter()
            .map(|column| {
                decode_column(&pg_row, column.ordinal())
                    .map(|value| ColumnBinding::new(column.name(), value))
            })
            .collect::<Result<Row, _>>()?;
        Ok(Some(row))
    }
}

impl Executor for PgExecutor {
    fn execute(&self, statement: &Statement) -> Result<ExecutionOutcome, ExecutorError> {
        self.log(statement);
        self.runtime
            .block_on(self.run(statement))
            .map_err(Into::into)
    }

    fn fetch_one(&self, statement: &Statement) -> Result<Option<Row>, ExecutorError> {
        self.log(statement);
        self.runtime
            .block_on(self.fetch(statement))
            .map_err(Into::into)
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[ColumnValue],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param.clone() {
            ColumnValue::Text(s) => query.bind(s),
            ColumnValue::SmallInt(i) => query.bind(i),
            ColumnValue::Integer(i) => query.bind(i),
            ColumnValue::BigInt(i) => query.bind(i),
            ColumnValue::Float(f) => query.bind(f),
            ColumnValue::Boolean(b) => query.bind(b),
            ColumnValue::Uuid(u) => query.bind(u),
            ColumnValue::Timestamp(t) => query.bind(t),
            // Bound as text; the statement casts it to NUMERIC
            ColumnValue::Decimal(d) => query.bind(d),
            ColumnValue::Json(v) => query.bind(sqlx::types::Json(v)),
            // `to_sql` writes absent values as NULL literals, so none reach here
            ColumnValue::Null | ColumnValue::Unset => query.bind(Option::<String>::None),
        };
    }
    query
}

fn decode_column(row: &PgRow, index: usize) -> Result<ColumnValue, PgExecutorError> {
    let column = &row.columns()[index];
    if row.try_get_raw(index)?.is_null() {
        return Ok(ColumnValue::Null);
    }

    let value = match column.type_info().name() {
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => ColumnValue::Text(row.try_get(index)?),
        "INT2" => ColumnValue::SmallInt(row.try_get(index)?),
        "INT4" => ColumnValue::Integer(row.try_get(index)?),
        "INT8" => ColumnValue::BigInt(row.try_get(index)?),
        "FLOAT4" => ColumnValue::Float(f64::from(row.try_get::<f32, _>(index)?)),
        "FLOAT8" => ColumnValue::Float(row.try_get(index)?),
        "BOOL" => ColumnValue::Boolean(row.try_get(index)?),
        "UUID" => ColumnValue::Uuid(row.try_get(index)?),
        "TIMESTAMPTZ" => ColumnValue::Timestamp(row.try_get::<DateTime<Utc>, _>(index)?),
        "TIMESTAMP" => ColumnValue::Timestamp(row.try_get::<NaiveDateTime, _>(index)?.and_utc()),
        "JSON" | "JSONB" => ColumnValue::Json(row.try_get(index)?),
        other => {
            return Err(PgExecutorError::UnsupportedColumn {
                column: column.name().to_string(),
                type_name: other.to_string(),
            })
        }
    };
    Ok(value)
}
