//! PostgreSQL row source.
//!
//! Opens one connection per acquire, runs the configured `select` once, and
//! drops the connection before returning. Rows come back through
//! `row_to_json`, so each row keeps the column order the query produced
//! without a compile-time schema.
//!
//! The select runs as a plain subquery of the `row_to_json` scan with no outer
//! join, grouping or sort, so PostgreSQL hands rows through in the order the
//! inner query (including its `ORDER BY`) produced them.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::data::{FieldValue, Row, TabularData};
use crate::error::{InventoryError, Result};
use crate::input::RowSource;

/// Type-specific attributes of a `psql` input
#[derive(Debug, Clone, Deserialize)]
pub struct PsqlOptions {
    pub dbname: String,
    pub user: String,
    pub host: String,
    pub password: String,
    pub select: String,
}

#[derive(QueryableByName)]
struct JsonRow {
    #[diesel(sql_type = Text)]
    row: String,
}

/// Query-backed row source
#[derive(Clone)]
pub struct PsqlSource {
    dsn: String,
    query: String,
}

impl PsqlSource {
    pub fn new(options: PsqlOptions) -> Self {
        let dsn = format!(
            "dbname={} user={} host={} password={}",
            quote_conninfo(&options.dbname),
            quote_conninfo(&options.user),
            quote_conninfo(&options.host),
            quote_conninfo(&options.password),
        );

        Self {
            dsn,
            query: options.select,
        }
    }

    pub fn from_options(name: &str, options: &Mapping) -> Result<Self> {
        let options: PsqlOptions = serde_yaml::from_value(Value::Mapping(options.clone()))
            .map_err(|e| InventoryError::config(format!("Input '{}': {}", name, e)))?;
        Ok(Self::new(options))
    }

    /// libpq keyword/value connection string
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// The configured select, wrapped so each row arrives as one JSON object.
    ///
    /// The select sits on its own lines so a trailing `--` comment cannot
    /// swallow the closing parenthesis.
    pub fn wrapped_query(&self) -> String {
        let select = self.query.trim().trim_end_matches(';').trim_end();
        format!("SELECT row_to_json(q)::text AS row FROM (\n{}\n) AS q", select)
    }
}

impl std::fmt::Debug for PsqlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // keep the password out of logs
        f.debug_struct("PsqlSource")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl RowSource for PsqlSource {
    fn acquire(&self) -> Result<TabularData> {
        let mut conn = PgConnection::establish(&self.dsn)
            .map_err(|e| InventoryError::Source(format!("failed to connect: {}", e)))?;

        let rows: Vec<JsonRow> = diesel::sql_query(self.wrapped_query())
            .load(&mut conn)
            .map_err(|e| InventoryError::Source(format!("query failed: {}", e)))?;

        rows.iter().map(|r| decode_row(&r.row)).collect()
    }
}

/// Decode one `row_to_json` object, keeping its key order.
fn decode_row(text: &str) -> Result<Row> {
    let object: IndexMap<String, serde_json::Value> = serde_json::from_str(text)?;
    Ok(object
        .into_iter()
        .map(|(column, value)| (column, FieldValue::from_json(value)))
        .collect())
}

/// Quote a conninfo value: wrap in single quotes, escape `\` and `'`.
fn quote_conninfo(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}
