//! DocumentStore - Main entry point for dynamic-schema document storage
//!
//! This module provides the `DocumentStore` struct that persists schemaless
//! documents as rows of a single SQLite table, adding columns as new keys
//! appear.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Row, SqliteConnection};
use tracing::{debug, instrument};

use crate::codec;
use crate::config::StoreConfig;
use crate::error::{DocumentStoreError, Result};
use crate::query::Query;
use crate::schema::{ColumnSet, ROW_ID_COLUMN};
use crate::sql::condition::{Filter, Order, build_order_by, build_where};
use crate::sql::ddl::DdlGenerator;
use crate::sql::dml::StatementBuilder;
use crate::value::Document;

/// Dynamic-schema document store over one SQLite table
///
/// The store owns a single connection and the mirror of the table's columns.
/// It is open from [`DocumentStore::open`] until [`DocumentStore::close`] or
/// drop; every operation on a closed store fails with
/// [`DocumentStoreError::Closed`].
///
/// Statements run in autocommit mode, so nothing is left uncommitted when the
/// store is closed or dropped. Methods take `&mut self`; share a store between
/// tasks only behind a lock.
pub struct DocumentStore {
    /// `None` once closed
    conn: Option<SqliteConnection>,
    /// Store configuration
    config: StoreConfig,
    ddl: DdlGenerator,
    statements: StatementBuilder,
    columns: ColumnSet,
}

impl DocumentStore {
    /// Open a store
    ///
    /// This will:
    /// 1. Connect to the database
    /// 2. Create the table if it doesn't exist
    /// 3. Load the table's current columns
    #[instrument(skip_all, fields(location = %config.location, table = %config.table_name))]
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let mut conn = Self::connect_options(&config)?
            .connect()
            .await
            .map_err(|e| {
                DocumentStoreError::Connection(format!("Database connection failed: {}", e))
            })?;

        let ddl = DdlGenerator::new(&config.table_name);
        sqlx::query(&ddl.generate_create_table())
            .execute(&mut conn)
            .await?;

        let columns = ColumnSet::load(&mut conn, &ddl).await?;
        debug!(columns = columns.len(), "document store opened");

        Ok(Self {
            conn: Some(conn),
            statements: StatementBuilder::new(&config.table_name),
            config,
            ddl,
            columns,
        })
    }

    /// Open a private in-memory store with the default table
    pub async fn in_memory() -> Result<Self> {
        Self::open(StoreConfig::in_memory()).await
    }

    fn connect_options(config: &StoreConfig) -> Result<SqliteConnectOptions> {
        let mut options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.location)
                .create_if_missing(config.create_if_missing)
        };

        if config.regexp {
            options = options.with_regexp();
        }

        Ok(options)
    }

    /// Close the store, releasing the connection
    ///
    /// Closing an already closed store does nothing.
    #[instrument(skip_all, fields(table = %self.config.table_name))]
    pub async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
            debug!("document store closed");
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Document columns the table currently has, in the order they were added
    pub fn columns(&self) -> &[String] {
        self.columns.names()
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Store a document as a new row, adding columns as needed
    ///
    /// Returns the row id of the new row. `Null` values are stored as SQL
    /// NULL and will be absent when the document is read back.
    #[instrument(skip_all, fields(table = %self.config.table_name))]
    pub async fn store(&mut self, document: &Document) -> Result<i64> {
        let conn = self.conn.as_mut().ok_or(DocumentStoreError::Closed)?;

        let columns = self
            .columns
            .ensure_columns(conn, &self.ddl, document)
            .await?;

        let insert_sql = self.statements.insert(&columns);
        debug!(sql = %insert_sql, "storing document");

        let mut query = sqlx::query(&insert_sql);
        for value in document.values() {
            query = query.bind(codec::encode_param(value));
        }

        let result = query.execute(&mut *conn).await?;
        Ok(result.last_insert_rowid())
    }

    /// Update every row matching `filters` (all rows if there are none)
    ///
    /// Returns the number of rows the UPDATE changed. When it changed none and
    /// `insert_if_missing` is set, the document is stored as a new row and the
    /// return value is still 0.
    ///
    /// The fallback insert is a separate statement, not an atomic upsert: two
    /// writers updating with the same unmatched filter can both insert.
    ///
    /// An empty document changes nothing and returns 0.
    #[instrument(skip_all, fields(table = %self.config.table_name, filters = filters.len()))]
    pub async fn update(
        &mut self,
        document: &Document,
        insert_if_missing: bool,
        filters: &[Filter],
    ) -> Result<u64> {
        let conn = self.conn.as_mut().ok_or(DocumentStoreError::Closed)?;
        let (where_clause, where_params) =
            Self::filter_clause(conn, &self.ddl, &mut self.columns, filters).await?;

        if document.is_empty() {
            debug!("nothing to update");
            return Ok(0);
        }

        let columns = self
            .columns
            .ensure_columns(conn, &self.ddl, document)
            .await?;

        let update_sql = self.statements.update(&columns, &where_clause);
        debug!(sql = %update_sql, "updating documents");

        let mut query = sqlx::query(&update_sql);
        for value in document.values() {
            query = query.bind(codec::encode_param(value));
        }
        for param in where_params {
            query = query.bind(param);
        }

        let affected = query.execute(&mut *conn).await?.rows_affected();

        if affected == 0 && insert_if_missing {
            debug!("no rows matched, inserting");
            self.store(document).await?;
        }

        Ok(affected)
    }

    /// Read every document matching `filters`, in the given order
    ///
    /// `Order::default()` sorts by row id, i.e. insertion order.
    pub async fn get(&mut self, filters: &[Filter], order: &Order) -> Result<Vec<Document>> {
        self.fetch(filters, order, None).await
    }

    /// Read documents with filters, ordering and pagination
    pub async fn query(&mut self, query: &Query) -> Result<Vec<Document>> {
        self.fetch(&query.filters, &query.order, query.page()).await
    }

    /// Count rows matching `filters`
    #[instrument(skip_all, fields(table = %self.config.table_name))]
    pub async fn count(&mut self, filters: &[Filter]) -> Result<i64> {
        let conn = self.conn.as_mut().ok_or(DocumentStoreError::Closed)?;
        let (where_clause, params) =
            Self::filter_clause(conn, &self.ddl, &mut self.columns, filters).await?;

        let count_sql = self.statements.count(&where_clause);
        let mut query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for param in params {
            query = query.bind(param);
        }

        let (count,) = query.fetch_one(&mut *conn).await?;
        Ok(count)
    }

    /// Delete rows matching `filters` (all rows if there are none)
    ///
    /// Columns are never removed.
    #[instrument(skip_all, fields(table = %self.config.table_name))]
    pub async fn delete(&mut self, filters: &[Filter]) -> Result<u64> {
        let conn = self.conn.as_mut().ok_or(DocumentStoreError::Closed)?;
        let (where_clause, params) =
            Self::filter_clause(conn, &self.ddl, &mut self.columns, filters).await?;

        let delete_sql = self.statements.delete(&where_clause);
        debug!(sql = %delete_sql, "deleting documents");

        let mut query = sqlx::query(&delete_sql);
        for param in params {
            query = query.bind(param);
        }

        Ok(query.execute(&mut *conn).await?.rows_affected())
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    #[instrument(skip_all, fields(table = %self.config.table_name))]
    async fn fetch(
        &mut self,
        filters: &[Filter],
        order: &Order,
        page: Option<(i64, i64)>,
    ) -> Result<Vec<Document>> {
        let conn = self.conn.as_mut().ok_or(DocumentStoreError::Closed)?;
        let (where_clause, params) =
            Self::filter_clause(conn, &self.ddl, &mut self.columns, filters).await?;
        let order_by = build_order_by(order, &self.columns);

        let select_sql = self
            .statements
            .select(&where_clause, &order_by, page.is_some());
        debug!(sql = %select_sql, "reading documents");

        let mut query = sqlx::query(&select_sql);
        for param in params {
            query = query.bind(param);
        }
        if let Some((limit, offset)) = page {
            query = query.bind(limit).bind(offset);
        }

        let rows = query.fetch_all(&mut *conn).await?;
        rows.iter().map(Self::row_to_document).collect()
    }

    /// Build the WHERE fragment for `filters`
    ///
    /// Operators are validated before anything runs. When a filter names a
    /// column this session does not know, the column set is reloaded first in
    /// case another session added it.
    async fn filter_clause(
        conn: &mut SqliteConnection,
        ddl: &DdlGenerator,
        columns: &mut ColumnSet,
        filters: &[Filter],
    ) -> Result<(String, Vec<Option<String>>)> {
        let built = build_where(filters, columns)?;
        if filters.iter().all(|f| columns.is_known(&f.column)) {
            return Ok(built);
        }

        columns.reload(conn, ddl).await?;
        build_where(filters, columns)
    }

    /// Rebuild a document from a row: the row id and NULL columns are dropped,
    /// everything else is decoded
    fn row_to_document(row: &SqliteRow) -> Result<Document> {
        let mut document = Document::new();

        for (index, column) in row.columns().iter().enumerate() {
            if column.name() == ROW_ID_COLUMN {
                continue;
            }

            let text: Option<String> = row.try_get_unchecked(index)?;
            if let Some(text) = text {
                document.insert(column.name().to_string(), codec::decode(&text));
            }
        }

        Ok(document)
    }
}
