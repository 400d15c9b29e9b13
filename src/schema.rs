//! Tracked column set of a document table
//!
//! The table grows one column per distinct document key. [`ColumnSet`] mirrors
//! the persisted columns for the lifetime of an open store: it is loaded from
//! the table definition on open and only extended after the `ALTER TABLE`
//! statements that add columns have committed.

use std::collections::HashSet;

use sqlx::{Connection, Row, SqliteConnection};
use tracing::debug;

use crate::error::{DocumentStoreError, Result};
use crate::sql::ddl::DdlGenerator;
use crate::sql::sanitize::{check_reserved, quote_identifier};
use crate::value::Document;

/// Implicit auto-incrementing row identifier column
pub const ROW_ID_COLUMN: &str = "Id";

/// Ordered set of the table's document columns (row id excluded)
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    names: Vec<String>,
    index: HashSet<String>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from known column names, skipping duplicates and the row id
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut set = Self::new();
        for name in names {
            set.insert(name);
        }
        set
    }

    /// Read the persisted columns of the table
    pub async fn load(conn: &mut SqliteConnection, ddl: &DdlGenerator) -> Result<Self> {
        let rows = sqlx::query(&ddl.generate_table_info())
            .fetch_all(&mut *conn)
            .await?;

        let names = rows
            .iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let set = Self::from_names(names);
        debug!(columns = set.len(), "loaded column set");
        Ok(set)
    }

    /// Re-read the persisted columns, picking up any another session added
    pub async fn reload(&mut self, conn: &mut SqliteConnection, ddl: &DdlGenerator) -> Result<()> {
        *self = Self::load(conn, ddl).await?;
        Ok(())
    }

    fn insert(&mut self, name: String) -> bool {
        if name == ROW_ID_COLUMN || self.index.contains(&name) {
            return false;
        }
        self.index.insert(name.clone());
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Whether `name` is an existing column: a document column or the row id
    pub fn is_known(&self, name: &str) -> bool {
        name == ROW_ID_COLUMN || self.contains(name)
    }

    /// Column names in the order they were added
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Make sure every key of `document` has a column
    ///
    /// Missing columns are added in one transaction that commits before this
    /// returns. If adding fails, the set is reloaded and the add retried once,
    /// since another session may have added the column in the meantime.
    /// Returns the quoted identifiers of the document's keys, in document order.
    pub async fn ensure_columns(
        &mut self,
        conn: &mut SqliteConnection,
        ddl: &DdlGenerator,
        document: &Document,
    ) -> Result<Vec<String>> {
        for key in document.keys() {
            check_reserved(key, &[ROW_ID_COLUMN]).map_err(DocumentStoreError::validation)?;
        }

        match self.add_missing(conn, ddl, document).await {
            Err(DocumentStoreError::SchemaMutation { column, source }) => {
                debug!(column = %column, error = %source, "adding column failed, reloading");
                self.reload(conn, ddl).await?;
                self.add_missing(conn, ddl, document).await?;
            }
            result => result?,
        }

        Ok(document.keys().map(|k| quote_identifier(k)).collect())
    }

    async fn add_missing(
        &mut self,
        conn: &mut SqliteConnection,
        ddl: &DdlGenerator,
        document: &Document,
    ) -> Result<()> {
        let missing: Vec<&String> = document.keys().filter(|k| !self.contains(k)).collect();
        if missing.is_empty() {
            return Ok(());
        }

        let mut tx = conn.begin().await?;
        for key in &missing {
            debug!(column = %key, "adding column");
            sqlx::query(&ddl.generate_add_column(key))
                .execute(&mut *tx)
                .await
                .map_err(|e| DocumentStoreError::schema_mutation(key.as_str(), e))?;
        }
        tx.commit().await?;

        for key in missing {
            self.insert(key.clone());
        }
        Ok(())
    }
}
