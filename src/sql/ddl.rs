//! DDL (Data Definition Language) Generation
//!
//! Generates the SQLite statements that create the document table and grow
//! its column set.

use crate::schema::ROW_ID_COLUMN;
use crate::sql::sanitize::quote_identifier;

/// DDL Generator for a single document table
#[derive(Debug, Clone)]
pub struct DdlGenerator {
    table: String,
}

impl DdlGenerator {
    /// Create a new DDL generator for the given (unquoted) table name
    pub fn new(table_name: &str) -> Self {
        Self {
            table: quote_identifier(table_name),
        }
    }

    /// The quoted table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Generate CREATE TABLE statement
    ///
    /// The table starts with only the row id column; every other column is
    /// added on demand.
    pub fn generate_create_table(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({} INTEGER PRIMARY KEY AUTOINCREMENT)",
            self.table,
            quote_identifier(ROW_ID_COLUMN)
        )
    }

    /// Generate ALTER TABLE ADD COLUMN statement
    ///
    /// Columns are declared without a type, so values keep the storage class
    /// they were bound with.
    pub fn generate_add_column(&self, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.table,
            quote_identifier(column_name)
        )
    }

    /// Generate the PRAGMA that lists the table's columns
    pub fn generate_table_info(&self) -> String {
        format!("PRAGMA table_info({})", self.table)
    }
}
