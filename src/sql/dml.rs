//! Statement generation for reading and writing document rows
//!
//! Only quoted identifiers, clause fragments produced by
//! [`build_where`](crate::sql::build_where) and SQL keywords are formatted into
//! the statement text. Values are always `?` placeholders.

use crate::sql::sanitize::quote_identifier;

/// Builds INSERT/UPDATE/SELECT/DELETE statements for one table
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    table: String,
}

impl StatementBuilder {
    /// Create a builder for the given (unquoted) table name
    pub fn new(table_name: &str) -> Self {
        Self {
            table: quote_identifier(table_name),
        }
    }

    /// INSERT with one placeholder per (quoted) column, bound in column order
    pub fn insert(&self, columns: &[String]) -> String {
        if columns.is_empty() {
            return format!("INSERT INTO {} DEFAULT VALUES", self.table);
        }

        let placeholders = vec!["?"; columns.len()];
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    /// UPDATE setting each (quoted) column; the SET values bind before the
    /// WHERE parameters
    pub fn update(&self, columns: &[String], where_clause: &str) -> String {
        let set_clauses: Vec<String> = columns.iter().map(|c| format!("{} = (?)", c)).collect();

        format!(
            "UPDATE {} SET {}{}",
            self.table,
            set_clauses.join(", "),
            Self::where_suffix(where_clause)
        )
    }

    /// SELECT every column, optionally with `LIMIT ? OFFSET ?` after the
    /// WHERE parameters
    pub fn select(&self, where_clause: &str, order_by: &str, paginate: bool) -> String {
        let mut sql = format!("SELECT * FROM {}{}", self.table, Self::where_suffix(where_clause));

        if !order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        if paginate {
            sql.push_str(" LIMIT ? OFFSET ?");
        }

        sql
    }

    pub fn count(&self, where_clause: &str) -> String {
        format!(
            "SELECT COUNT(*) FROM {}{}",
            self.table,
            Self::where_suffix(where_clause)
        )
    }

    pub fn delete(&self, where_clause: &str) -> String {
        format!("DELETE FROM {}{}", self.table, Self::where_suffix(where_clause))
    }

    fn where_suffix(where_clause: &str) -> String {
        if where_clause.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_clause)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| quote_identifier(n)).collect()
    }

    // ==================== INSERT ====================

    #[test]
    fn test_insert() {
        let builder = StatementBuilder::new("def");
        assert_eq!(
            builder.insert(&cols(&["n", "title"])),
            "INSERT INTO \"def\" (\"n\", \"title\") VALUES (?, ?)"
        );
    }

    #[test]
    fn test_insert_placeholder_count_matches_columns() {
        let builder = StatementBuilder::new("def");
        let sql = builder.insert(&cols(&["a", "b", "c", "d"]));
        assert_eq!(sql.matches('?').count(), 4);
    }

    #[test]
    fn test_insert_empty_document() {
        let builder = StatementBuilder::new("def");
        assert_eq!(builder.insert(&[]), "INSERT INTO \"def\" DEFAULT VALUES");
    }

    // ==================== UPDATE ====================

    #[test]
    fn test_update_without_where() {
        let builder = StatementBuilder::new("def");
        assert_eq!(
            builder.update(&cols(&["col1"]), ""),
            "UPDATE \"def\" SET \"col1\" = (?)"
        );
    }

    #[test]
    fn test_update_with_where() {
        let builder = StatementBuilder::new("def");
        assert_eq!(
            builder.update(&cols(&["col1", "col2"]), "\"col1\" == (?)"),
            "UPDATE \"def\" SET \"col1\" = (?), \"col2\" = (?) WHERE \"col1\" == (?)"
        );
    }

    // ==================== SELECT ====================

    #[test]
    fn test_select_all() {
        let builder = StatementBuilder::new("def");
        assert_eq!(builder.select("", "", false), "SELECT * FROM \"def\"");
    }

    #[test]
    fn test_select_full() {
        let builder = StatementBuilder::new("def");
        assert_eq!(
            builder.select("\"n\" == (?)", "\"Id\"", true),
            "SELECT * FROM \"def\" WHERE \"n\" == (?) ORDER BY \"Id\" LIMIT ? OFFSET ?"
        );
    }

    // ==================== COUNT / DELETE ====================

    #[test]
    fn test_count() {
        let builder = StatementBuilder::new("def");
        assert_eq!(builder.count(""), "SELECT COUNT(*) FROM \"def\"");
        assert_eq!(
            builder.count("\"a\" IS (?)"),
            "SELECT COUNT(*) FROM \"def\" WHERE \"a\" IS (?)"
        );
    }

    #[test]
    fn test_delete() {
        let builder = StatementBuilder::new("t\"x");
        assert_eq!(
            builder.delete("\"a\" = (?)"),
            "DELETE FROM \"t\"\"x\" WHERE \"a\" = (?)"
        );
    }
}
