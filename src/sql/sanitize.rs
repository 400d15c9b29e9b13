//! SQL Identifier Sanitization Utilities
//!
//! Document keys are untrusted. Instead of rejecting characters, every
//! identifier is quoted so that no key can end the identifier early.

/// Quote a SQL identifier to make it safe for use in queries
///
/// # Arguments
/// * `identifier` - The identifier to quote
///
/// # Returns
/// The identifier wrapped in double quotes with escaped internal quotes
///
/// # Example
/// ```
/// use runtara_document_store::sql::quote_identifier;
///
/// let quoted = quote_identifier("my_table");
/// assert_eq!(quoted, "\"my_table\"");
///
/// let hostile = quote_identifier("\"; DROP TABLE x; --");
/// assert_eq!(hostile, "\"\"\"; DROP TABLE x; --\"");
/// ```
pub fn quote_identifier(identifier: &str) -> String {
    // Escape any double quotes in the identifier by doubling them
    let escaped = identifier.replace('"', "\"\"");
    format!("\"{}\"", escaped)
}

/// Reject a document key that collides with a store-managed column
///
/// SQLite compares identifiers without regard to ASCII case, so neither may
/// a key that differs from a reserved column only in case.
///
/// # Example
/// ```
/// use runtara_document_store::sql::check_reserved;
///
/// assert!(check_reserved("title", &["Id"]).is_ok());
/// assert!(check_reserved("Id", &["Id"]).is_err());
/// assert!(check_reserved("ID", &["Id"]).is_err());
/// ```
pub fn check_reserved(key: &str, reserved_columns: &[&str]) -> Result<(), String> {
    if reserved_columns.iter().any(|r| r.eq_ignore_ascii_case(key)) {
        return Err(format!(
            "Column name '{}' is reserved and cannot be used.",
            key
        ));
    }

    Ok(())
}
