//! Configuration for DocumentStore
//!
//! Provides a builder pattern for configuring the document store.

/// Location that opens a private, non-persistent database
pub const IN_MEMORY: &str = ":memory:";

/// Table used when none is configured
pub const DEFAULT_TABLE_NAME: &str = "def";

/// Configuration for the document store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database file path, or `:memory:`
    pub location: String,
    /// Name of the table backing the store (default: "def")
    pub table_name: String,
    /// Whether to create the database file if it does not exist
    pub create_if_missing: bool,
    /// Whether to register the REGEXP function on the connection
    pub regexp: bool,
}

impl StoreConfig {
    /// Create a new configuration builder
    pub fn builder(location: impl Into<String>) -> StoreConfigBuilder {
        StoreConfigBuilder::new(location)
    }

    /// In-memory store with the default table
    pub fn in_memory() -> Self {
        StoreConfigBuilder::new(IN_MEMORY).build()
    }

    /// Whether this configuration points at a non-persistent database
    pub fn is_in_memory(&self) -> bool {
        self.location == IN_MEMORY
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Builder for StoreConfig
#[derive(Debug)]
pub struct StoreConfigBuilder {
    location: String,
    table_name: String,
    create_if_missing: bool,
    regexp: bool,
}

impl StoreConfigBuilder {
    /// Create a new builder with the database location
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            create_if_missing: true,
            regexp: true,
        }
    }

    /// Set the table name (default: "def")
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Create the database file when missing (default: true)
    pub fn create_if_missing(mut self, enabled: bool) -> Self {
        self.create_if_missing = enabled;
        self
    }

    /// Enable or disable the REGEXP operator (default: true)
    pub fn regexp(mut self, enabled: bool) -> Self {
        self.regexp = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> StoreConfig {
        StoreConfig {
            location: self.location,
            table_name: self.table_name,
            create_if_missing: self.create_if_missing,
            regexp: self.regexp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // StoreConfig Default Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();

        assert_eq!(config.location, ":memory:");
        assert_eq!(config.table_name, "def");
        assert!(config.create_if_missing);
        assert!(config.regexp);
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_builder_accepts_string() {
        let config = StoreConfig::builder(String::from("data.db")).build();
        assert_eq!(config.location, "data.db");
        assert!(!config.is_in_memory());
    }

    // =========================================================================
    // Table Name Tests
    // =========================================================================

    #[test]
    fn test_custom_table_name() {
        let config = StoreConfig::builder("data.db")
            .table_name("table_of_random_stuff")
            .build();

        assert_eq!(config.table_name, "table_of_random_stuff");
    }

    #[test]
    fn test_table_name_is_not_validated() {
        // Any string is a legal table name once quoted
        let config = StoreConfig::builder(IN_MEMORY)
            .table_name("my \"odd\" table; --")
            .build();

        assert_eq!(config.table_name, "my \"odd\" table; --");
    }

    // =========================================================================
    // Connection Option Tests
    // =========================================================================

    #[test]
    fn test_create_if_missing_disabled() {
        let config = StoreConfig::builder("data.db")
            .create_if_missing(false)
            .build();

        assert!(!config.create_if_missing);
    }

    #[test]
    fn test_regexp_disabled() {
        let config = StoreConfig::builder(IN_MEMORY).regexp(false).build();
        assert!(!config.regexp);
    }

    #[test]
    fn test_builder_order_independence() {
        let config1 = StoreConfig::builder("data.db")
            .regexp(false)
            .table_name("custom")
            .build();

        let config2 = StoreConfig::builder("data.db")
            .table_name("custom")
            .regexp(false)
            .build();

        assert_eq!(config1.table_name, config2.table_name);
        assert_eq!(config1.regexp, config2.regexp);
    }

    #[test]
    fn test_builder_debug() {
        let builder = StoreConfig::builder(IN_MEMORY);
        let debug_str = format!("{:?}", builder);
        assert!(debug_str.contains("StoreConfigBuilder"));
    }
}
