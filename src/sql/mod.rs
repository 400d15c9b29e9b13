//! SQL utilities for Document Store
//!
//! Provides identifier quoting, clause building, and statement generation.

pub mod condition;
pub mod ddl;
pub mod dml;
pub mod sanitize;

pub use condition::{Direction, Filter, Operator, Order, OrderKey, build_order_by, build_where};
pub use ddl::DdlGenerator;
pub use dml::StatementBuilder;
pub use sanitize::{check_reserved, quote_identifier};
