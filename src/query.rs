//! Read requests for DocumentStore
//!
//! [`Query`] bundles filters, ordering and pagination for
//! [`DocumentStore::query`](crate::DocumentStore::query).

use crate::codec::Operand;
use crate::sql::condition::{Filter, Order};

/// Request to read documents
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Filters, all of which must match
    pub filters: Vec<Filter>,
    /// Result ordering (default: insertion order)
    pub order: Order,
    /// Maximum number of documents to return
    pub limit: Option<i64>,
    /// Number of documents to skip
    pub offset: i64,
}

impl Query {
    /// Create a query matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter clause
    pub fn filter(
        mut self,
        column: impl Into<String>,
        operator: impl Into<String>,
        operand: impl Into<Operand>,
    ) -> Self {
        self.filters.push(Filter::new(column, operator, operand));
        self
    }

    /// Replace the filters
    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    /// Set ordering
    pub fn with_order(mut self, order: impl Into<Order>) -> Self {
        self.order = order.into();
        self
    }

    /// Set pagination
    pub fn paginate(mut self, offset: i64, limit: i64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Set the maximum number of results
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the number of results to skip
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// `LIMIT ? OFFSET ?` values, if the query is paginated
    ///
    /// SQLite needs a LIMIT before OFFSET; `-1` means no limit.
    pub(crate) fn page(&self) -> Option<(i64, i64)> {
        if self.limit.is_none() && self.offset == 0 {
            None
        } else {
            Some((self.limit.unwrap_or(-1), self.offset))
        }
    }
}
