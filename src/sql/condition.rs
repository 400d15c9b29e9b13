//! Filter and ordering clauses for SQL statements
//!
//! Filters are `(column, operator, operand)` triples. The operator must come
//! from a fixed allow-list, the column is always quoted, and the operand is
//! always a bound parameter.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::codec::Operand;
use crate::error::{DocumentStoreError, Result};
use crate::schema::ColumnSet;
use crate::sql::sanitize::quote_identifier;

/// Operators permitted in filter clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Concat,
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    ShiftLeft,
    ShiftRight,
    BitAnd,
    BitOr,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    EqEq,
    Ne,
    LtGt,
    Is,
    IsNot,
    In,
    Like,
    Glob,
    Match,
    Regexp,
}

impl Operator {
    /// Every allowed operator
    pub const ALL: [Operator; 25] = [
        Operator::Concat,
        Operator::Multiply,
        Operator::Divide,
        Operator::Modulo,
        Operator::Add,
        Operator::Subtract,
        Operator::ShiftLeft,
        Operator::ShiftRight,
        Operator::BitAnd,
        Operator::BitOr,
        Operator::Lt,
        Operator::Lte,
        Operator::Gt,
        Operator::Gte,
        Operator::Eq,
        Operator::EqEq,
        Operator::Ne,
        Operator::LtGt,
        Operator::Is,
        Operator::IsNot,
        Operator::In,
        Operator::Like,
        Operator::Glob,
        Operator::Match,
        Operator::Regexp,
    ];

    /// SQL spelling of the operator
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Concat => "||",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Eq => "=",
            Operator::EqEq => "==",
            Operator::Ne => "!=",
            Operator::LtGt => "<>",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::In => "IN",
            Operator::Like => "LIKE",
            Operator::Glob => "GLOB",
            Operator::Match => "MATCH",
            Operator::Regexp => "REGEXP",
        }
    }
}

impl FromStr for Operator {
    type Err = DocumentStoreError;

    /// Matching is exact and case-sensitive
    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_sql() == s)
            .ok_or_else(|| DocumentStoreError::invalid_operator(s))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

// ============================================================================
// WHERE
// ============================================================================

/// One `(column, operator, operand)` filter
///
/// The operator is kept as given and validated when the clause is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub operator: String,
    pub operand: Operand,
}

impl Filter {
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        operand: impl Into<Operand>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            operand: operand.into(),
        }
    }

    /// `column == operand`
    pub fn eq(column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Self::new(column, Operator::EqEq.as_sql(), operand)
    }

    /// `column != operand`
    pub fn ne(column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Self::new(column, Operator::Ne.as_sql(), operand)
    }

    /// `column LIKE pattern`, with the pattern passed raw
    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(column, Operator::Like.as_sql(), Operand::raw(pattern))
    }
}

/// Build a WHERE fragment (without the keyword) and its bound parameters
///
/// Clauses are joined with AND in the order given. No filters produce an
/// empty fragment. If any operator is not allowed, nothing is built.
///
/// A column the table does not have is compared as `NULL`, which is what a
/// document without that key holds. Quoting it instead would let SQLite read
/// the name as a string literal.
///
/// # Example
/// ```
/// use runtara_document_store::ColumnSet;
/// use runtara_document_store::sql::{Filter, build_where};
///
/// let columns = ColumnSet::from_names(["n".to_string()]);
///
/// let (clause, params) = build_where(&[Filter::eq("n", 2)], &columns).unwrap();
/// assert_eq!(clause, "\"n\" == (?)");
/// assert_eq!(params, vec![Some("2".to_string())]);
///
/// let (clause, _) = build_where(&[Filter::eq("missing", 2)], &columns).unwrap();
/// assert_eq!(clause, "NULL == (?)");
/// ```
pub fn build_where(
    filters: &[Filter],
    columns: &ColumnSet,
) -> Result<(String, Vec<Option<String>>)> {
    let operators = filters
        .iter()
        .map(|f| f.operator.parse::<Operator>())
        .collect::<Result<Vec<_>>>()?;

    let mut clauses = Vec::with_capacity(filters.len());
    let mut params = Vec::with_capacity(filters.len());

    for (filter, operator) in filters.iter().zip(operators) {
        let column = if columns.is_known(&filter.column) {
            quote_identifier(&filter.column)
        } else {
            debug!(column = %filter.column, "filter column does not exist, comparing NULL");
            "NULL".to_string()
        };
        clauses.push(format!("{} {} (?)", column, operator.as_sql()));
        params.push(filter.operand.encode());
    }

    Ok((clauses.join(" AND "), params))
}

// ============================================================================
// ORDER BY
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Parse a direction token; only exactly `ASC` or `DESC` qualify
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "ASC" => Some(Direction::Asc),
            "DESC" => Some(Direction::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A column to sort by, with an optional direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub column: String,
    pub direction: Option<Direction>,
}

impl OrderKey {
    pub fn new(column: impl Into<String>, direction: Option<Direction>) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Ordering for `get`; defaults to the row id, which is insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    keys: Vec<OrderKey>,
}

impl Default for Order {
    fn default() -> Self {
        Order::by(crate::schema::ROW_ID_COLUMN)
    }
}

impl Order {
    /// No ordering at all
    pub fn none() -> Self {
        Self { keys: Vec::new() }
    }

    /// Sort by a column, engine default direction
    pub fn by(column: impl Into<String>) -> Self {
        Self::none().then_by(column)
    }

    /// Sort by a column in the given direction
    pub fn by_direction(column: impl Into<String>, direction: Direction) -> Self {
        Self::none().then_by_direction(column, direction)
    }

    pub fn then_by(mut self, column: impl Into<String>) -> Self {
        self.keys.push(OrderKey::new(column, None));
        self
    }

    pub fn then_by_direction(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.keys.push(OrderKey::new(column, Some(direction)));
        self
    }

    /// Parse a token list such as `["title", "DESC", "n"]`
    ///
    /// A token that is exactly `ASC` or `DESC` directly after an undirected
    /// column sets that column's direction. Every other token is a column.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut keys: Vec<OrderKey> = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            match (Direction::parse(token), keys.last_mut()) {
                (Some(direction), Some(last)) if last.direction.is_none() => {
                    last.direction = Some(direction);
                }
                _ => keys.push(OrderKey::new(token, None)),
            }
        }
        Self { keys }
    }

    pub fn keys(&self) -> &[OrderKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<&str> for Order {
    fn from(column: &str) -> Self {
        Order::by(column)
    }
}

impl From<(&str, Direction)> for Order {
    fn from((column, direction): (&str, Direction)) -> Self {
        Order::by_direction(column, direction)
    }
}

/// Build an ORDER BY fragment (without the keyword)
///
/// Columns the table does not have are skipped with a warning. If nothing is
/// left the fragment is empty.
pub fn build_order_by(order: &Order, columns: &ColumnSet) -> String {
    let mut parts = Vec::with_capacity(order.keys.len());

    for key in &order.keys {
        if !columns.is_known(&key.column) {
            warn!(column = %key.column, "ignoring unknown sort column");
            continue;
        }

        match key.direction {
            Some(direction) => parts.push(format!(
                "{} {}",
                quote_identifier(&key.column),
                direction.as_sql()
            )),
            None => parts.push(quote_identifier(&key.column)),
        }
    }

    parts.join(", ")
}
