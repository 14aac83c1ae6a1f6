//! String-free SQL statement construction.
//!
//! # Responsibility
//! - Render SELECT/INSERT/UPDATE/DELETE text from typed parts.
//! - Keep literal values and `?` placeholder tokens on one code path.
//!
//! # Invariants
//! - Builders are consumed by `build()`; a rendered builder cannot be
//!   extended or rendered again.
//! - WHERE connectives are separators between predicates, never suffixes.
//! - UPDATE/DELETE without predicates require `allow_full_table()`.
//! - Identifiers are embedded verbatim: table and column names must be
//!   static, trusted strings.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod clause;
mod delete;
mod insert;
mod select;
pub mod statements;
mod update;
mod value;

pub use clause::{columns_sql, to_columns, Column, Join, Order, Predicate};
pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use update::UpdateQuery;
pub use value::{placeholders, Value, DATETIME_FORMAT, PLACEHOLDER};

pub type QueryResult<T> = Result<T, QueryError>;

/// Builder misuse detected while configuring or rendering a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Column identifier was empty.
    InvalidColumn,
    /// Column and value counts disagree.
    ArityMismatch { expected: usize, actual: usize },
    /// `OR IGNORE` and `OR REPLACE` were both requested.
    ConflictingModifier,
    /// INSERT without any value row, or UPDATE without assignments.
    MissingValues,
    /// UPDATE/DELETE without predicates and without full-table opt-in.
    MissingPredicate,
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColumn => write!(f, "column name cannot be empty"),
            Self::ArityMismatch { expected, actual } => write!(
                f,
                "arity mismatch: expected {expected} values, got {actual}"
            ),
            Self::ConflictingModifier => {
                write!(f, "OR IGNORE and OR REPLACE cannot be combined")
            }
            Self::MissingValues => write!(f, "statement has no values to write"),
            Self::MissingPredicate => write!(
                f,
                "statement has no WHERE clause; call allow_full_table() to target every row"
            ),
        }
    }
}

impl Error for QueryError {}

pub(crate) fn where_sql(predicates: &[Predicate]) -> String {
    let mut sql = String::new();
    for (index, predicate) in predicates.iter().enumerate() {
        if index > 0 {
            sql.push(' ');
            sql.push_str(predicate.connective());
            sql.push(' ');
        }
        sql.push_str(&predicate.render());
    }
    sql
}
