//! DELETE statement builder.

use super::clause::{Column, Predicate};
use super::{where_sql, QueryError, QueryResult, Value};

/// Accumulates a DELETE over one table.
///
/// A DELETE without predicates removes every row. `build()` refuses to
/// render one unless `allow_full_table()` was called first.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    table: String,
    predicates: Vec<Predicate>,
    full_table: bool,
}

impl DeleteQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
            full_table: false,
        }
    }

    pub fn set_where(
        &mut self,
        table: impl Into<String>,
        column: Column,
        operator: impl Into<String>,
        value: Value,
        connective: impl Into<String>,
    ) -> &mut Self {
        self.predicates
            .push(Predicate::new(table, column, operator, value, connective));
        self
    }

    /// Permits rendering `DELETE FROM <table>;`.
    pub fn allow_full_table(&mut self) -> &mut Self {
        self.full_table = true;
        self
    }

    /// # Errors
    /// - `QueryError::MissingPredicate` when unscoped without opt-in.
    pub fn build(self) -> QueryResult<String> {
        if self.predicates.is_empty() {
            if !self.full_table {
                return Err(QueryError::MissingPredicate);
            }
            return Ok(format!("DELETE FROM {};", self.table));
        }
        Ok(format!(
            "DELETE FROM {} WHERE {};",
            self.table,
            where_sql(&self.predicates)
        ))
    }
}
