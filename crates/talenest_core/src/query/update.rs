//! UPDATE statement builder.

use super::clause::{Column, Predicate};
use super::{where_sql, QueryError, QueryResult, Value};

/// Accumulates an UPDATE over one table.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    table: String,
    columns: Vec<Column>,
    values: Vec<Value>,
    predicates: Vec<Predicate>,
    full_table: bool,
}

impl UpdateQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            predicates: Vec::new(),
            full_table: false,
        }
    }

    /// Replaces the whole assignment list.
    ///
    /// # Errors
    /// - `QueryError::ArityMismatch` when lengths differ; prior state is kept.
    pub fn set_new_values(
        &mut self,
        columns: Vec<Column>,
        values: Vec<Value>,
    ) -> QueryResult<&mut Self> {
        if columns.len() != values.len() {
            return Err(QueryError::ArityMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }
        self.columns = columns;
        self.values = values;
        Ok(self)
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

    /// Permits rendering without predicates, updating every row.
    pub fn allow_full_table(&mut self) -> &mut Self {
        self.full_table = true;
        self
    }

    /// Renders `UPDATE <table> SET c = v, ... [WHERE ...];`.
    ///
    /// # Errors
    /// - `QueryError::MissingValues` when no assignment was set.
    /// - `QueryError::MissingPredicate` when unscoped without opt-in.
    pub fn build(self) -> QueryResult<String> {
        if self.columns.is_empty() {
            return Err(QueryError::MissingValues);
        }
        if self.predicates.is_empty() && !self.full_table {
            return Err(QueryError::MissingPredicate);
        }

        let assignments = self
            .columns
            .iter()
            .zip(&self.values)
            .map(|(column, value)| format!("{} = {}", column.reference(), value.render()))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("UPDATE {} SET {assignments}", self.table);
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql(&self.predicates));
        }
        sql.push(';');
        Ok(sql)
    }
}
