//! INSERT statement builder.

use super::clause::Column;
use super::{QueryError, QueryResult, Value};

/// Accumulates an INSERT with one or more value rows.
///
/// # Invariants
/// - No row is wider than the rows before it; only the last row may be
///   short while it is filled by `add_value`.
/// - When columns are set, every row width equals the column count.
/// - At most one of `OR IGNORE` / `OR REPLACE` is active.
#[derive(Debug, Clone)]
pub struct InsertQuery {
    table: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    ignore: bool,
    replace: bool,
}

impl InsertQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            ignore: false,
            replace: false,
        }
    }

    /// Requests `INSERT OR IGNORE`.
    ///
    /// # Errors
    /// - `QueryError::ConflictingModifier` when `OR REPLACE` is already set.
    pub fn set_ignore(&mut self) -> QueryResult<&mut Self> {
        if self.replace {
            return Err(QueryError::ConflictingModifier);
        }
        self.ignore = true;
        Ok(self)
    }

    pub fn unset_ignore(&mut self) -> &mut Self {
        self.ignore = false;
        self
    }

    /// Requests `INSERT OR REPLACE`.
    ///
    /// # Errors
    /// - `QueryError::ConflictingModifier` when `OR IGNORE` is already set.
    pub fn set_replace(&mut self) -> QueryResult<&mut Self> {
        if self.ignore {
            return Err(QueryError::ConflictingModifier);
        }
        self.replace = true;
        Ok(self)
    }

    pub fn unset_replace(&mut self) -> &mut Self {
        self.replace = false;
        self
    }

    /// Replaces the column list.
    ///
    /// # Errors
    /// - `QueryError::ArityMismatch` when existing rows have another width.
    pub fn set_columns(&mut self, columns: Vec<Column>) -> QueryResult<&mut Self> {
        if let Some(first) = self.rows.first() {
            if first.len() != columns.len() {
                return Err(QueryError::ArityMismatch {
                    expected: columns.len(),
                    actual: first.len(),
                });
            }
        }
        self.columns = columns;
        Ok(self)
    }

    /// Appends one column.
    ///
    /// # Errors
    /// - `QueryError::ArityMismatch` when existing rows do not already
    ///   carry a value for the new column.
    pub fn add_column(&mut self, column: Column) -> QueryResult<&mut Self> {
        let expected = self.columns.len() + 1;
        if let Some(first) = self.rows.first() {
            if first.len() != expected {
                return Err(QueryError::ArityMismatch {
                    expected,
                    actual: first.len(),
                });
            }
        }
        self.columns.push(column);
        Ok(self)
    }

    /// Appends one full value row.
    ///
    /// # Errors
    /// - `QueryError::ArityMismatch` when the row width differs from the
    ///   column count or from the previous row.
    pub fn set_values(&mut self, values: Vec<Value>) -> QueryResult<&mut Self> {
        if !self.columns.is_empty() && self.columns.len() != values.len() {
            return Err(QueryError::ArityMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        if let Some(previous) = self.rows.last() {
            if previous.len() != values.len() {
                return Err(QueryError::ArityMismatch {
                    expected: previous.len(),
                    actual: values.len(),
                });
            }
        }
        self.rows.push(values);
        Ok(self)
    }

    /// Appends one value to the current row, starting it when none exists.
    ///
    /// # Errors
    /// - `QueryError::ArityMismatch` when the row would exceed the column
    ///   count or the width of the previous row.
    pub fn add_value(&mut self, value: Value) -> QueryResult<&mut Self> {
        let current_width = self.rows.last().map_or(0, Vec::len);
        let limit = if self.columns.is_empty() {
            self.rows
                .len()
                .checked_sub(2)
                .map(|previous| self.rows[previous].len())
        } else {
            Some(self.columns.len())
        };
        if let Some(limit) = limit {
            if current_width + 1 > limit {
                return Err(QueryError::ArityMismatch {
                    expected: limit,
                    actual: current_width + 1,
                });
            }
        }
        match self.rows.last_mut() {
            Some(row) => row.push(value),
            None => self.rows.push(vec![value]),
        }
        Ok(self)
    }

    /// Renders `INSERT [OR ...] INTO <table> [(<columns>)] VALUES (...), ...;`.
    ///
    /// # Errors
    /// - `QueryError::MissingValues` when no row was supplied.
    /// - `QueryError::ArityMismatch` when a row is incomplete.
    pub fn build(self) -> QueryResult<String> {
        let Some(first) = self.rows.first() else {
            return Err(QueryError::MissingValues);
        };
        let width = if self.columns.is_empty() {
            first.len()
        } else {
            self.columns.len()
        };
        if let Some(row) = self.rows.iter().find(|row| row.len() != width) {
            return Err(QueryError::ArityMismatch {
                expected: width,
                actual: row.len(),
            });
        }

        let mut sql = String::from("INSERT ");
        if self.replace {
            sql.push_str("OR REPLACE ");
        }
        if self.ignore {
            sql.push_str("OR IGNORE ");
        }
        sql.push_str("INTO ");
        sql.push_str(&self.table);
        sql.push(' ');

        if !self.columns.is_empty() {
            let names = self
                .columns
                .iter()
                .map(Column::name)
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!("({names}) "));
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let cells = row.iter().map(Value::render).collect::<Vec<_>>();
                format!("({})", cells.join(", "))
            })
            .collect::<Vec<_>>();
        sql.push_str("VALUES ");
        sql.push_str(&rows.join(", "));
        sql.push(';');
        Ok(sql)
    }
}
