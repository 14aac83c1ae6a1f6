//! SELECT statement builder.

use super::clause::{columns_sql, Column, Join, Order, Predicate};
use super::{where_sql, Value};

/// Accumulates a SELECT over one table.
///
/// Render order is fixed:
/// `SELECT [DISTINCT] <columns> FROM <table> [<joins>] [WHERE ...] [ORDER BY ...];`
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: String,
    columns: Vec<Column>,
    distinct: bool,
    predicates: Vec<Predicate>,
    joins: Vec<Join>,
    order: Option<Order>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            distinct: false,
            predicates: Vec::new(),
            joins: Vec::new(),
            order: None,
        }
    }

    /// Replaces the projected columns. An empty list selects `*`.
    pub fn set_columns(&mut self, columns: Vec<Column>) -> &mut Self {
        self.columns = columns;
        self
    }

    pub fn set_distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Appends one predicate; `connective` links it to the previous one.
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

    /// Appends one join; repeated calls render in insertion order.
    pub fn set_join(
        &mut self,
        source_table: impl Into<String>,
        source_column: &Column,
        target_table: impl Into<String>,
        target_column: &Column,
        kind: impl Into<String>,
    ) -> &mut Self {
        self.joins.push(Join::new(
            source_table,
            source_column,
            target_table,
            target_column,
            kind,
        ));
        self
    }

    /// Sets the ordering; the last call wins.
    pub fn order_by(&mut self, columns: Vec<Column>, direction: impl Into<String>) -> &mut Self {
        self.order = Some(Order::new(columns, direction));
        self
    }

    pub fn build(self) -> String {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&columns_sql(&self.columns));
        sql.push_str(" FROM ");
        sql.push_str(&self.table);
        sql.push(' ');

        for join in &self.joins {
            sql.push_str(&join.render());
        }

        if !self.predicates.is_empty() {
            sql.push_str("WHERE ");
            sql.push_str(&where_sql(&self.predicates));
            sql.push(' ');
        }

        if let Some(order) = &self.order {
            sql.push_str(&order.render());
        }

        let mut sql = sql.trim_end().to_string();
        sql.push(';');
        sql
    }
}
