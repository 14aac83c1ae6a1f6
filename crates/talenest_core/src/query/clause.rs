//! Column, predicate, join and order fragments.

use super::{QueryError, QueryResult, Value};

/// Table column reference with optional output alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    alias: Option<String>,
}

impl Column {
    /// Creates a column without alias.
    ///
    /// # Errors
    /// - `QueryError::InvalidColumn` when `name` is empty.
    pub fn new(name: impl Into<String>) -> QueryResult<Self> {
        Self::build(name.into(), None)
    }

    /// Creates a column rendered as `name AS alias`.
    ///
    /// An empty alias is treated as no alias.
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> QueryResult<Self> {
        let alias = alias.into();
        Self::build(name.into(), (!alias.is_empty()).then_some(alias))
    }

    fn build(name: String, alias: Option<String>) -> QueryResult<Self> {
        if name.is_empty() {
            return Err(QueryError::InvalidColumn);
        }
        Ok(Self { name, alias })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `name AS alias` when aliased, else `name`.
    pub fn display(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {alias}", self.name),
            None => self.name.clone(),
        }
    }

    /// Output identifier: the alias when present, else the name.
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Converts static column names into columns.
///
/// # Errors
/// - `QueryError::InvalidColumn` when any name is empty.
pub fn to_columns(names: &[&str]) -> QueryResult<Vec<Column>> {
    names.iter().map(|name| Column::new(*name)).collect()
}

/// Comma-separated column list, or `*` when empty.
pub fn columns_sql(columns: &[Column]) -> String {
    if columns.is_empty() {
        return "*".to_string();
    }
    columns
        .iter()
        .map(Column::display)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One comparison fragment of a WHERE clause.
///
/// Operator and connective are embedded verbatim; no vocabulary check is
/// performed. The connective links this predicate to the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    table: String,
    column: Column,
    operator: String,
    value: Value,
    connective: String,
}

impl Predicate {
    pub fn new(
        table: impl Into<String>,
        column: Column,
        operator: impl Into<String>,
        value: Value,
        connective: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column,
            operator: operator.into(),
            value,
            connective: connective.into(),
        }
    }

    pub fn connective(&self) -> &str {
        &self.connective
    }

    pub fn render(&self) -> String {
        format!(
            "{}.{} {} {}",
            self.table,
            self.column.display(),
            self.operator,
            self.value.render()
        )
    }
}

/// One `<KIND> JOIN` fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    source_table: String,
    source_column: String,
    target_table: String,
    target_column: String,
    kind: String,
}

impl Join {
    pub fn new(
        source_table: impl Into<String>,
        source_column: &Column,
        target_table: impl Into<String>,
        target_column: &Column,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: source_column.reference().to_string(),
            target_table: target_table.into(),
            target_column: target_column.reference().to_string(),
            kind: kind.into(),
        }
    }

    /// Renders with a trailing space so fragments concatenate directly.
    pub fn render(&self) -> String {
        format!(
            "{} JOIN {} ON {}.{} = {}.{} ",
            self.kind,
            self.target_table,
            self.source_table,
            self.source_column,
            self.target_table,
            self.target_column
        )
    }
}

/// `ORDER BY` clause over one or more output identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    columns: Vec<Column>,
    direction: String,
}

impl Order {
    pub fn new(columns: Vec<Column>, direction: impl Into<String>) -> Self {
        Self {
            columns,
            direction: direction.into(),
        }
    }

    pub fn render(&self) -> String {
        let references = self
            .columns
            .iter()
            .map(Column::reference)
            .collect::<Vec<_>>()
            .join(", ");
        format!("ORDER BY {references} {}", self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::{columns_sql, to_columns, Column, Join, Order, Predicate};
    use crate::query::{QueryError, Value};

    #[test]
    fn column_rejects_empty_name() {
        assert_eq!(Column::new("").unwrap_err(), QueryError::InvalidColumn);
        assert_eq!(
            Column::aliased("", "alias").unwrap_err(),
            QueryError::InvalidColumn
        );
        assert!(to_columns(&["id", ""]).is_err());
    }

    #[test]
    fn column_display_and_reference_follow_alias() {
        let plain = Column::new("name").unwrap();
        assert_eq!(plain.display(), "name");
        assert_eq!(plain.reference(), "name");

        let aliased = Column::aliased("name", "tale_name").unwrap();
        assert_eq!(aliased.display(), "name AS tale_name");
        assert_eq!(aliased.reference(), "tale_name");

        let empty_alias = Column::aliased("name", "").unwrap();
        assert_eq!(empty_alias.display(), "name");
    }

    #[test]
    fn columns_sql_defaults_to_star() {
        assert_eq!(columns_sql(&[]), "*");
        assert_eq!(
            columns_sql(&to_columns(&["id", "name"]).unwrap()),
            "id, name"
        );
    }

    #[test]
    fn predicate_renders_table_qualified_fragment() {
        let predicate = Predicate::new(
            "tales",
            Column::new("name").unwrap(),
            "LIKE",
            Value::string("dragon%"),
            "AND",
        );
        assert_eq!(predicate.render(), "tales.name LIKE 'dragon%'");
    }

    #[test]
    fn join_renders_with_trailing_space() {
        let join = Join::new(
            "tag",
            &Column::new("id").unwrap(),
            "tale_tag",
            &Column::new("tag_id").unwrap(),
            "INNER",
        );
        assert_eq!(
            join.render(),
            "INNER JOIN tale_tag ON tag.id = tale_tag.tag_id "
        );
    }

    #[test]
    fn order_uses_column_references() {
        let order = Order::new(
            vec![
                Column::aliased("name", "n").unwrap(),
                Column::new("id").unwrap(),
            ],
            "DESC",
        );
        assert_eq!(order.render(), "ORDER BY n, id DESC");
    }
}
