//! Canonical per-table CRUD statements.
//!
//! Every helper renders parameterized text with `?` tokens only, so the
//! same statement can be compiled once and bound many times.

use super::{
    placeholders, to_columns, Column, DeleteQuery, InsertQuery, QueryResult, SelectQuery,
    UpdateQuery, Value,
};

/// Identity column shared by every entity table.
pub const ID_COLUMN: &str = "id";

/// `INSERT INTO <table> (<columns>) VALUES (?, ...);`
pub fn create_sql(table: &str, columns: &[&str]) -> QueryResult<String> {
    let mut query = InsertQuery::new(table);
    query.set_columns(to_columns(columns)?)?;
    query.set_values(placeholders(columns.len()))?;
    query.build()
}

/// `SELECT <columns> FROM <table> WHERE <table>.id = ?;`
pub fn read_by_id_sql(table: &str, columns: &[&str]) -> QueryResult<String> {
    read_by_column_sql(table, columns, ID_COLUMN)
}

/// `SELECT <columns> FROM <table> ORDER BY id ASC;`
pub fn read_all_sql(table: &str, columns: &[&str]) -> QueryResult<String> {
    let mut query = SelectQuery::new(table);
    query
        .set_columns(to_columns(columns)?)
        .order_by(vec![Column::new(ID_COLUMN)?], "ASC");
    Ok(query.build())
}

/// `SELECT <columns> FROM <table> WHERE <table>.<column> = ? ORDER BY id ASC;`
///
/// Used for identity lookups and foreign-key scoped reads.
pub fn read_by_column_sql(table: &str, columns: &[&str], column: &str) -> QueryResult<String> {
    let mut query = SelectQuery::new(table);
    query
        .set_columns(to_columns(columns)?)
        .set_where(table, Column::new(column)?, "=", Value::placeholder(), "");
    if column != ID_COLUMN {
        query.order_by(vec![Column::new(ID_COLUMN)?], "ASC");
    }
    Ok(query.build())
}

/// `UPDATE <table> SET <col> = ?, ... WHERE <table>.id = ?;`
pub fn update_sql(table: &str, columns: &[&str]) -> QueryResult<String> {
    let mut query = UpdateQuery::new(table);
    query
        .set_new_values(to_columns(columns)?, placeholders(columns.len()))?
        .set_where(table, Column::new(ID_COLUMN)?, "=", Value::placeholder(), "");
    query.build()
}

/// `DELETE FROM <table> WHERE <table>.id = ?;`
pub fn delete_sql(table: &str) -> QueryResult<String> {
    let mut query = DeleteQuery::new(table);
    query.set_where(table, Column::new(ID_COLUMN)?, "=", Value::placeholder(), "");
    query.build()
}

#[cfg(test)]
mod tests {
    use super::{create_sql, delete_sql, read_all_sql, read_by_column_sql, read_by_id_sql, update_sql};

    const COLUMNS: &[&str] = &["id", "name", "color"];

    #[test]
    fn canonical_statements_render_expected_text() {
        assert_eq!(
            create_sql("status", COLUMNS).unwrap(),
            "INSERT INTO status (id, name, color) VALUES (?, ?, ?);"
        );
        assert_eq!(
            read_by_id_sql("status", COLUMNS).unwrap(),
            "SELECT id, name, color FROM status WHERE status.id = ?;"
        );
        assert_eq!(
            read_all_sql("status", COLUMNS).unwrap(),
            "SELECT id, name, color FROM status ORDER BY id ASC;"
        );
        assert_eq!(
            update_sql("status", COLUMNS).unwrap(),
            "UPDATE status SET id = ?, name = ?, color = ? WHERE status.id = ?;"
        );
        assert_eq!(
            delete_sql("status").unwrap(),
            "DELETE FROM status WHERE status.id = ?;"
        );
    }

    #[test]
    fn scoped_read_orders_by_identity() {
        assert_eq!(
            read_by_column_sql("chapters", &["id", "tale_id"], "tale_id").unwrap(),
            "SELECT id, tale_id FROM chapters WHERE chapters.tale_id = ? ORDER BY id ASC;"
        );
    }

    #[test]
    fn empty_column_name_is_rejected() {
        assert!(create_sql("status", &["id", ""]).is_err());
    }
}
