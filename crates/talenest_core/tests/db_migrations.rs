use rusqlite::Connection;
use talenest_core::db::migrations::{current_user_version, latest_version};
use talenest_core::{Database, DbError};

#[test]
fn open_in_memory_applies_all_migrations() {
    let db = Database::open_in_memory().unwrap();

    assert_eq!(schema_version(&db), latest_version());
    for table in ["status", "tag", "tales", "tale_tag", "chapters"] {
        assert!(table_exists(&db, table), "table {table} does not exist");
    }
}

#[test]
fn default_status_is_seeded_once_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("talenest.db");

    let first = Database::open(&path).unwrap();
    assert_eq!(status_count(&first), 1);
    first.close().unwrap();

    let second = Database::open(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_eq!(status_count(&second), 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match Database::open(&path) {
        Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be rejected"),
    }
}

#[test]
fn foreign_keys_are_enforced() {
    let db = Database::open_in_memory().unwrap();
    let enabled: i64 = db
        .with_connection(|conn| Ok(conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?))
        .unwrap();
    assert_eq!(enabled, 1);
}

fn schema_version(db: &Database) -> u32 {
    db.with_connection(current_user_version).unwrap()
}

fn status_count(db: &Database) -> i64 {
    db.with_connection(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM status;", [], |row| row.get(0))?)
    })
    .unwrap()
}

fn table_exists(db: &Database, table_name: &str) -> bool {
    let exists: i64 = db
        .with_connection(|conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(
                    SELECT 1
                    FROM sqlite_master
                    WHERE type = 'table' AND name = ?1
                );",
                [table_name],
                |row| row.get(0),
            )?)
        })
        .unwrap();
    exists == 1
}
