use chrono::NaiveDate;
use talenest_core::{Database, RepoError, Repository, Tale, TaleRepository, ValidationError};

fn old_timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

#[test]
fn create_assigns_identity_and_read_returns_same_record() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let mut tale = Tale::new("Odyssey", "the long way home");
    let id = repo.create(&mut tale).unwrap();

    assert_eq!(tale.id, Some(id));
    assert_eq!(repo.read_by_id(id).unwrap(), tale);
    repo.close().unwrap();
}

#[test]
fn read_all_on_empty_table_returns_empty_vec() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    assert!(repo.read_all().unwrap().is_empty());
}

#[test]
fn read_all_returns_records_in_identity_order() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    for name in ["first", "second", "third"] {
        repo.create(&mut Tale::new(name, "")).unwrap();
    }

    let names: Vec<_> = repo.read_all().unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn read_missing_id_returns_not_found() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let err = repo.read_by_id(42).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            table: "tales",
            id: 42
        }
    ));
}

#[test]
fn update_rewrites_fields_and_refreshes_updated_at() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let mut tale = Tale::new("draft", "");
    tale.created_at = old_timestamp();
    tale.updated_at = old_timestamp();
    let id = repo.create(&mut tale).unwrap();

    tale.name = "final".to_string();
    tale.summary = "revised".to_string();
    repo.update(&tale).unwrap();

    let loaded = repo.read_by_id(id).unwrap();
    assert_eq!(loaded.name, "final");
    assert_eq!(loaded.summary, "revised");
    assert_eq!(loaded.created_at, old_timestamp());
    assert!(loaded.updated_at > old_timestamp());
    assert_eq!(tale.updated_at, old_timestamp());
}

#[test]
fn soft_delete_marker_survives_update() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let mut tale = Tale::new("archived", "");
    let id = repo.create(&mut tale).unwrap();
    tale.mark_deleted();
    repo.update(&tale).unwrap();

    let loaded = repo.read_by_id(id).unwrap();
    assert!(loaded.is_deleted());
    assert_eq!(loaded.deleted_at, tale.deleted_at);
}

#[test]
fn update_of_missing_row_reports_row_count() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let mut ghost = Tale::new("ghost", "");
    ghost.id = Some(999);
    let err = repo.update(&ghost).unwrap_err();
    assert!(matches!(
        err,
        RepoError::UnexpectedRowCount {
            table: "tales",
            expected: 1,
            actual: 0
        }
    ));
}

#[test]
fn update_without_identity_is_rejected_before_execution() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let err = repo.update(&Tale::new("unsaved", "")).unwrap_err();
    assert!(matches!(err, RepoError::UnexpectedRowCount { actual: 0, .. }));
}

#[test]
fn delete_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let id = repo.create(&mut Tale::new("short-lived", "")).unwrap();
    repo.delete(id).unwrap();
    repo.delete(id).unwrap();
    repo.delete(12345).unwrap();

    assert!(matches!(
        repo.read_by_id(id),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn read_by_parent_returns_direct_children_only() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let root = repo.create(&mut Tale::new("root", "")).unwrap();
    let first = repo.create(&mut Tale::child_of(root, "first", "")).unwrap();
    let second = repo.create(&mut Tale::child_of(root, "second", "")).unwrap();
    repo.create(&mut Tale::child_of(first, "grandchild", ""))
        .unwrap();

    let children: Vec<_> = repo
        .read_by_parent(root)
        .unwrap()
        .into_iter()
        .map(|tale| tale.id)
        .collect();
    assert_eq!(children, vec![Some(first), Some(second)]);
    assert!(repo.read_by_parent(second).unwrap().is_empty());
}

#[test]
fn deleting_parent_cascades_to_descendants() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let root = repo.create(&mut Tale::new("root", "")).unwrap();
    let child = repo.create(&mut Tale::child_of(root, "child", "")).unwrap();
    repo.create(&mut Tale::child_of(child, "grandchild", ""))
        .unwrap();

    repo.delete(root).unwrap();
    assert!(repo.read_all().unwrap().is_empty());
}

#[test]
fn invalid_records_never_reach_storage() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let mut unnamed = Tale::new("   ", "");
    let err = repo.create(&mut unnamed).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyName { entity: "tale" })
    ));
    assert_eq!(unnamed.id, None);
    assert!(repo.read_all().unwrap().is_empty());
}

#[test]
fn dangling_parent_is_an_execution_error() {
    let db = Database::open_in_memory().unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    let err = repo
        .create(&mut Tale::child_of(777, "orphan", ""))
        .unwrap_err();
    assert!(matches!(err, RepoError::Exec(_)));
}

#[test]
fn malformed_timestamp_is_reported_as_scan_error() {
    let db = Database::open_in_memory().unwrap();
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO tales (id, name, created_at, updated_at) \
             VALUES (1, 'broken', 'yesterday', '2024-01-01 00:00:00');",
            [],
        )?;
        Ok(())
    })
    .unwrap();
    let repo = TaleRepository::try_new(&db).unwrap();

    match repo.read_by_id(1).unwrap_err() {
        RepoError::Scan { table, column, .. } => {
            assert_eq!(table, "tales");
            assert_eq!(column, "created_at");
        }
        other => panic!("unexpected error: {other}"),
    }
}
