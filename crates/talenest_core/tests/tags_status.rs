use talenest_core::{
    Database, RepoError, Repository, Status, StatusRepository, Tag, TagRepository, Tale,
    TaleRepository, ValidationError,
};

#[test]
fn default_status_is_readable() {
    let db = Database::open_in_memory().unwrap();
    let repo = StatusRepository::try_new(&db).unwrap();

    assert_eq!(repo.read_by_id(1).unwrap(), Status::default_status());
    assert_eq!(repo.read_all().unwrap().len(), 1);
    repo.close().unwrap();
}

#[test]
fn status_color_is_validated_on_write() {
    let db = Database::open_in_memory().unwrap();
    let repo = StatusRepository::try_new(&db).unwrap();

    let err = repo
        .create(&mut Status::new("Blocked", "#ff0000"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidColor(_))
    ));

    let mut done = Status::new("Done", "0000ff");
    let id = repo.create(&mut done).unwrap();
    done.color = "00FF00".to_string();
    repo.update(&done).unwrap();
    assert_eq!(repo.read_by_id(id).unwrap().color, "00FF00");
}

#[test]
fn duplicate_tag_name_is_an_execution_error() {
    let db = Database::open_in_memory().unwrap();
    let repo = TagRepository::try_new(&db).unwrap();

    repo.create(&mut Tag::new("myth")).unwrap();
    let err = repo.create(&mut Tag::new("myth")).unwrap_err();
    assert!(matches!(err, RepoError::Exec(_)));
}

#[test]
fn tags_attach_idempotently_and_list_by_name() {
    let db = Database::open_in_memory().unwrap();
    let tales = TaleRepository::try_new(&db).unwrap();
    let tags = TagRepository::try_new(&db).unwrap();

    let tale = tales.create(&mut Tale::new("Odyssey", "")).unwrap();
    let sea = tags.create(&mut Tag::new("sea")).unwrap();
    let epic = tags.create(&mut Tag::new("epic")).unwrap();
    tags.create(&mut Tag::new("unused")).unwrap();

    tags.attach_to_tale(sea, tale).unwrap();
    tags.attach_to_tale(epic, tale).unwrap();
    tags.attach_to_tale(sea, tale).unwrap();

    let names: Vec<_> = tags
        .read_by_tale(tale)
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, vec!["epic", "sea"]);

    tags.close().unwrap();
    tales.close().unwrap();
}

#[test]
fn detach_removes_link_and_tolerates_missing_links() {
    let db = Database::open_in_memory().unwrap();
    let tales = TaleRepository::try_new(&db).unwrap();
    let tags = TagRepository::try_new(&db).unwrap();

    let tale = tales.create(&mut Tale::new("Iliad", "")).unwrap();
    let war = tags.create(&mut Tag::new("war")).unwrap();

    tags.attach_to_tale(war, tale).unwrap();
    tags.detach_from_tale(war, tale).unwrap();
    tags.detach_from_tale(war, tale).unwrap();
    tags.detach_from_tale(9, 9).unwrap();

    assert!(tags.read_by_tale(tale).unwrap().is_empty());
    assert_eq!(tags.read_by_id(war).unwrap().name, "war");
}

#[test]
fn deleting_tag_drops_its_links() {
    let db = Database::open_in_memory().unwrap();
    let tales = TaleRepository::try_new(&db).unwrap();
    let tags = TagRepository::try_new(&db).unwrap();

    let tale = tales.create(&mut Tale::new("Aeneid", "")).unwrap();
    let exile = tags.create(&mut Tag::new("exile")).unwrap();
    tags.attach_to_tale(exile, tale).unwrap();

    tags.delete(exile).unwrap();
    assert!(tags.read_by_tale(tale).unwrap().is_empty());
}

#[test]
fn missing_link_table_fails_construction_after_crud_compiles() {
    let db = Database::open_in_memory().unwrap();
    db.with_connection(|conn| {
        conn.execute_batch("DROP TABLE tale_tag;")?;
        Ok(())
    })
    .unwrap();

    match TagRepository::try_new(&db) {
        Err(RepoError::Compile { sql, .. }) => assert!(sql.contains("tale_tag")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("construction must fail without the link table"),
    }

    // Plain tag CRUD does not need the link table.
    let crud = talenest_core::SqliteRepository::<Tag>::try_new(&db).unwrap();
    crud.create(&mut Tag::new("still works")).unwrap();
    crud.close().unwrap();
}
