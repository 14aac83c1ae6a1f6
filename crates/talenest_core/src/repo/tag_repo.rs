//! Tag persistence and tale-tag links.
//!
//! # Invariants
//! - A (tale, tag) link exists at most once; attaching twice is a no-op.
//! - Detaching a missing link succeeds.

use super::cache::{StatementCache, StatementKind};
use super::crud::{close_with, SqliteRepository};
use super::{Entity, RepoResult, Repository, RowReader};
use crate::db::{Database, SqlArg};
use crate::model::tag::Tag;
use crate::model::{RecordId, ValidationError};
use crate::query::{
    placeholders, to_columns, Column, DeleteQuery, InsertQuery, QueryResult, SelectQuery, Value,
};

const LINK_TABLE: &str = "tale_tag";

impl Entity for Tag {
    const TABLE: &'static str = "tag";
    const COLUMNS: &'static [&'static str] = &["id", "name"];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn to_args(&self) -> Vec<SqlArg> {
        vec![SqlArg::Text(self.name.clone())]
    }

    fn from_row(reader: &mut RowReader<'_, '_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(reader.take()?),
            name: reader.take()?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Tag::validate(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagStatement {
    ReadByTale,
    AttachToTale,
    DetachFromTale,
}

impl StatementKind for TagStatement {
    const ALL: &'static [Self] = &[Self::ReadByTale, Self::AttachToTale, Self::DetachFromTale];

    fn label(self) -> &'static str {
        match self {
            Self::ReadByTale => "read_by_tale",
            Self::AttachToTale => "attach_to_tale",
            Self::DetachFromTale => "detach_from_tale",
        }
    }
}

/// CRUD over `tag` plus link management through `tale_tag`.
pub struct TagRepository<'db> {
    crud: SqliteRepository<'db, Tag>,
    scoped: StatementCache<'db, TagStatement>,
}

impl<'db> TagRepository<'db> {
    pub fn try_new(db: &'db Database) -> RepoResult<Self> {
        let (crud, scoped) = SqliteRepository::<Tag>::try_new(db)?.with_scoped(render_scoped)?;
        Ok(Self { crud, scoped })
    }

    /// Returns the tags attached to `tale_id`, ordered by name.
    pub fn read_by_tale(&self, tale_id: RecordId) -> RepoResult<Vec<Tag>> {
        let statement = self.scoped.get(TagStatement::ReadByTale)?;
        self.crud.read_rows(statement, &[SqlArg::Integer(tale_id)])
    }

    /// Links `tag_id` to `tale_id`; an existing link is left untouched.
    pub fn attach_to_tale(&self, tag_id: RecordId, tale_id: RecordId) -> RepoResult<()> {
        self.scoped
            .get(TagStatement::AttachToTale)?
            .execute(&[SqlArg::Integer(tale_id), SqlArg::Integer(tag_id)])?;
        Ok(())
    }

    /// Removes the link between `tag_id` and `tale_id` if present.
    pub fn detach_from_tale(&self, tag_id: RecordId, tale_id: RecordId) -> RepoResult<()> {
        self.scoped
            .get(TagStatement::DetachFromTale)?
            .execute(&[SqlArg::Integer(tale_id), SqlArg::Integer(tag_id)])?;
        Ok(())
    }
}

impl Repository<Tag> for TagRepository<'_> {
    fn create(&self, record: &mut Tag) -> RepoResult<RecordId> {
        self.crud.create(record)
    }

    fn read_by_id(&self, id: RecordId) -> RepoResult<Tag> {
        self.crud.read_by_id(id)
    }

    fn read_all(&self) -> RepoResult<Vec<Tag>> {
        self.crud.read_all()
    }

    fn update(&self, record: &Tag) -> RepoResult<()> {
        self.crud.update(record)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        self.crud.delete(id)
    }

    fn close(self) -> RepoResult<()> {
        let mut failures = self.crud.release();
        failures.extend(self.scoped.release_all().err().unwrap_or_default());
        close_with(Tag::TABLE, failures)
    }
}

fn render_scoped(kind: TagStatement) -> QueryResult<String> {
    match kind {
        TagStatement::ReadByTale => {
            let mut query = SelectQuery::new(Tag::TABLE);
            query
                .set_columns(to_columns(Tag::COLUMNS)?)
                .set_join(
                    Tag::TABLE,
                    &Column::new("id")?,
                    LINK_TABLE,
                    &Column::new("tag_id")?,
                    "INNER",
                )
                .set_where(
                    LINK_TABLE,
                    Column::new("tale_id")?,
                    "=",
                    Value::placeholder(),
                    "",
                )
                .order_by(vec![Column::new("name")?], "ASC");
            Ok(query.build())
        }
        TagStatement::AttachToTale => {
            let mut query = InsertQuery::new(LINK_TABLE);
            query.set_ignore()?;
            query.set_columns(to_columns(&["tale_id", "tag_id"])?)?;
            query.set_values(placeholders(2))?;
            query.build()
        }
        TagStatement::DetachFromTale => {
            let mut query = DeleteQuery::new(LINK_TABLE);
            query
                .set_where(
                    LINK_TABLE,
                    Column::new("tale_id")?,
                    "=",
                    Value::placeholder(),
                    "",
                )
                .set_where(
                    LINK_TABLE,
                    Column::new("tag_id")?,
                    "=",
                    Value::placeholder(),
                    "AND",
                );
            query.build()
        }
    }
}
