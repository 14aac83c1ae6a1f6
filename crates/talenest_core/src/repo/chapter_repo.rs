//! Chapter persistence mapping.

use super::cache::{StatementCache, StatementKind};
use super::crud::{close_with, SqliteRepository};
use super::{Entity, RepoResult, Repository, RowReader};
use crate::db::{Database, SqlArg};
use crate::model::chapter::Chapter;
use crate::model::RecordId;
use crate::query::{statements, QueryResult};

impl Entity for Chapter {
    const TABLE: &'static str = "chapters";
    const COLUMNS: &'static [&'static str] = &["id", "content", "sentiment", "tale_id"];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn to_args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::Text(self.content.clone()),
            SqlArg::Real(self.sentiment),
            SqlArg::Integer(self.tale_id),
        ]
    }

    fn from_row(reader: &mut RowReader<'_, '_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(reader.take()?),
            content: reader.take()?,
            sentiment: reader.take()?,
            tale_id: reader.take()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChapterStatement {
    ReadByTale,
}

impl StatementKind for ChapterStatement {
    const ALL: &'static [Self] = &[Self::ReadByTale];

    fn label(self) -> &'static str {
        match self {
            Self::ReadByTale => "read_by_tale",
        }
    }
}

pub struct ChapterRepository<'db> {
    crud: SqliteRepository<'db, Chapter>,
    scoped: StatementCache<'db, ChapterStatement>,
}

impl<'db> ChapterRepository<'db> {
    pub fn try_new(db: &'db Database) -> RepoResult<Self> {
        let (crud, scoped) =
            SqliteRepository::<Chapter>::try_new(db)?.with_scoped(render_scoped)?;
        Ok(Self { crud, scoped })
    }

    /// Returns the chapters of `tale_id` in creation order.
    pub fn read_by_tale(&self, tale_id: RecordId) -> RepoResult<Vec<Chapter>> {
        let statement = self.scoped.get(ChapterStatement::ReadByTale)?;
        self.crud.read_rows(statement, &[SqlArg::Integer(tale_id)])
    }
}

impl Repository<Chapter> for ChapterRepository<'_> {
    fn create(&self, record: &mut Chapter) -> RepoResult<RecordId> {
        self.crud.create(record)
    }

    fn read_by_id(&self, id: RecordId) -> RepoResult<Chapter> {
        self.crud.read_by_id(id)
    }

    fn read_all(&self) -> RepoResult<Vec<Chapter>> {
        self.crud.read_all()
    }

    fn update(&self, record: &Chapter) -> RepoResult<()> {
        self.crud.update(record)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        self.crud.delete(id)
    }

    fn close(self) -> RepoResult<()> {
        let mut failures = self.crud.release();
        failures.extend(self.scoped.release_all().err().unwrap_or_default());
        close_with(Chapter::TABLE, failures)
    }
}

fn render_scoped(kind: ChapterStatement) -> QueryResult<String> {
    match kind {
        ChapterStatement::ReadByTale => {
            statements::read_by_column_sql(Chapter::TABLE, Chapter::COLUMNS, "tale_id")
        }
    }
}
