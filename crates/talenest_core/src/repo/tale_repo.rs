//! Tale persistence mapping and hierarchy reads.
//!
//! # Invariants
//! - `update` stamps `updated_at` with the current time; the caller's
//!   record is left as passed.
//! - `read_by_parent` returns direct children only, ordered by identity.

use super::cache::{StatementCache, StatementKind};
use super::crud::{close_with, SqliteRepository};
use super::{optional_arg, timestamp_arg, Entity, RepoResult, Repository, RowReader};
use crate::db::{Database, SqlArg};
use crate::model::tale::Tale;
use crate::model::{RecordId, ValidationError};
use crate::query::{statements, QueryResult};

impl Entity for Tale {
    const TABLE: &'static str = "tales";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "summary",
        "parent_id",
        "status_id",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn to_args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::Text(self.name.clone()),
            SqlArg::Text(self.summary.clone()),
            optional_arg(self.parent_id, SqlArg::Integer),
            SqlArg::Integer(self.status_id),
            timestamp_arg(self.created_at),
            timestamp_arg(self.updated_at),
            optional_arg(self.deleted_at, timestamp_arg),
        ]
    }

    fn from_row(reader: &mut RowReader<'_, '_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(reader.take()?),
            name: reader.take()?,
            summary: reader.take()?,
            parent_id: reader.take()?,
            status_id: reader.take()?,
            created_at: reader.take_timestamp()?,
            updated_at: reader.take_timestamp()?,
            deleted_at: reader.take_optional_timestamp()?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Tale::validate(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaleStatement {
    ReadByParent,
}

impl StatementKind for TaleStatement {
    const ALL: &'static [Self] = &[Self::ReadByParent];

    fn label(self) -> &'static str {
        match self {
            Self::ReadByParent => "read_by_parent",
        }
    }
}

pub struct TaleRepository<'db> {
    crud: SqliteRepository<'db, Tale>,
    scoped: StatementCache<'db, TaleStatement>,
}

impl<'db> TaleRepository<'db> {
    pub fn try_new(db: &'db Database) -> RepoResult<Self> {
        let (crud, scoped) =
            SqliteRepository::<Tale>::try_new(db)?.with_scoped(render_scoped)?;
        Ok(Self { crud, scoped })
    }

    /// Returns the direct children of `parent_id`.
    pub fn read_by_parent(&self, parent_id: RecordId) -> RepoResult<Vec<Tale>> {
        let statement = self.scoped.get(TaleStatement::ReadByParent)?;
        self.crud
            .read_rows(statement, &[SqlArg::Integer(parent_id)])
    }
}

impl Repository<Tale> for TaleRepository<'_> {
    fn create(&self, record: &mut Tale) -> RepoResult<RecordId> {
        self.crud.create(record)
    }

    fn read_by_id(&self, id: RecordId) -> RepoResult<Tale> {
        self.crud.read_by_id(id)
    }

    fn read_all(&self) -> RepoResult<Vec<Tale>> {
        self.crud.read_all()
    }

    fn update(&self, record: &Tale) -> RepoResult<()> {
        let mut touched = record.clone();
        touched.touch();
        self.crud.update(&touched)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        self.crud.delete(id)
    }

    fn close(self) -> RepoResult<()> {
        let mut failures = self.crud.release();
        failures.extend(self.scoped.release_all().err().unwrap_or_default());
        close_with(Tale::TABLE, failures)
    }
}

fn render_scoped(kind: TaleStatement) -> QueryResult<String> {
    match kind {
        TaleStatement::ReadByParent => {
            statements::read_by_column_sql(Tale::TABLE, Tale::COLUMNS, "parent_id")
        }
    }
}
