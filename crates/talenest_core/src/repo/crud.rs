//! Generic SQLite repository over any [`Entity`].

use super::cache::{CrudStatement, StatementCache, StatementKind};
use super::{Entity, RepoError, RepoResult, Repository, RowReader};
use crate::db::{CompiledStatement, Database, DbError, SqlArg};
use crate::model::RecordId;
use crate::query::{statements, QueryResult};
use log::{debug, info, warn};
use std::marker::PhantomData;

/// CRUD repository holding one compiled statement per [`CrudStatement`].
///
/// Borrows the shared [`Database`]; can be shared across threads.
pub struct SqliteRepository<'db, E: Entity> {
    db: &'db Database,
    statements: StatementCache<'db, CrudStatement>,
    _entity: PhantomData<fn() -> E>,
}

impl<'db, E: Entity> SqliteRepository<'db, E> {
    /// Builds and compiles every CRUD statement for `E::TABLE`.
    ///
    /// # Errors
    /// - `RepoError::Compile` when any statement is rejected; nothing stays
    ///   compiled on failure.
    pub fn try_new(db: &'db Database) -> RepoResult<Self> {
        let statements = StatementCache::prepare(db, render_crud::<E>)
            .inspect_err(|err| {
                warn!(
                    "event=repo_init module=repo status=error table={} error={err}",
                    E::TABLE
                );
            })?;
        info!(
            "event=repo_init module=repo status=ok table={} statements={}",
            E::TABLE,
            statements.len()
        );
        Ok(Self {
            db,
            statements,
            _entity: PhantomData,
        })
    }

    /// Compiles an entity-specific statement set next to the CRUD set.
    ///
    /// On failure the CRUD statements are released as well.
    pub(crate) fn with_scoped<K: StatementKind>(
        self,
        render: impl FnMut(K) -> QueryResult<String>,
    ) -> RepoResult<(Self, StatementCache<'db, K>)> {
        match StatementCache::prepare(self.db, render) {
            Ok(scoped) => Ok((self, scoped)),
            Err(err) => {
                if let Err(failures) = self.statements.release_all() {
                    warn!(
                        "event=repo_init module=repo status=error table={} release_failures={}",
                        E::TABLE,
                        failures.len()
                    );
                }
                Err(err)
            }
        }
    }

    /// Runs a row-returning statement and maps every row into `E`.
    pub(crate) fn read_rows(
        &self,
        statement: &CompiledStatement<'db>,
        args: &[SqlArg],
    ) -> RepoResult<Vec<E>> {
        statement.query(args, |row| {
            let mut reader = RowReader::new(E::TABLE, E::COLUMNS, row);
            E::from_row(&mut reader)
        })
    }

    /// Releases the CRUD statements, returning every failure.
    pub(crate) fn release(self) -> Vec<DbError> {
        self.statements.release_all().err().unwrap_or_default()
    }
}

impl<E: Entity> Repository<E> for SqliteRepository<'_, E> {
    fn create(&self, record: &mut E) -> RepoResult<RecordId> {
        record.validate()?;

        let mut args = Vec::with_capacity(E::COLUMNS.len());
        args.push(SqlArg::Null);
        args.extend(record.to_args());

        let id = self.statements.get(CrudStatement::Create)?.insert(&args)?;
        record.set_id(id);
        debug!("event=record_create module=repo status=ok table={} id={id}", E::TABLE);
        Ok(id)
    }

    fn read_by_id(&self, id: RecordId) -> RepoResult<E> {
        let statement = self.statements.get(CrudStatement::ReadById)?;
        self.read_rows(statement, &[SqlArg::Integer(id)])?
            .into_iter()
            .next()
            .ok_or(RepoError::NotFound {
                table: E::TABLE,
                id,
            })
    }

    fn read_all(&self) -> RepoResult<Vec<E>> {
        let statement = self.statements.get(CrudStatement::ReadAll)?;
        self.read_rows(statement, &[])
    }

    fn update(&self, record: &E) -> RepoResult<()> {
        record.validate()?;
        let Some(id) = record.id() else {
            return Err(RepoError::UnexpectedRowCount {
                table: E::TABLE,
                expected: 1,
                actual: 0,
            });
        };

        let mut args = Vec::with_capacity(E::COLUMNS.len() + 1);
        args.push(SqlArg::Integer(id));
        args.extend(record.to_args());
        args.push(SqlArg::Integer(id));

        let changed = self.statements.get(CrudStatement::Update)?.execute(&args)?;
        if changed != 1 {
            return Err(RepoError::UnexpectedRowCount {
                table: E::TABLE,
                expected: 1,
                actual: changed,
            });
        }
        Ok(())
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .statements
            .get(CrudStatement::Delete)?
            .execute(&[SqlArg::Integer(id)])?;
        debug!(
            "event=record_delete module=repo status=ok table={} id={id} changed={changed}",
            E::TABLE
        );
        Ok(())
    }

    fn close(self) -> RepoResult<()> {
        close_with(E::TABLE, self.release())
    }
}

/// Turns collected release failures into the close outcome.
pub(crate) fn close_with(table: &'static str, failures: Vec<DbError>) -> RepoResult<()> {
    if failures.is_empty() {
        info!("event=repo_close module=repo status=ok table={table}");
        return Ok(());
    }
    warn!(
        "event=repo_close module=repo status=error table={table} failures={}",
        failures.len()
    );
    Err(RepoError::Release(failures))
}

fn render_crud<E: Entity>(kind: CrudStatement) -> QueryResult<String> {
    match kind {
        CrudStatement::Create => statements::create_sql(E::TABLE, E::COLUMNS),
        CrudStatement::ReadById => statements::read_by_id_sql(E::TABLE, E::COLUMNS),
        CrudStatement::ReadAll => statements::read_all_sql(E::TABLE, E::COLUMNS),
        CrudStatement::Update => statements::update_sql(E::TABLE, E::COLUMNS),
        CrudStatement::Delete => statements::delete_sql(E::TABLE),
    }
}
