//! Reusable compiled statement handles.

use super::{DbError, DbResult, Database};
use rusqlite::{params_from_iter, Row};

/// Positional argument bound to a `?` placeholder.
pub type SqlArg = rusqlite::types::Value;

/// Handle to one statement compiled by [`Database::compile`].
///
/// The compiled form lives in the connection's prepared-statement cache,
/// keyed by the SQL text; executing re-acquires it under the connection
/// lock instead of parsing again. `release` consumes the handle; every
/// handle is released at most once.
pub struct CompiledStatement<'db> {
    db: &'db Database,
    sql: String,
}

impl<'db> CompiledStatement<'db> {
    pub(super) fn new(db: &'db Database, sql: String) -> Self {
        Self { db, sql }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Executes with `args` and returns the affected row count.
    pub fn execute(&self, args: &[SqlArg]) -> DbResult<usize> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(&self.sql)?;
            Ok(stmt.execute(params_from_iter(args))?)
        })
    }

    /// Executes an insert and returns the engine-assigned rowid.
    ///
    /// The rowid is read under the same lock as the insert so concurrent
    /// callers never observe each other's identities.
    pub fn insert(&self, args: &[SqlArg]) -> DbResult<i64> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(&self.sql)?;
            stmt.execute(params_from_iter(args))?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Runs the query and maps every row in engine order.
    ///
    /// Transport failures become `E` through `From<DbError>`; mapping
    /// failures are returned as produced by `map`.
    pub fn query<T, E>(
        &self,
        args: &[SqlArg],
        mut map: impl FnMut(&Row<'_>) -> Result<T, E>,
    ) -> Result<Vec<T>, E>
    where
        E: From<DbError>,
    {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare_cached(&self.sql).map_err(DbError::from)?;
        let mut rows = stmt
            .query(params_from_iter(args))
            .map_err(DbError::from)?;

        let mut mapped = Vec::new();
        while let Some(row) = rows.next().map_err(DbError::from)? {
            mapped.push(map(row)?);
        }
        Ok(mapped)
    }

    /// Gives up this handle. The compiled form leaves the connection cache
    /// once no other handle with the same text remains.
    pub fn release(self) -> DbResult<()> {
        self.db.release(&self.sql)
    }
}
