//! Per-repository statement cache keyed by closed operation enums.

use super::{RepoError, RepoResult};
use crate::db::{CompiledStatement, Database, DbError};
use crate::query::QueryResult;
use log::warn;
use std::collections::HashMap;
use std::hash::Hash;

/// Closed set of statements one repository prepares.
pub trait StatementKind: Copy + Eq + Hash + 'static {
    /// Every variant; each one is compiled at construction.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;
}

/// Generic CRUD operations every entity repository prepares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudStatement {
    Create,
    ReadById,
    ReadAll,
    Update,
    Delete,
}

impl StatementKind for CrudStatement {
    const ALL: &'static [Self] = &[
        Self::Create,
        Self::ReadById,
        Self::ReadAll,
        Self::Update,
        Self::Delete,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ReadById => "read_by_id",
            Self::ReadAll => "read_all",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Compiled statements for every variant of `K`.
pub struct StatementCache<'db, K: StatementKind> {
    statements: HashMap<K, CompiledStatement<'db>>,
}

impl<'db, K: StatementKind> StatementCache<'db, K> {
    /// Renders and compiles one statement per `K::ALL` variant.
    ///
    /// All text is rendered before anything is compiled. When a compile
    /// fails, statements compiled so far are released before returning.
    ///
    /// # Errors
    /// - `RepoError::Query` when rendering fails.
    /// - `RepoError::Compile` when the engine rejects a statement.
    pub fn prepare(
        db: &'db Database,
        mut render: impl FnMut(K) -> QueryResult<String>,
    ) -> RepoResult<Self> {
        let rendered = K::ALL
            .iter()
            .map(|&kind| render(kind).map(|sql| (kind, sql)))
            .collect::<QueryResult<Vec<_>>>()?;

        let mut cache = Self {
            statements: HashMap::with_capacity(rendered.len()),
        };
        for (kind, sql) in rendered {
            match db.compile(sql.as_str()) {
                Ok(statement) => {
                    cache.statements.insert(kind, statement);
                }
                Err(source) => {
                    if let Err(failures) = cache.release_all() {
                        warn!(
                            "event=statement_release module=repo status=error kind={} failures={}",
                            kind.label(),
                            failures.len()
                        );
                    }
                    return Err(RepoError::Compile { sql, source });
                }
            }
        }
        Ok(cache)
    }

    pub fn get(&self, kind: K) -> RepoResult<&CompiledStatement<'db>> {
        self.statements
            .get(&kind)
            .ok_or(RepoError::StatementNotPrepared(kind.label()))
    }

    pub(crate) fn len(&self) -> usize {
        self.statements.len()
    }

    /// Releases every statement, collecting all failures.
    pub fn release_all(self) -> Result<(), Vec<DbError>> {
        let failures = self
            .statements
            .into_values()
            .filter_map(|statement| statement.release().err())
            .collect::<Vec<_>>();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }
}
