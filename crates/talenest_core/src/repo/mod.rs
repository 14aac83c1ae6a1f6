//! Repository layer: pre-compiled statements and record materialization.
//!
//! # Responsibility
//! - Build each entity's SQL once through the query builder.
//! - Compile it once per repository and bind arguments per call.
//! - Map rows to records through one shared extraction contract.
//!
//! # Invariants
//! - A repository is either fully prepared or never constructed.
//! - Write paths validate records before touching SQL.
//! - `update` requires exactly one affected row; `delete` is idempotent.
//! - `close` consumes the repository and releases every statement once.

use crate::db::{DbError, SqlArg};
use crate::model::{RecordId, ValidationError};
use crate::query::{QueryError, DATETIME_FORMAT};
use chrono::NaiveDateTime;
use rusqlite::types::FromSql;
use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cache;
pub mod chapter_repo;
pub mod crud;
pub mod status_repo;
pub mod tag_repo;
pub mod tale_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// Statement text could not be rendered.
    Query(QueryError),
    /// Storage engine rejected statement text at construction time.
    Compile { sql: String, source: DbError },
    /// Runtime execution failure.
    Exec(DbError),
    NotFound { table: &'static str, id: RecordId },
    /// Row shape does not match the entity's column mapping.
    Scan {
        table: &'static str,
        column: &'static str,
        message: String,
    },
    UnexpectedRowCount {
        table: &'static str,
        expected: usize,
        actual: usize,
    },
    Validation(ValidationError),
    /// Prepared statement lookup failed for a kind that was never compiled.
    StatementNotPrepared(&'static str),
    /// One or more statements failed to release on close.
    Release(Vec<DbError>),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query(err) => write!(f, "{err}"),
            Self::Compile { sql, source } => {
                write!(f, "failed to compile statement `{sql}`: {source}")
            }
            Self::Exec(err) => write!(f, "{err}"),
            Self::NotFound { table, id } => write!(f, "{table} row not found: {id}"),
            Self::Scan {
                table,
                column,
                message,
            } => write!(f, "cannot read {table}.{column}: {message}"),
            Self::UnexpectedRowCount {
                table,
                expected,
                actual,
            } => write!(
                f,
                "{table}: expected {expected} affected row(s), got {actual}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::StatementNotPrepared(kind) => write!(f, "statement `{kind}` is not prepared"),
            Self::Release(errors) => {
                write!(f, "{} statement(s) failed to release", errors.len())?;
                for err in errors {
                    write!(f, "; {err}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query(err) => Some(err),
            Self::Compile { source, .. } => Some(source),
            Self::Exec(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Release(errors) => errors.first().map(|err| err as &(dyn Error + 'static)),
            Self::NotFound { .. }
            | Self::Scan { .. }
            | Self::UnexpectedRowCount { .. }
            | Self::StatementNotPrepared(_) => None,
        }
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Exec(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Persistence mapping for one entity table.
///
/// `COLUMNS` lists every persisted column in bind order with the identity
/// column first. `to_args` and `from_row` must agree with that order.
pub trait Entity: Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<RecordId>;
    fn set_id(&mut self, id: RecordId);

    /// Values for `COLUMNS[1..]`, in order.
    fn to_args(&self) -> Vec<SqlArg>;

    /// Builds a record from `COLUMNS`, read in order.
    fn from_row(reader: &mut RowReader<'_, '_>) -> RepoResult<Self>;

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// CRUD contract shared by every entity repository.
pub trait Repository<E: Entity> {
    /// Inserts `record`, writes the generated identity back and returns it.
    fn create(&self, record: &mut E) -> RepoResult<RecordId>;
    /// Returns the record with `id` or `RepoError::NotFound`.
    fn read_by_id(&self, id: RecordId) -> RepoResult<E>;
    /// Returns every record ordered by identity; empty is not an error.
    fn read_all(&self) -> RepoResult<Vec<E>>;
    /// Rewrites every column; exactly one row must change.
    fn update(&self, record: &E) -> RepoResult<()>;
    /// Deletes by identity; a missing row is not an error.
    fn delete(&self, id: RecordId) -> RepoResult<()>;
    /// Releases every compiled statement.
    fn close(self) -> RepoResult<()>
    where
        Self: Sized;
}

/// Ordered typed extractor over one result row.
///
/// Each `take*` call reads the next declared column; failures name the
/// table and column they came from.
pub struct RowReader<'r, 'stmt> {
    table: &'static str,
    columns: &'static [&'static str],
    row: &'r Row<'stmt>,
    next: usize,
}

impl<'r, 'stmt> RowReader<'r, 'stmt> {
    pub fn new(table: &'static str, columns: &'static [&'static str], row: &'r Row<'stmt>) -> Self {
        Self {
            table,
            columns,
            row,
            next: 0,
        }
    }

    pub fn take<T: FromSql>(&mut self) -> RepoResult<T> {
        let (index, column) = self.advance();
        self.row.get(index).map_err(|err| self.scan_error(column, err))
    }

    /// Reads a `DATETIME_FORMAT` text column.
    pub fn take_timestamp(&mut self) -> RepoResult<NaiveDateTime> {
        let (index, column) = self.advance();
        let raw: String = self.row.get(index).map_err(|err| self.scan_error(column, err))?;
        parse_timestamp(&raw).map_err(|err| self.scan_error(column, err))
    }

    /// Reads a nullable `DATETIME_FORMAT` text column.
    pub fn take_optional_timestamp(&mut self) -> RepoResult<Option<NaiveDateTime>> {
        let (index, column) = self.advance();
        let raw: Option<String> = self.row.get(index).map_err(|err| self.scan_error(column, err))?;
        match raw {
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .map_err(|err| self.scan_error(column, err)),
            None => Ok(None),
        }
    }

    fn advance(&mut self) -> (usize, &'static str) {
        let index = self.next;
        self.next += 1;
        (index, self.columns.get(index).copied().unwrap_or("<unmapped>"))
    }

    fn scan_error(&self, column: &'static str, err: impl Display) -> RepoError {
        RepoError::Scan {
            table: self.table,
            column,
            message: err.to_string(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
}

pub(crate) fn timestamp_arg(value: NaiveDateTime) -> SqlArg {
    SqlArg::Text(value.format(DATETIME_FORMAT).to_string())
}

pub(crate) fn optional_arg<T>(value: Option<T>, to_arg: impl FnOnce(T) -> SqlArg) -> SqlArg {
    value.map_or(SqlArg::Null, to_arg)
}
