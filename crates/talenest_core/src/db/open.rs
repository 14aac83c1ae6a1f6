//! Connection bootstrap for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure pragmas and the prepared-statement cache.
//! - Trigger schema migrations before returning a usable handle.
//!
//! # Invariants
//! - Returned handles have `foreign_keys=ON`.
//! - Returned handles have migrations fully applied.

use super::migrations::apply_migrations;
use super::statement::CompiledStatement;
use super::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
// Large enough to keep every repository's statements resident at once.
const STATEMENT_CACHE_CAPACITY: usize = 128;

/// Shared storage connection.
///
/// Constructed once by the composing application and passed by reference
/// to every repository. Access is serialized internally.
///
/// Compiled forms are keyed by SQL text in the connection cache, so handles
/// with equal text share one form. `handles` counts live handles per text;
/// the form is discarded only when the last one is released.
pub struct Database {
    conn: Mutex<Connection>,
    handles: Mutex<HashMap<String, usize>>,
}

impl Database {
    /// Opens a SQLite database file, creating parent directories, and
    /// applies all pending migrations.
    ///
    /// # Side effects
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        info!("event=db_open module=db status=start mode=file");

        let opened = ensure_parent_dir(path)
            .and_then(|()| Connection::open(path).map_err(DbError::from))
            .and_then(bootstrap_connection);
        log_open_result("file", started_at, opened)
    }

    /// Opens an in-memory database and applies all pending migrations.
    pub fn open_in_memory() -> DbResult<Self> {
        let started_at = Instant::now();
        info!("event=db_open module=db status=start mode=memory");

        let opened = Connection::open_in_memory()
            .map_err(DbError::from)
            .and_then(bootstrap_connection);
        log_open_result("memory", started_at, opened)
    }

    /// Compiles `sql` once and returns a reusable handle.
    ///
    /// # Errors
    /// - Returns the engine error when the text is rejected. The failure is
    ///   logged and always propagated.
    pub fn compile(&self, sql: impl Into<String>) -> DbResult<CompiledStatement<'_>> {
        let sql = sql.into();
        let compiled = self.with_connection(|conn| {
            conn.prepare_cached(&sql)?;
            *self.lock_handles()?.entry(sql.clone()).or_insert(0) += 1;
            Ok(())
        });

        match compiled {
            Ok(()) => {
                debug!("event=statement_compile module=db status=ok sql={sql}");
                Ok(CompiledStatement::new(self, sql))
            }
            Err(err) => {
                error!("event=statement_compile module=db status=error sql={sql} error={err}");
                Err(err)
            }
        }
    }

    /// Runs `f` with exclusive access to the underlying connection.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> DbResult<T>,
    ) -> DbResult<T> {
        let conn = self.lock()?;
        f(&conn)
    }

    pub(super) fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::ConnectionPoisoned)
    }

    /// Drops one handle for `sql`; the compiled form is discarded with the
    /// last handle.
    pub(super) fn release(&self, sql: &str) -> DbResult<()> {
        self.with_connection(|conn| {
            let mut handles = self.lock_handles()?;
            if let Some(count) = handles.get_mut(sql) {
                if *count > 1 {
                    *count -= 1;
                    return Ok(());
                }
            }
            handles.remove(sql);
            conn.prepare_cached(sql)?.discard();
            debug!("event=statement_release module=db status=ok sql={sql}");
            Ok(())
        })
    }

    /// Lock order: always taken while the connection lock is held.
    fn lock_handles(&self) -> DbResult<MutexGuard<'_, HashMap<String, usize>>> {
        self.handles.lock().map_err(|_| DbError::ConnectionPoisoned)
    }

    /// Closes the connection, dropping every remaining compiled form.
    pub fn close(self) -> DbResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| DbError::ConnectionPoisoned)?;
        conn.close().map_err(|(_, err)| DbError::from(err))?;
        info!("event=db_close module=db status=ok");
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn bootstrap_connection(mut conn: Connection) -> DbResult<Database> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);
    apply_migrations(&mut conn)?;
    Ok(Database {
        conn: Mutex::new(conn),
        handles: Mutex::new(HashMap::new()),
    })
}

fn log_open_result(
    mode: &str,
    started_at: Instant,
    opened: DbResult<Database>,
) -> DbResult<Database> {
    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    opened
}
