//! Core data access for Talenest.
//!
//! SQL text is assembled by the [`query`] builders, compiled once per
//! repository through [`db::Database`], and reused for every call.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;

pub use config::{app_dir, load_or_init, AppConfig, ConfigError};
pub use db::{Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::chapter::Chapter;
pub use model::status::Status;
pub use model::tag::Tag;
pub use model::tale::Tale;
pub use model::{RecordId, ValidationError};
pub use query::{QueryError, QueryResult};
pub use repo::chapter_repo::ChapterRepository;
pub use repo::crud::SqliteRepository;
pub use repo::status_repo::StatusRepository;
pub use repo::tag_repo::TagRepository;
pub use repo::tale_repo::TaleRepository;
pub use repo::{Entity, RepoError, RepoResult, Repository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
