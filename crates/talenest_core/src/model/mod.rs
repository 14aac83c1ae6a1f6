//! Domain records for the tale hierarchy.
//!
//! # Responsibility
//! - Define the plain records persisted by the repository layer.
//! - Validate record invariants before they reach storage.
//!
//! # Invariants
//! - A record without identity (`id == None`) has never been persisted.
//! - Timestamps carry second precision, matching the storage format.

use chrono::{Local, NaiveDateTime, Timelike};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod chapter;
pub mod status;
pub mod tag;
pub mod tale;

/// Engine-assigned identity shared by every entity table.
pub type RecordId = i64;

/// Current local time truncated to whole seconds.
pub fn now_clean() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Record-level invariant violations.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName { entity: &'static str },
    InvalidColor(String),
    DeletedBeforeCreated,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName { entity } => write!(f, "{entity} name cannot be empty"),
            Self::InvalidColor(color) => {
                write!(f, "status color `{color}` must be six hex digits")
            }
            Self::DeletedBeforeCreated => {
                write!(f, "deleted_at cannot be earlier than created_at")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn fmt_id(id: Option<RecordId>) -> String {
    id.map_or_else(|| "new".to_string(), |id| id.to_string())
}
