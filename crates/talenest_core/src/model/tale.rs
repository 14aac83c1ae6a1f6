//! Tale domain record.
//!
//! # Invariants
//! - `parent_id == None` marks a root tale.
//! - `deleted_at` is a soft-delete marker; repository `delete` is a hard
//!   delete and does not consult it.
//! - `deleted_at`, when set, is not earlier than `created_at`.

use super::status::DEFAULT_STATUS_ID;
use super::{fmt_id, now_clean, RecordId, ValidationError};
use crate::query::DATETIME_FORMAT;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tale {
    pub id: Option<RecordId>,
    pub name: String,
    pub summary: String,
    pub parent_id: Option<RecordId>,
    pub status_id: RecordId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Tale {
    /// Creates an unsaved root tale with the default status.
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        let now = now_clean();
        Self {
            id: None,
            name: name.into(),
            summary: summary.into(),
            parent_id: None,
            status_id: DEFAULT_STATUS_ID,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Creates an unsaved tale nested under `parent_id`.
    pub fn child_of(
        parent_id: RecordId,
        name: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(name, summary)
        }
    }

    /// Refreshes `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = now_clean();
    }

    /// Sets the soft-delete marker.
    pub fn mark_deleted(&mut self) {
        self.deleted_at = Some(now_clean());
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { entity: "tale" });
        }
        if matches!(self.deleted_at, Some(deleted) if deleted < self.created_at) {
            return Err(ValidationError::DeletedBeforeCreated);
        }
        Ok(())
    }
}

impl Display for Tale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tale [{}]: {} ({})", fmt_id(self.id), self.name, self.summary)?;
        writeln!(f, "parent: {}", fmt_id(self.parent_id))?;
        writeln!(f, "status: {}", self.status_id)?;
        writeln!(f, "created: {}", self.created_at.format(DATETIME_FORMAT))?;
        writeln!(f, "updated: {}", self.updated_at.format(DATETIME_FORMAT))
    }
}
