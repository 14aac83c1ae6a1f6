//! Workflow status attached to tales.

use super::{fmt_id, RecordId, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identity of the status seeded by the first migration.
pub const DEFAULT_STATUS_ID: RecordId = 1;

static COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{6}$").expect("valid color regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: Option<RecordId>,
    pub name: String,
    /// Hex RGB without leading `#`, e.g. `008000`.
    pub color: String,
}

impl Status {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
        }
    }

    /// The seeded "New" status every tale starts with.
    pub fn default_status() -> Self {
        Self {
            id: Some(DEFAULT_STATUS_ID),
            name: "New".to_string(),
            color: "008000".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { entity: "status" });
        }
        if !COLOR_PATTERN.is_match(&self.color) {
            return Err(ValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "status {}: {}, {}", fmt_id(self.id), self.name, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::Status;
    use crate::model::ValidationError;

    #[test]
    fn default_status_is_valid() {
        let status = Status::default_status();
        assert_eq!(status.id, Some(1));
        assert!(status.validate().is_ok());
        assert_eq!(status.to_string(), "status 1: New, 008000");
    }

    #[test]
    fn rejects_malformed_colors() {
        for color in ["", "#008000", "00800", "zzzzzz", "0080000"] {
            let status = Status::new("Draft", color);
            assert!(matches!(
                status.validate(),
                Err(ValidationError::InvalidColor(_))
            ));
        }
        assert!(Status::new("Draft", "A0b1C2").validate().is_ok());
    }
}
