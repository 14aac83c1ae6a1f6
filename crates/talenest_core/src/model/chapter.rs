//! Chapter body belonging to one tale.

use super::{fmt_id, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: Option<RecordId>,
    pub content: String,
    /// Sentiment score computed by analysis tooling; `0.0` when unscored.
    pub sentiment: f64,
    pub tale_id: RecordId,
}

impl Chapter {
    pub fn new(tale_id: RecordId, content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            sentiment: 0.0,
            tale_id,
        }
    }
}

impl Display for Chapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Chapter {} [{}]:", fmt_id(self.id), self.tale_id)?;
        writeln!(f, "{}", self.content)
    }
}
