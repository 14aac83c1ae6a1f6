//! Status persistence mapping.

use super::crud::SqliteRepository;
use super::{Entity, RepoResult, RowReader};
use crate::db::SqlArg;
use crate::model::status::Status;
use crate::model::{RecordId, ValidationError};

/// Plain CRUD over the `status` table.
pub type StatusRepository<'db> = SqliteRepository<'db, Status>;

impl Entity for Status {
    const TABLE: &'static str = "status";
    const COLUMNS: &'static [&'static str] = &["id", "name", "color"];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn to_args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::Text(self.name.clone()),
            SqlArg::Text(self.color.clone()),
        ]
    }

    fn from_row(reader: &mut RowReader<'_, '_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(reader.take()?),
            name: reader.take()?,
            color: reader.take()?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Status::validate(self)
    }
}
