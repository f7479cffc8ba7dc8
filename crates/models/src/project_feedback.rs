use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require, ModelError};
use crate::table::{put, Editable, ParentRef, Record, Row, Table};

/// Client quote attached to a project. At most one per project; the schema
/// carries a unique index on `project_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub feedback_text: String,
    pub author_name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Project }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Project => Entity::belongs_to(crate::project::Entity)
                .from(Column::ProjectId)
                .to(crate::project::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::project::Entity> for Entity {
    fn to() -> RelationDef { Relation::Project.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize)]
pub struct NewProjectFeedback {
    pub project_id: Uuid,
    pub feedback_text: String,
    pub author_name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectFeedbackPatch {
    pub feedback_text: Option<String>,
    pub author_name: Option<String>,
}

impl Record for Model {
    const TABLE: Table = Table::ProjectFeedback;

    fn id(&self) -> Uuid { self.id }
}

impl Editable for Model {
    type Create = NewProjectFeedback;
    type Patch = ProjectFeedbackPatch;

    const ONE_PER_PARENT: bool = true;

    fn create_row(input: NewProjectFeedback) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "project_id", Some(input.project_id));
        put(&mut row, "feedback_text", Some(require("feedback_text", &input.feedback_text)?));
        put(&mut row, "author_name", Some(require("author_name", &input.author_name)?));
        Ok(row)
    }

    fn patch_row(patch: ProjectFeedbackPatch) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(
            &mut row,
            "feedback_text",
            patch.feedback_text.as_deref().map(|t| require("feedback_text", t)).transpose()?,
        );
        put(
            &mut row,
            "author_name",
            patch.author_name.as_deref().map(|a| require("author_name", a)).transpose()?,
        );
        Ok(row)
    }

    fn create_parent(input: &NewProjectFeedback) -> Option<ParentRef> {
        Some(ParentRef { table: Table::Projects, field: "project_id", id: input.project_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_and_text_are_required() {
        let input = NewProjectFeedback {
            project_id: Uuid::new_v4(),
            feedback_text: "Great footage".into(),
            author_name: "".into(),
        };
        let err = Model::create_row(input).unwrap_err();
        assert_eq!(err.to_string(), "validation error: author_name is required");
    }

    #[test]
    fn feedback_cannot_move_between_projects() {
        let patch: ProjectFeedbackPatch =
            serde_json::from_str(r#"{"author_name":"Roberto","project_id":"00000000-0000-0000-0000-000000000000"}"#)
                .unwrap();
        let row = Model::patch_row(patch).unwrap();
        assert_eq!(row.len(), 1);
        assert_eq!(row["author_name"], "Roberto");
    }
}
