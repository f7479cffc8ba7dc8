use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{optional, require, ModelError};
use crate::table::{nullable, put, Editable, ParentRef, Record, Row, Table};

/// A headline figure shown on a project card. `value` is display text and may
/// carry currency or percent signs.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub label: String,
    pub value: String,
    pub change_percentage: Option<String>,
    pub change_type: Option<String>,
    pub display_order: i32,
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

pub const CHANGE_TYPES: [&str; 3] = ["positive", "negative", "neutral"];

pub fn validate_change_type(value: Option<String>) -> Result<Option<String>, ModelError> {
    match optional(value) {
        None => Ok(None),
        Some(v) => {
            let lower = v.to_ascii_lowercase();
            if CHANGE_TYPES.contains(&lower.as_str()) {
                Ok(Some(lower))
            } else {
                Err(ModelError::Validation(format!("change_type must be one of {}", CHANGE_TYPES.join(", "))))
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewProjectMetric {
    pub project_id: Uuid,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub change_percentage: Option<String>,
    #[serde(default)]
    pub change_type: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectMetricPatch {
    pub project_id: Option<Uuid>,
    pub label: Option<String>,
    pub value: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub change_percentage: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub change_type: Option<Option<String>>,
    pub display_order: Option<i32>,
}

fn parent(id: Uuid) -> ParentRef {
    ParentRef { table: Table::Projects, field: "project_id", id }
}

impl Record for Model {
    const TABLE: Table = Table::ProjectMetrics;

    fn id(&self) -> Uuid { self.id }
}

impl Editable for Model {
    type Create = NewProjectMetric;
    type Patch = ProjectMetricPatch;

    fn create_row(input: NewProjectMetric) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "project_id", Some(input.project_id));
        put(&mut row, "label", Some(require("label", &input.label)?));
        put(&mut row, "value", Some(require("value", &input.value)?));
        put(&mut row, "change_percentage", Some(optional(input.change_percentage)));
        put(&mut row, "change_type", Some(validate_change_type(input.change_type)?));
        put(&mut row, "display_order", Some(input.display_order));
        Ok(row)
    }

    fn patch_row(patch: ProjectMetricPatch) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "project_id", patch.project_id);
        put(&mut row, "label", patch.label.as_deref().map(|l| require("label", l)).transpose()?);
        put(&mut row, "value", patch.value.as_deref().map(|v| require("value", v)).transpose()?);
        put(&mut row, "change_percentage", patch.change_percentage.map(optional));
        put(&mut row, "change_type", patch.change_type.map(validate_change_type).transpose()?);
        put(&mut row, "display_order", patch.display_order);
        Ok(row)
    }

    fn create_parent(input: &NewProjectMetric) -> Option<ParentRef> { Some(parent(input.project_id)) }

    fn patch_parent(patch: &ProjectMetricPatch) -> Option<ParentRef> { patch.project_id.map(parent) }
}
