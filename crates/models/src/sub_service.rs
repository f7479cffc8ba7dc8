use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require, ModelError};
use crate::table::{default_visible, put, ChildRule, Editable, OnDelete, ParentRef, Record, Row, Table, Visible};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sub_services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub title: String,
    pub display_order: i32,
    pub is_visible: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service, Projects }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(crate::service::Entity)
                .from(Column::ServiceId)
                .to(crate::service::Column::Id)
                .into(),
            Relation::Projects => Entity::has_many(crate::project::Entity).into(),
        }
    }
}

impl Related<crate::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl Related<crate::project::Entity> for Entity {
    fn to() -> RelationDef { Relation::Projects.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSubService {
    pub service_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubServicePatch {
    pub service_id: Option<Uuid>,
    pub title: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
}

fn parent(id: Uuid) -> ParentRef {
    ParentRef { table: Table::Services, field: "service_id", id }
}

impl Record for Model {
    const TABLE: Table = Table::SubServices;

    fn id(&self) -> Uuid { self.id }
}

impl Visible for Model {
    fn is_visible(&self) -> bool { self.is_visible }
}

impl Editable for Model {
    type Create = NewSubService;
    type Patch = SubServicePatch;

    const CHILDREN: &'static [ChildRule] = &[ChildRule {
        table: Table::Projects,
        foreign_key: "sub_service_id",
        on_delete: OnDelete::Restrict,
    }];

    fn create_row(input: NewSubService) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "service_id", Some(input.service_id));
        put(&mut row, "title", Some(require("title", &input.title)?));
        put(&mut row, "display_order", Some(input.display_order));
        put(&mut row, "is_visible", Some(input.is_visible));
        Ok(row)
    }

    fn patch_row(patch: SubServicePatch) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "service_id", patch.service_id);
        put(&mut row, "title", patch.title.as_deref().map(|t| require("title", t)).transpose()?);
        put(&mut row, "display_order", patch.display_order);
        put(&mut row, "is_visible", patch.is_visible);
        Ok(row)
    }

    fn create_parent(input: &NewSubService) -> Option<ParentRef> { Some(parent(input.service_id)) }

    fn patch_parent(patch: &SubServicePatch) -> Option<ParentRef> { patch.service_id.map(parent) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_points_at_owning_service() {
        let service_id = Uuid::new_v4();
        let input = NewSubService { service_id, title: "Drone".into(), display_order: 0, is_visible: true };
        assert_eq!(Model::create_parent(&input), Some(parent(service_id)));
        let row = Model::create_row(input).unwrap();
        assert_eq!(row["service_id"], service_id.to_string());
    }

    #[test]
    fn missing_parent_id_is_rejected_when_parsing() {
        let parsed: Result<NewSubService, _> = serde_json::from_str(r#"{"title":"Drone"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn patch_moves_only_when_parent_given() {
        assert_eq!(Model::patch_parent(&SubServicePatch::default()), None);
        let blank = SubServicePatch { title: Some("".into()), ..Default::default() };
        assert!(matches!(Model::patch_row(blank), Err(ModelError::Validation(_))));
    }
}
