use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require, ModelError};
use crate::table::{default_visible, put, ChildRule, Editable, OnDelete, Record, Row, Table, Visible};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub icon: String,
    pub display_order: i32,
    pub is_visible: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { SubServices }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::SubServices => Entity::has_many(crate::sub_service::Entity).into(),
        }
    }
}

impl Related<crate::sub_service::Entity> for Entity {
    fn to() -> RelationDef { Relation::SubServices.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize)]
pub struct NewService {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServicePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
}

impl Record for Model {
    const TABLE: Table = Table::Services;

    fn id(&self) -> Uuid { self.id }
}

impl Visible for Model {
    fn is_visible(&self) -> bool { self.is_visible }
}

impl Editable for Model {
    type Create = NewService;
    type Patch = ServicePatch;

    const CHILDREN: &'static [ChildRule] = &[ChildRule {
        table: Table::SubServices,
        foreign_key: "service_id",
        on_delete: OnDelete::Restrict,
    }];

    fn create_row(input: NewService) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "title", Some(require("title", &input.title)?));
        put(&mut row, "description", Some(require("description", &input.description)?));
        put(&mut row, "icon", Some(input.icon.trim()));
        put(&mut row, "display_order", Some(input.display_order));
        put(&mut row, "is_visible", Some(input.is_visible));
        Ok(row)
    }

    fn patch_row(patch: ServicePatch) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "title", patch.title.as_deref().map(|t| require("title", t)).transpose()?);
        put(&mut row, "description", patch.description.as_deref().map(|d| require("description", d)).transpose()?);
        put(&mut row, "icon", patch.icon.as_deref().map(str::trim));
        put(&mut row, "display_order", patch.display_order);
        put(&mut row, "is_visible", patch.is_visible);
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, description: &str) -> NewService {
        NewService {
            title: title.into(),
            description: description.into(),
            icon: " camera ".into(),
            display_order: 2,
            is_visible: true,
        }
    }

    #[test]
    fn create_requires_title_and_description() {
        assert!(matches!(Model::create_row(input("  ", "d")), Err(ModelError::Validation(_))));
        let err = Model::create_row(input("Audiovisual", "")).unwrap_err();
        assert_eq!(err.to_string(), "validation error: description is required");

        let row = Model::create_row(input(" Audiovisual ", "Video work")).unwrap();
        assert_eq!(row["title"], "Audiovisual");
        assert_eq!(row["icon"], "camera");
        assert_eq!(row["display_order"], 2);
    }

    #[test]
    fn patch_only_carries_given_fields() {
        let patch: ServicePatch = serde_json::from_str(r#"{"is_visible": false}"#).unwrap();
        let row = Model::patch_row(patch).unwrap();
        assert_eq!(row.len(), 1);
        assert_eq!(row["is_visible"], false);

        let blank = ServicePatch { title: Some(" ".into()), ..Default::default() };
        assert!(Model::patch_row(blank).is_err());
    }

    #[test]
    fn create_body_defaults() {
        let parsed: NewService = serde_json::from_str(r#"{"title":"T","description":"D"}"#).unwrap();
        assert!(parsed.is_visible);
        assert_eq!(parsed.display_order, 0);
        assert_eq!(parsed.icon, "");
    }
}
