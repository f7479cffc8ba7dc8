use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require, ModelError};
use crate::table::{default_visible, put, Editable, Record, Row, Table, Visible};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_logos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub logo_url: String,
    pub display_order: i32,
    pub is_visible: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize)]
pub struct NewClientLogo {
    pub name: String,
    pub logo_url: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClientLogoPatch {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
}

impl Record for Model {
    const TABLE: Table = Table::ClientLogos;

    fn id(&self) -> Uuid { self.id }
}

impl Visible for Model {
    fn is_visible(&self) -> bool { self.is_visible }
}

impl Editable for Model {
    type Create = NewClientLogo;
    type Patch = ClientLogoPatch;

    fn create_row(input: NewClientLogo) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "name", Some(require("name", &input.name)?));
        put(&mut row, "logo_url", Some(require("logo_url", &input.logo_url)?));
        put(&mut row, "display_order", Some(input.display_order));
        put(&mut row, "is_visible", Some(input.is_visible));
        Ok(row)
    }

    fn patch_row(patch: ClientLogoPatch) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "name", patch.name.as_deref().map(|n| require("name", n)).transpose()?);
        put(&mut row, "logo_url", patch.logo_url.as_deref().map(|u| require("logo_url", u)).transpose()?);
        put(&mut row, "display_order", patch.display_order);
        put(&mut row, "is_visible", patch.is_visible);
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_needs_name_and_url() {
        let input = NewClientLogo { name: "Acme".into(), logo_url: "".into(), display_order: 0, is_visible: true };
        let err = Model::create_row(input).unwrap_err();
        assert_eq!(err.to_string(), "validation error: logo_url is required");
    }
}
