use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require, ModelError};
use crate::table::{default_visible, put, Editable, Record, Row, Table, Visible};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "testimonials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub company: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub rating: i32,
    /// Free-text label of the service the client bought.
    pub service: String,
    pub display_order: i32,
    pub is_visible: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rating(rating: i32) -> Result<i32, ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(ModelError::Validation("rating must be between 1 and 5".into()));
    }
    Ok(rating)
}

fn default_rating() -> i32 { 5 }

#[derive(Clone, Debug, Deserialize)]
pub struct NewTestimonial {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    pub content: String,
    #[serde(default = "default_rating")]
    pub rating: i32,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TestimonialPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i32>,
    pub service: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
}

impl Record for Model {
    const TABLE: Table = Table::Testimonials;

    fn id(&self) -> Uuid { self.id }
}

impl Visible for Model {
    fn is_visible(&self) -> bool { self.is_visible }
}

impl Editable for Model {
    type Create = NewTestimonial;
    type Patch = TestimonialPatch;

    fn create_row(input: NewTestimonial) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "name", Some(require("name", &input.name)?));
        put(&mut row, "role", Some(input.role.trim()));
        put(&mut row, "company", Some(input.company.trim()));
        put(&mut row, "content", Some(require("content", &input.content)?));
        put(&mut row, "rating", Some(validate_rating(input.rating)?));
        put(&mut row, "service", Some(input.service.trim()));
        put(&mut row, "display_order", Some(input.display_order));
        put(&mut row, "is_visible", Some(input.is_visible));
        Ok(row)
    }

    fn patch_row(patch: TestimonialPatch) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "name", patch.name.as_deref().map(|n| require("name", n)).transpose()?);
        put(&mut row, "role", patch.role.as_deref().map(str::trim));
        put(&mut row, "company", patch.company.as_deref().map(str::trim));
        put(&mut row, "content", patch.content.as_deref().map(|c| require("content", c)).transpose()?);
        put(&mut row, "rating", patch.rating.map(validate_rating).transpose()?);
        put(&mut row, "service", patch.service.as_deref().map(str::trim));
        put(&mut row, "display_order", patch.display_order);
        put(&mut row, "is_visible", patch.is_visible);
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_outside_one_to_five_is_rejected() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert_eq!(validate_rating(3).unwrap(), 3);
        let patch = TestimonialPatch { rating: Some(9), ..Default::default() };
        assert!(matches!(Model::patch_row(patch), Err(ModelError::Validation(_))));
    }

    #[test]
    fn minimal_body_gets_defaults() {
        let input: NewTestimonial = serde_json::from_str(r#"{"name":"Ana","content":"Loved it"}"#).unwrap();
        let row = Model::create_row(input).unwrap();
        assert_eq!(row["rating"], 5);
        assert_eq!(row["company"], "");
        assert_eq!(row["is_visible"], true);
    }
}
