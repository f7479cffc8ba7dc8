//! Table identities and the traits that let the service layer treat every
//! content entity uniformly.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// A row as exchanged with a row store: a flat JSON object keyed by column.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Services,
    SubServices,
    Projects,
    ProjectMetrics,
    ProjectFeedback,
    ProjectGallery,
    Testimonials,
    ClientLogos,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Services,
        Table::SubServices,
        Table::Projects,
        Table::ProjectMetrics,
        Table::ProjectFeedback,
        Table::ProjectGallery,
        Table::Testimonials,
        Table::ClientLogos,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Services => "services",
            Table::SubServices => "sub_services",
            Table::Projects => "projects",
            Table::ProjectMetrics => "project_metrics",
            Table::ProjectFeedback => "project_feedback",
            Table::ProjectGallery => "project_gallery",
            Table::Testimonials => "testimonials",
            Table::ClientLogos => "client_logos",
        }
    }

    /// Tables carrying an `updated_at` column the store refreshes on update.
    pub fn has_updated_at(self) -> bool {
        !matches!(self, Table::ProjectMetrics | Table::ProjectFeedback | Table::ClientLogos)
    }

    /// Tables carrying an `is_visible` column.
    pub fn has_visibility(self) -> bool {
        !matches!(self, Table::ProjectMetrics | Table::ProjectFeedback)
    }

    /// Foreign key column pointing at the owning row, for tables that have one.
    pub fn parent_key(self) -> Option<&'static str> {
        match self {
            Table::SubServices => Some("service_id"),
            Table::Projects => Some("sub_service_id"),
            Table::ProjectMetrics | Table::ProjectFeedback | Table::ProjectGallery => Some("project_id"),
            _ => None,
        }
    }

    /// Column sibling lists are sorted by.
    pub fn order_column(self) -> &'static str {
        match self {
            Table::ProjectFeedback => "created_at",
            _ => "display_order",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed row of one table.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: Table;

    fn id(&self) -> Uuid;
}

/// Records with an `is_visible` flag.
pub trait Visible: Record {
    fn is_visible(&self) -> bool;
}

/// A parent row a create or patch points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentRef {
    pub table: Table,
    pub field: &'static str,
    pub id: Uuid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    /// Refuse to delete the parent while children exist.
    Restrict,
    /// Delete the children before the parent.
    Cascade,
}

/// A table whose rows reference this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildRule {
    pub table: Table,
    pub foreign_key: &'static str,
    pub on_delete: OnDelete,
}

/// Records the admin panel can create and patch.
///
/// `create_row` and `patch_row` validate every field they see and return the
/// columns to write; nothing here touches a store.
pub trait Editable: Record {
    type Create: DeserializeOwned + Send + Sync + 'static;
    type Patch: DeserializeOwned + Send + Sync + 'static;

    /// Child tables and what deleting a row of this table does to them.
    const CHILDREN: &'static [ChildRule] = &[];

    /// At most one row of this table per parent.
    const ONE_PER_PARENT: bool = false;

    fn create_row(input: Self::Create) -> Result<Row, ModelError>;

    fn patch_row(patch: Self::Patch) -> Result<Row, ModelError>;

    fn create_parent(_input: &Self::Create) -> Option<ParentRef> { None }

    fn patch_parent(_patch: &Self::Patch) -> Option<ParentRef> { None }
}

/// Serialize a value into a row. Inputs are plain structs, so failure here is a bug
/// in the caller's types rather than bad user data.
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, ModelError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(ModelError::Db(format!("expected a JSON object, got {other}"))),
        Err(e) => Err(ModelError::Db(e.to_string())),
    }
}

/// Insert `value` under `key` when present.
pub fn put<T: Serialize>(row: &mut Row, key: &str, value: Option<T>) {
    if let Some(v) = value {
        row.insert(key.to_string(), serde_json::json!(v));
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
/// in patch bodies.
pub fn nullable<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

pub(crate) fn default_visible() -> bool { true }

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn nullable_separates_missing_from_null() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.note, None);
        let null: Patch = serde_json::from_str(r#"{"note":null}"#).unwrap();
        assert_eq!(null.note, Some(None));
        let set: Patch = serde_json::from_str(r#"{"note":"x"}"#).unwrap();
        assert_eq!(set.note, Some(Some("x".into())));
    }

    #[test]
    fn only_metrics_and_feedback_lack_visibility() {
        let hidden: Vec<_> = Table::ALL.iter().filter(|t| !t.has_visibility()).collect();
        assert_eq!(hidden, vec![&Table::ProjectMetrics, &Table::ProjectFeedback]);
        assert_eq!(Table::ProjectFeedback.order_column(), "created_at");
        assert_eq!(Table::SubServices.to_string(), "sub_services");
    }

    #[test]
    fn child_tables_name_their_parent_key() {
        assert_eq!(Table::Services.parent_key(), None);
        assert_eq!(Table::Projects.parent_key(), Some("sub_service_id"));
        assert_eq!(Table::ProjectGallery.parent_key(), Some("project_id"));
        assert_eq!(Table::Testimonials.parent_key(), None);
    }
}
