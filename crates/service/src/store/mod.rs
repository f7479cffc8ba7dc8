//! Row store contract.
//!
//! Every backend speaks flat JSON rows keyed by column name. Queries are
//! limited to what the site needs: equality predicates and one order column.
//! Typed access goes through [`fetch`], which decodes rows into `models` records.

pub mod memory;
pub mod rest;
pub mod seaorm;

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{Record, Row, Table};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryRowStore;
pub use rest::RestRowStore;
pub use seaorm::SeaOrmRowStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("row store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("row not found")]
    NotFound,
    #[error("decode error: {0}")]
    Decode(String),
    #[error("database error: {0}")]
    Db(String),
}

/// A value an equality predicate compares against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Bool(bool),
    Uuid(Uuid),
}

impl Value {
    /// Text form used in query strings.
    pub fn as_param(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Uuid(u) => u.to_string(),
        }
    }

    fn matches(&self, cell: Option<&serde_json::Value>) -> bool {
        match (self, cell) {
            (Value::Bool(want), Some(serde_json::Value::Bool(have))) => want == have,
            (Value::Uuid(want), Some(serde_json::Value::String(have))) => {
                Uuid::parse_str(have).map(|have| &have == want).unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self { Value::Uuid(u) }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Query {
    pub filters: Vec<(&'static str, Value)>,
    pub order: Option<Order>,
}

impl Query {
    pub fn new() -> Self { Self::default() }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    pub fn order_by(mut self, column: &'static str) -> Self {
        self.order = Some(Order { column, ascending: true });
        self
    }

    pub fn order_desc(mut self, column: &'static str) -> Self {
        self.order = Some(Order { column, ascending: false });
        self
    }

    /// Rows of `table` matching `id`.
    pub fn by_id(id: Uuid) -> Self { Self::new().eq("id", id) }

    /// Optional `is_visible = true` predicate, then the table's sibling order.
    pub fn listing(table: Table, visible_only: bool) -> Self {
        let mut q = Self::new();
        if visible_only && table.has_visibility() {
            q = q.eq("is_visible", true);
        }
        q.order_by(table.order_column())
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|(column, value)| value.matches(row.get(*column)))
    }
}

#[async_trait]
pub trait RowStore: Send + Sync {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Insert one row. The store fills `id`, `created_at` and, where the table
    /// has one, `updated_at` when absent.
    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError>;

    /// Shallow-merge `patch` into the row with `id`. `StoreError::NotFound`
    /// when no such row exists.
    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, StoreError>;

    /// `true` when a row was removed.
    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, StoreError>;
}

/// Select and decode rows of `T`'s table.
pub async fn fetch<T, S>(store: &S, query: &Query) -> Result<Vec<T>, StoreError>
where
    T: Record,
    S: RowStore + ?Sized,
{
    let rows = store.select(T::TABLE, query).await?;
    rows.into_iter().map(decode::<T>).collect()
}

pub async fn fetch_one<T, S>(store: &S, id: Uuid) -> Result<Option<T>, StoreError>
where
    T: Record,
    S: RowStore + ?Sized,
{
    Ok(fetch::<T, S>(store, &Query::by_id(id)).await?.into_iter().next())
}

/// Decode one row. A null `is_visible` reads as hidden, the same way the
/// `is_visible = true` filter treats it.
pub fn decode<T: Record>(mut row: Row) -> Result<T, StoreError> {
    if T::TABLE.has_visibility() && row.get("is_visible").map_or(true, serde_json::Value::is_null) {
        row.insert("is_visible".into(), serde_json::Value::Bool(false));
    }
    serde_json::from_value(serde_json::Value::Object(row))
        .map_err(|e| StoreError::Decode(format!("{}: {e}", T::TABLE)))
}

pub(crate) fn now_json() -> serde_json::Value {
    serde_json::Value::String(Utc::now().to_rfc3339())
}

/// Fill the columns a store assigns on insert.
pub(crate) fn stamp_new_row(table: Table, row: &mut Row) {
    row.entry("id").or_insert_with(|| serde_json::Value::String(Uuid::new_v4().to_string()));
    let now = now_json();
    row.entry("created_at").or_insert_with(|| now.clone());
    if table.has_updated_at() {
        row.entry("updated_at").or_insert(now);
    }
}

/// Merge `patch` over `row`, leaving the primary key alone.
pub(crate) fn merge_patch(table: Table, row: &mut Row, patch: Row) {
    for (column, value) in patch {
        if column == "id" {
            continue;
        }
        row.insert(column, value);
    }
    if table.has_updated_at() {
        row.insert("updated_at".into(), now_json());
    }
}

pub(crate) fn row_id(row: &Row) -> Option<Uuid> {
    row.get("id").and_then(|v| v.as_str()).and_then(|s| Uuid::parse_str(s).ok())
}

/// Order two cells of the same column. Nulls sort first; timestamps compare
/// as instants regardless of offset.
pub(crate) fn compare_cells(a: Option<&serde_json::Value>, b: Option<&serde_json::Value>) -> Ordering {
    use serde_json::Value as J;
    match (a, b) {
        (Some(J::Number(x)), Some(J::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or_default(), y.as_f64().unwrap_or_default());
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(J::String(x)), Some(J::String(y))) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(J::Bool(x)), Some(J::Bool(y))) => x.cmp(y),
        (None | Some(J::Null), None | Some(J::Null)) => Ordering::Equal,
        (None | Some(J::Null), _) => Ordering::Less,
        (_, None | Some(J::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn listing_skips_visibility_for_tables_without_it() {
        let public = Query::listing(Table::Projects, true);
        assert_eq!(public.filters, vec![("is_visible", Value::Bool(true))]);
        let metrics = Query::listing(Table::ProjectMetrics, true);
        assert!(metrics.filters.is_empty());
        assert_eq!(metrics.order, Some(Order { column: "display_order", ascending: true }));
        assert!(Query::listing(Table::Services, false).filters.is_empty());
    }

    #[test]
    fn predicates_compare_uuids_by_value() {
        let id = Uuid::new_v4();
        let r = row(json!({"project_id": id.to_string().to_uppercase(), "is_visible": true}));
        assert!(Query::new().eq("project_id", id).eq("is_visible", true).matches(&r));
        assert!(!Query::new().eq("project_id", Uuid::new_v4()).matches(&r));
        assert!(!Query::new().eq("missing", true).matches(&r));
    }

    #[test]
    fn timestamps_compare_as_instants() {
        let a = json!("2024-01-01T10:00:00+02:00");
        let b = json!("2024-01-01T09:00:00+00:00");
        assert_eq!(compare_cells(Some(&a), Some(&b)), Ordering::Less);
        assert_eq!(compare_cells(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_cells(None, Some(&json!(0))), Ordering::Less);
    }

    #[test]
    fn stamping_keeps_given_values() {
        let mut r = row(json!({"created_at": "2020-01-01T00:00:00+00:00"}));
        stamp_new_row(Table::ClientLogos, &mut r);
        assert!(row_id(&r).is_some());
        assert_eq!(r["created_at"], "2020-01-01T00:00:00+00:00");
        assert!(!r.contains_key("updated_at"));
    }

    #[test]
    fn merge_never_rewrites_the_id() {
        let id = Uuid::new_v4();
        let mut r = row(json!({"id": id.to_string(), "title": "old"}));
        merge_patch(Table::Services, &mut r, row(json!({"id": Uuid::new_v4().to_string(), "title": "new"})));
        assert_eq!(row_id(&r), Some(id));
        assert_eq!(r["title"], "new");
        assert!(r.contains_key("updated_at"));
    }

    #[test]
    fn null_visibility_decodes_as_hidden() {
        let logo = |visible: serde_json::Value| {
            row(json!({
                "id": Uuid::new_v4().to_string(),
                "name": "Acme",
                "logo_url": "https://cdn.example.com/acme.svg",
                "display_order": 0,
                "is_visible": visible,
                "created_at": "2024-01-01T00:00:00+00:00",
            }))
        };
        let hidden: models::client_logo::Model = decode(logo(serde_json::Value::Null)).unwrap();
        assert!(!hidden.is_visible);
        let shown: models::client_logo::Model = decode(logo(json!(true))).unwrap();
        assert!(shown.is_visible);
    }
}
