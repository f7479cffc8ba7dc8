//! In-process row store.
//!
//! Rows live in insertion order per table; selects sort with a stable sort so
//! rows sharing a sort key keep the order they were inserted in.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashSet;
use models::{Row, Table};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{compare_cells, merge_patch, row_id, stamp_new_row, Query, RowStore, StoreError};
use crate::observability::track;

#[derive(Default)]
pub struct MemoryRowStore {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    failing: DashSet<Table>,
}

impl MemoryRowStore {
    pub fn new() -> Self { Self::default() }

    /// Make every call touching `table` fail with a network error until
    /// [`MemoryRowStore::heal`] is called.
    pub fn fail_table(&self, table: Table) {
        self.failing.insert(table);
    }

    pub fn heal(&self, table: Table) {
        self.failing.remove(&table);
    }

    fn check(&self, table: Table) -> Result<(), StoreError> {
        if self.failing.contains(&table) {
            return Err(StoreError::Network(format!("{table} is unavailable")));
        }
        Ok(())
    }

    pub async fn len(&self, table: Table) -> usize {
        self.tables.read().await.get(&table).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
        let result: Result<Vec<Row>, StoreError> = async {
            self.check(table)?;
            let tables = self.tables.read().await;
            let mut rows: Vec<Row> = tables
                .get(&table)
                .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
                .unwrap_or_default();
            if let Some(order) = &query.order {
                rows.sort_by(|a, b| {
                    let ord = compare_cells(a.get(order.column), b.get(order.column));
                    if order.ascending { ord } else { ord.reverse() }
                });
            }
            Ok(rows)
        }
        .await;
        track("select", result)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, StoreError> {
        let result: Result<Row, StoreError> = async {
            self.check(table)?;
            stamp_new_row(table, &mut row);
            let id = row_id(&row).ok_or_else(|| StoreError::Rejected {
                status: 400,
                message: "id must be a uuid".into(),
            })?;
            let mut tables = self.tables.write().await;
            let rows = tables.entry(table).or_default();
            if rows.iter().any(|r| row_id(r) == Some(id)) {
                return Err(StoreError::Rejected { status: 409, message: format!("duplicate id {id}") });
            }
            rows.push(row.clone());
            debug!(table = %table, id = %id, "memory insert");
            Ok(row)
        }
        .await;
        track("insert", result)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, StoreError> {
        let result: Result<Row, StoreError> = async {
            self.check(table)?;
            let mut tables = self.tables.write().await;
            let row = tables
                .get_mut(&table)
                .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
                .ok_or(StoreError::NotFound)?;
            merge_patch(table, row, patch);
            Ok(row.clone())
        }
        .await;
        track("update", result)
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, StoreError> {
        let result: Result<bool, StoreError> = async {
            self.check(table)?;
            let mut tables = self.tables.write().await;
            let Some(rows) = tables.get_mut(&table) else { return Ok(false) };
            let before = rows.len();
            rows.retain(|r| row_id(r) != Some(id));
            Ok(rows.len() < before)
        }
        .await;
        track("delete", result)
    }
}
