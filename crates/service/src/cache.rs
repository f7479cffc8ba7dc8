//! Query cache in front of a row store.
//!
//! Entries are keyed by table and query. A write to a table evicts that
//! table's entries before the write call returns. Each table also carries a
//! generation counter bumped on every write; a select only keeps its result
//! when the generation it started under is still current afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use models::{Row, Table};
use tracing::debug;
use uuid::Uuid;

use crate::observability::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};
use crate::store::{Query, RowStore, StoreError};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    table: Table,
    query: Query,
}

pub struct CachedRowStore<S: RowStore + ?Sized> {
    inner: Arc<S>,
    entries: DashMap<CacheKey, Arc<Vec<Row>>>,
    generations: DashMap<Table, u64>,
}

impl<S: RowStore + ?Sized> CachedRowStore<S> {
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner, entries: DashMap::new(), generations: DashMap::new() }
    }

    fn generation(&self, table: Table) -> u64 {
        self.generations.get(&table).map(|g| *g).unwrap_or(0)
    }

    /// Drop every cached result for `table`.
    pub fn invalidate(&self, table: Table) {
        *self.generations.entry(table).or_insert(0) += 1;
        self.entries.retain(|key, _| key.table != table);
        debug!(table = %table, "cache invalidated");
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[async_trait]
impl<S: RowStore + ?Sized> RowStore for CachedRowStore<S> {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
        let key = CacheKey { table, query: query.clone() };
        if let Some(hit) = self.entries.get(&key) {
            CACHE_HITS_TOTAL.inc();
            return Ok(hit.value().as_ref().clone());
        }
        CACHE_MISSES_TOTAL.inc();

        let started = self.generation(table);
        let rows = self.inner.select(table, query).await?;
        self.entries.insert(key.clone(), Arc::new(rows.clone()));
        // a write landed while we were reading
        if self.generation(table) != started {
            self.entries.remove(&key);
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let result = self.inner.insert(table, row).await;
        self.invalidate(table);
        result
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, StoreError> {
        let result = self.inner.update(table, id, patch).await;
        self.invalidate(table);
        result
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, StoreError> {
        let result = self.inner.delete(table, id).await;
        self.invalidate(table);
        result
    }
}
