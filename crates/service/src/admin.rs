//! Write side used by the admin panel.
//!
//! Inputs are validated by the `models` entity before anything is sent to the
//! store; parent references are checked to exist first. Every write goes
//! through the store handed to [`AdminService::new`], so a
//! [`crate::cache::CachedRowStore`] there sees and evicts each one.

use std::sync::Arc;

use models::{Editable, OnDelete, ParentRef, Record, Row, Visible};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::observability::ADMIN_MUTATIONS_TOTAL;
use crate::store::{decode, fetch_one, Query, RowStore, StoreError};

pub struct AdminService<S: RowStore + ?Sized> {
    store: Arc<S>,
}

impl<S: RowStore + ?Sized> Clone for AdminService<S> {
    fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

fn not_found<T: Record>(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("{} {} not found", T::TABLE, id))
}

fn counted(table: models::Table, action: &str) {
    ADMIN_MUTATIONS_TOTAL.with_label_values(&[table.name(), action]).inc();
}

impl<S: RowStore + ?Sized> AdminService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    async fn ensure_parent(&self, parent: ParentRef) -> Result<(), ServiceError> {
        let rows = self.store.select(parent.table, &Query::by_id(parent.id)).await?;
        if rows.is_empty() {
            return Err(ServiceError::Validation(format!("{} {} does not exist", parent.field, parent.id)));
        }
        Ok(())
    }

    pub async fn get<T: Record>(&self, id: Uuid) -> Result<T, ServiceError> {
        fetch_one::<T, S>(self.store.as_ref(), id).await?.ok_or_else(|| not_found::<T>(id))
    }

    #[instrument(skip(self, input), fields(entity = T::TABLE.name()))]
    pub async fn create<T: Editable>(&self, input: T::Create) -> Result<T, ServiceError> {
        let parent = T::create_parent(&input);
        let row = T::create_row(input)?;
        if let Some(parent) = parent {
            self.ensure_parent(parent).await?;
            if T::ONE_PER_PARENT {
                let siblings = self.store.select(T::TABLE, &Query::new().eq(parent.field, parent.id)).await?;
                if !siblings.is_empty() {
                    return Err(ServiceError::Conflict(format!(
                        "{} {} already has a {} row",
                        parent.table, parent.id, T::TABLE
                    )));
                }
            }
        }
        let saved: T = decode(self.store.insert(T::TABLE, row).await?)?;
        counted(T::TABLE, "create");
        info!(entity = %T::TABLE, id = %saved.id(), "created");
        Ok(saved)
    }

    #[instrument(skip(self, patch), fields(entity = T::TABLE.name()))]
    pub async fn update<T: Editable>(&self, id: Uuid, patch: T::Patch) -> Result<T, ServiceError> {
        let parent = T::patch_parent(&patch);
        let row = T::patch_row(patch)?;
        if let Some(parent) = parent {
            self.ensure_parent(parent).await?;
        }
        let updated = self.write_patch::<T>(id, row).await?;
        counted(T::TABLE, "update");
        info!(entity = %T::TABLE, id = %id, "updated");
        Ok(updated)
    }

    async fn write_patch<T: Record>(&self, id: Uuid, row: Row) -> Result<T, ServiceError> {
        match self.store.update(T::TABLE, id, row).await {
            Ok(saved) => Ok(decode(saved)?),
            Err(StoreError::NotFound) => Err(not_found::<T>(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete one row. Restricted children block the delete; cascading
    /// children are removed first. The steps are separate store calls.
    #[instrument(skip(self), fields(entity = T::TABLE.name()))]
    pub async fn delete<T: Editable>(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.store.select(T::TABLE, &Query::by_id(id)).await?.is_empty() {
            return Err(not_found::<T>(id));
        }

        let mut cascade = Vec::new();
        for rule in T::CHILDREN {
            let children = self.store.select(rule.table, &Query::new().eq(rule.foreign_key, id)).await?;
            if children.is_empty() {
                continue;
            }
            match rule.on_delete {
                OnDelete::Restrict => {
                    return Err(ServiceError::Conflict(format!(
                        "{} {} still has {} {} row(s)",
                        T::TABLE,
                        id,
                        children.len(),
                        rule.table
                    )));
                }
                OnDelete::Cascade => cascade.push((rule.table, children)),
            }
        }

        for (table, children) in cascade {
            for child in children {
                if let Some(child_id) = crate::store::row_id(&child) {
                    self.store.delete(table, child_id).await?;
                    counted(table, "delete");
                }
            }
        }

        if !self.store.delete(T::TABLE, id).await? {
            // removed between the existence check and now
            warn!(entity = %T::TABLE, id = %id, "row vanished before delete");
            return Err(not_found::<T>(id));
        }
        counted(T::TABLE, "delete");
        info!(entity = %T::TABLE, id = %id, "deleted");
        Ok(())
    }

    /// Flip `is_visible`.
    #[instrument(skip(self), fields(entity = T::TABLE.name()))]
    pub async fn toggle_visibility<T: Editable + Visible>(&self, id: Uuid) -> Result<T, ServiceError> {
        let current: T = self.get(id).await?;
        let mut patch = Row::new();
        patch.insert("is_visible".into(), serde_json::Value::Bool(!current.is_visible()));
        let updated: T = self.write_patch(id, patch).await?;
        counted(T::TABLE, "toggle_visibility");
        info!(entity = %T::TABLE, id = %id, visible = updated.is_visible(), "visibility toggled");
        Ok(updated)
    }
}
