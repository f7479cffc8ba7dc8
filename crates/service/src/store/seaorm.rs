//! Direct Postgres row store over the `models` entities.

use std::str::FromStr;

use async_trait::async_trait;
use models::{Row, Table};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    SqlErr,
};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::{merge_patch, stamp_new_row, Query, RowStore, StoreError, Value};
use crate::observability::track;

pub struct SeaOrmRowStore {
    db: DatabaseConnection,
}

impl SeaOrmRowStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_err(e: DbErr) -> StoreError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            StoreError::Rejected { status: 409, message: msg }
        }
        _ => StoreError::Db(e.to_string()),
    }
}

fn unknown_column(column: &str) -> StoreError {
    StoreError::Rejected { status: 400, message: format!("unknown column {column}") }
}

fn to_row<M: Serialize>(model: &M) -> Result<Row, StoreError> {
    models::table::to_row(model).map_err(|e| StoreError::Decode(e.to_string()))
}

fn from_row<M: DeserializeOwned>(row: Row) -> Result<M, StoreError> {
    serde_json::from_value(serde_json::Value::Object(row)).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Run `$body` with `$m` bound to the entity module of `$table`.
macro_rules! with_entity {
    ($table:expr, $m:ident => $body:block) => {
        match $table {
            Table::Services => { use models::service as $m; $body }
            Table::SubServices => { use models::sub_service as $m; $body }
            Table::Projects => { use models::project as $m; $body }
            Table::ProjectMetrics => { use models::project_metric as $m; $body }
            Table::ProjectFeedback => { use models::project_feedback as $m; $body }
            Table::ProjectGallery => { use models::project_gallery as $m; $body }
            Table::Testimonials => { use models::testimonial as $m; $body }
            Table::ClientLogos => { use models::client_logo as $m; $body }
        }
    };
}

#[async_trait]
impl RowStore for SeaOrmRowStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
        let result: Result<Vec<Row>, StoreError> = with_entity!(table, m => {
            let mut finder = m::Entity::find();
            for (column, value) in &query.filters {
                let col = m::Column::from_str(column).map_err(|_| unknown_column(column))?;
                finder = match value {
                    Value::Bool(b) => finder.filter(col.eq(*b)),
                    Value::Uuid(u) => finder.filter(col.eq(*u)),
                };
            }
            if let Some(order) = &query.order {
                let col = m::Column::from_str(order.column).map_err(|_| unknown_column(order.column))?;
                finder = if order.ascending { finder.order_by_asc(col) } else { finder.order_by_desc(col) };
            }
            // insertion order among equal sort keys
            finder = finder.order_by_asc(m::Column::CreatedAt).order_by_asc(m::Column::Id);
            match finder.all(&self.db).await {
                Ok(models) => models.iter().map(to_row).collect(),
                Err(e) => Err(db_err(e)),
            }
        });
        track("select", result)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, StoreError> {
        stamp_new_row(table, &mut row);
        let result: Result<Row, StoreError> = with_entity!(table, m => {
            match from_row::<m::Model>(row) {
                Ok(model) => match model.into_active_model().reset_all().insert(&self.db).await {
                    Ok(saved) => to_row(&saved),
                    Err(e) => Err(db_err(e)),
                },
                Err(e) => Err(e),
            }
        });
        track("insert", result)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, StoreError> {
        let result: Result<Row, StoreError> = with_entity!(table, m => {
            match m::Entity::find_by_id(id).one(&self.db).await {
                Err(e) => Err(db_err(e)),
                Ok(None) => Err(StoreError::NotFound),
                Ok(Some(existing)) => {
                    let merged = to_row(&existing).and_then(|mut current| {
                        merge_patch(table, &mut current, patch);
                        from_row::<m::Model>(current)
                    });
                    match merged {
                        Ok(model) => match model.into_active_model().reset_all().update(&self.db).await {
                            Ok(saved) => to_row(&saved),
                            Err(e) => Err(db_err(e)),
                        },
                        Err(e) => Err(e),
                    }
                }
            }
        });
        track("update", result)
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, StoreError> {
        let result: Result<bool, StoreError> = with_entity!(table, m => {
            m::Entity::delete_by_id(id)
                .exec(&self.db)
                .await
                .map(|res| res.rows_affected > 0)
                .map_err(db_err)
        });
        track("delete", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fetch;
    use crate::test_support::{get_db, skip_db_tests};
    use serde_json::json;

    #[tokio::test]
    async fn postgres_round_trip() {
        if skip_db_tests() {
            return;
        }
        let db = get_db().await.expect("db");
        let store = SeaOrmRowStore::new(db);
        let title = format!("svc-{}", Uuid::new_v4());
        let row = json!({"title": title, "description": "d", "icon": "", "display_order": 0, "is_visible": true});
        let created = store.insert(Table::Services, row.as_object().cloned().unwrap()).await.unwrap();
        let id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();

        let patch = json!({"is_visible": false}).as_object().cloned().unwrap();
        let updated = store.update(Table::Services, id, patch).await.unwrap();
        assert_eq!(updated["is_visible"], false);
        assert_eq!(updated["title"], title.as_str());

        let hidden: Vec<models::service::Model> =
            fetch(&store, &Query::new().eq("id", id).eq("is_visible", false)).await.unwrap();
        assert_eq!(hidden.len(), 1);

        assert!(store.delete(Table::Services, id).await.unwrap());
        assert!(matches!(store.update(Table::Services, id, Row::new()).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn unknown_filter_column_is_rejected() {
        if skip_db_tests() {
            return;
        }
        let store = SeaOrmRowStore::new(get_db().await.expect("db"));
        let err = store.select(Table::Services, &Query::new().eq("nope", true)).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { status: 400, .. }));
    }
}
