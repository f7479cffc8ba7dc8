//! Hosted row store speaking the PostgREST dialect (`/rest/v1/{table}`).

use std::time::Duration;

use async_trait::async_trait;
use configs::RestConfig;
use models::{Row, Table};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::debug;
use uuid::Uuid;

use super::{now_json, Query, RowStore, StoreError};
use crate::observability::track;

#[derive(Clone)]
pub struct RestRowStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestRowStore {
    pub fn new(cfg: &RestConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn request(&self, method: Method, table: Table) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }
}

/// Query-string pairs for a select.
pub fn select_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for (column, value) in &query.filters {
        params.push((column.to_string(), format!("eq.{}", value.as_param())));
    }
    if let Some(order) = &query.order {
        let dir = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{dir}", order.column)));
    }
    params
}

fn id_param(id: Uuid) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

async fn read_rows(resp: Result<Response, reqwest::Error>) -> Result<Vec<Row>, StoreError> {
    let resp = resp.map_err(|e| StoreError::Network(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(StoreError::Rejected { status: status.as_u16(), message });
    }
    resp.json::<Vec<Row>>().await.map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl RowStore for RestRowStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
        let resp = self.request(Method::GET, table).query(&select_params(query)).send().await;
        track("select", read_rows(resp).await)
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let resp = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await;
        let result = read_rows(resp).await.and_then(|rows| {
            rows.into_iter().next().ok_or_else(|| StoreError::Decode("insert returned no row".into()))
        });
        track("insert", result)
    }

    async fn update(&self, table: Table, id: Uuid, mut patch: Row) -> Result<Row, StoreError> {
        patch.remove("id");
        if table.has_updated_at() {
            patch.insert("updated_at".into(), now_json());
        }
        let resp = self
            .request(Method::PATCH, table)
            .query(&id_param(id))
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await;
        let result = read_rows(resp).await.and_then(|rows| rows.into_iter().next().ok_or(StoreError::NotFound));
        debug!(table = %table, id = %id, ok = result.is_ok(), "rest update");
        track("update", result)
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, StoreError> {
        let resp = self
            .request(Method::DELETE, table)
            .query(&id_param(id))
            .header("Prefer", "return=representation")
            .send()
            .await;
        track("delete", read_rows(resp).await.map(|rows| !rows.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_uses_eq_filters_and_order() {
        let project = Uuid::new_v4();
        let q = Query::new().eq("project_id", project).eq("is_visible", true).order_desc("created_at");
        let params = select_params(&q);
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("project_id".to_string(), format!("eq.{project}")),
                ("is_visible".to_string(), "eq.true".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn table_urls_hang_off_rest_v1() {
        let cfg = RestConfig { url: "https://rows.example.com/".into(), api_key: "anon".into(), timeout_secs: 5 };
        let store = RestRowStore::new(&cfg).unwrap();
        assert_eq!(store.table_url(Table::ProjectGallery), "https://rows.example.com/rest/v1/project_gallery");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let cfg = RestConfig { url: "http://127.0.0.1:1".into(), api_key: "anon".into(), timeout_secs: 1 };
        let store = RestRowStore::new(&cfg).unwrap();
        let err = store.select(Table::Services, &Query::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));
    }
}
