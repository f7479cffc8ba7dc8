//! Read side: the nested service catalog and the flat lists beside it.
//!
//! Every load is all-or-nothing. The five catalog tables are fetched
//! concurrently and the first failure aborts the whole assembly, so callers
//! never see a tree built from partial data.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use models::media::Media;
use models::{
    client_logo, project, project_feedback, project_gallery, project_metric, service, sub_service, testimonial,
    Record, Table,
};
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::observability::{CATALOG_LOADS_TOTAL, CATALOG_LOAD_DURATION};
use crate::store::{decode, fetch, Query, RowStore, StoreError};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceNode {
    #[serde(flatten)]
    pub service: service::Model,
    pub sub_services: Vec<SubServiceNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubServiceNode {
    #[serde(flatten)]
    pub sub_service: sub_service::Model,
    pub projects: Vec<ProjectNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectNode {
    #[serde(flatten)]
    pub project: project::Model,
    pub video: Option<Media>,
    pub metrics: Vec<project_metric::Model>,
    pub feedback: Option<project_feedback::Model>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GalleryItem {
    #[serde(flatten)]
    pub item: project_gallery::Model,
    pub media: Option<Media>,
}

impl From<project_gallery::Model> for GalleryItem {
    fn from(item: project_gallery::Model) -> Self {
        let media = item.media();
        Self { item, media }
    }
}

/// Group rows by parent id, keeping their fetched order inside each group.
fn group_by<T, F>(rows: Vec<T>, parent: F) -> HashMap<Uuid, Vec<T>>
where
    F: Fn(&T) -> Uuid,
{
    let mut groups: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(parent(&row)).or_default().push(row);
    }
    groups
}

/// Like [`fetch`], but rows with a null or missing parent key are orphans and
/// are skipped instead of failing the decode.
async fn fetch_attached<T, S>(store: &S, query: &Query) -> Result<Vec<T>, StoreError>
where
    T: Record,
    S: RowStore + ?Sized,
{
    let rows = store.select(T::TABLE, query).await?;
    let total = rows.len();
    let attached: Vec<T> = match T::TABLE.parent_key() {
        Some(key) => rows
            .into_iter()
            .filter(|row| row.get(key).is_some_and(|v| !v.is_null()))
            .map(decode::<T>)
            .collect::<Result<_, _>>()?,
        None => rows.into_iter().map(decode::<T>).collect::<Result<_, _>>()?,
    };
    if attached.len() < total {
        debug!(table = %T::TABLE, skipped = total - attached.len(), "rows without a parent skipped");
    }
    Ok(attached)
}

pub struct CatalogService<S: RowStore + ?Sized> {
    store: Arc<S>,
}

impl<S: RowStore + ?Sized> Clone for CatalogService<S> {
    fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: RowStore + ?Sized> CatalogService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    /// Services with their sub-services, projects, metrics and feedback.
    ///
    /// With `visible_only`, hidden services, sub-services and projects are
    /// dropped along with everything below them. Metrics and feedback have no
    /// visibility of their own and follow their project.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self, visible_only: bool) -> Result<Vec<ServiceNode>, ServiceError> {
        CATALOG_LOADS_TOTAL.inc();
        let started = Instant::now();
        let store = self.store.as_ref();

        let services_q = Query::listing(Table::Services, visible_only);
        let subs_q = Query::listing(Table::SubServices, visible_only);
        let projects_q = Query::listing(Table::Projects, visible_only);
        let metrics_q = Query::listing(Table::ProjectMetrics, visible_only);
        let feedback_q = Query::listing(Table::ProjectFeedback, visible_only);

        let (services, subs, projects, metrics, feedback) = tokio::try_join!(
            fetch::<service::Model, S>(store, &services_q),
            fetch_attached::<sub_service::Model, S>(store, &subs_q),
            fetch_attached::<project::Model, S>(store, &projects_q),
            fetch_attached::<project_metric::Model, S>(store, &metrics_q),
            fetch_attached::<project_feedback::Model, S>(store, &feedback_q),
        )?;

        let mut subs_by_service = group_by(subs, |s| s.service_id);
        let mut projects_by_sub = group_by(projects, |p| p.sub_service_id);
        let mut metrics_by_project = group_by(metrics, |m| m.project_id);
        // earliest feedback wins
        let mut feedback_by_project: HashMap<Uuid, project_feedback::Model> = HashMap::new();
        for f in feedback {
            feedback_by_project.entry(f.project_id).or_insert(f);
        }

        let tree: Vec<ServiceNode> = services
            .into_iter()
            .map(|service| {
                let sub_services = subs_by_service
                    .remove(&service.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|sub_service| {
                        let projects = projects_by_sub
                            .remove(&sub_service.id)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|project| ProjectNode {
                                video: project.video(),
                                metrics: metrics_by_project.remove(&project.id).unwrap_or_default(),
                                feedback: feedback_by_project.remove(&project.id),
                                project,
                            })
                            .collect();
                        SubServiceNode { sub_service, projects }
                    })
                    .collect();
                ServiceNode { service, sub_services }
            })
            .collect();

        CATALOG_LOAD_DURATION.observe(started.elapsed().as_secs_f64());
        debug!(services = tree.len(), "catalog assembled");
        Ok(tree)
    }

    /// Gallery of one project in display order.
    #[instrument(skip(self))]
    pub async fn load_gallery(&self, project_id: Uuid, visible_only: bool) -> Result<Vec<GalleryItem>, ServiceError> {
        self.list_gallery(Some(project_id), visible_only).await
    }

    /// Gallery items of one project, or of every project when `project_id` is `None`.
    pub async fn list_gallery(
        &self,
        project_id: Option<Uuid>,
        visible_only: bool,
    ) -> Result<Vec<GalleryItem>, ServiceError> {
        let mut query = Query::listing(Table::ProjectGallery, visible_only);
        if let Some(id) = project_id {
            query = query.eq("project_id", id);
        }
        let items = fetch_attached::<project_gallery::Model, S>(self.store.as_ref(), &query).await?;
        Ok(items.into_iter().map(GalleryItem::from).collect())
    }

    pub async fn list_testimonials(&self, visible_only: bool) -> Result<Vec<testimonial::Model>, ServiceError> {
        let query = Query::listing(Table::Testimonials, visible_only);
        Ok(fetch(self.store.as_ref(), &query).await?)
    }

    pub async fn list_client_logos(&self, visible_only: bool) -> Result<Vec<client_logo::Model>, ServiceError> {
        let query = Query::listing(Table::ClientLogos, visible_only);
        Ok(fetch(self.store.as_ref(), &query).await?)
    }
}
