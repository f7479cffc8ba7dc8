use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{optional, require, ModelError};
use crate::media::Media;
use crate::table::{default_visible, nullable, put, Editable, ParentRef, Record, Row, Table, Visible};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_gallery")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub media_url: String,
    pub media_type: String,
    pub media_kind: String,
    pub media_provider: Option<String>,
    pub media_ref: Option<String>,
    pub display_order: i32,
    pub is_visible: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Project }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Project => Entity::belongs_to(crate::project::Entity)
                .from(Column::ProjectId)
                .to(crate::project::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::project::Entity> for Entity {
    fn to() -> RelationDef { Relation::Project.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn media(&self) -> Option<Media> {
        Media::from_columns(
            &self.media_kind,
            &self.media_url,
            self.media_provider.as_deref(),
            self.media_ref.as_deref(),
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewGalleryItem {
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub media_url: String,
    pub media_type: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GalleryItemPatch {
    pub project_id: Option<Uuid>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
}

/// Classify a gallery link by its declared type. Video links no provider
/// claims are treated as directly hosted files.
pub fn classify(media_url: &str, media_type: &str) -> Result<Media, ModelError> {
    let url = require("media_url", media_url)?;
    match media_type.trim().to_ascii_lowercase().as_str() {
        "image" => Ok(Media::Image { url }),
        "video" => Ok(Media::classify_video(&url).unwrap_or(Media::RawVideo { url })),
        _ => Err(ModelError::Validation("media_type must be image or video".into())),
    }
}

fn put_media(row: &mut Row, media_url: &str, media_type: &str) -> Result<(), ModelError> {
    let media = classify(media_url, media_type)?;
    let cols = media.columns();
    let declared = if media.is_video() { "video" } else { "image" };
    put(row, "media_url", Some(media_url.trim()));
    put(row, "media_type", Some(declared));
    put(row, "media_kind", Some(cols.kind));
    put(row, "media_provider", Some(cols.provider));
    put(row, "media_ref", Some(cols.reference));
    Ok(())
}

fn parent(id: Uuid) -> ParentRef {
    ParentRef { table: Table::Projects, field: "project_id", id }
}

impl Record for Model {
    const TABLE: Table = Table::ProjectGallery;

    fn id(&self) -> Uuid { self.id }
}

impl Visible for Model {
    fn is_visible(&self) -> bool { self.is_visible }
}

impl Editable for Model {
    type Create = NewGalleryItem;
    type Patch = GalleryItemPatch;

    fn create_row(input: NewGalleryItem) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "project_id", Some(input.project_id));
        put(&mut row, "title", Some(require("title", &input.title)?));
        put(&mut row, "description", Some(optional(input.description)));
        put_media(&mut row, &input.media_url, &input.media_type)?;
        put(&mut row, "display_order", Some(input.display_order));
        put(&mut row, "is_visible", Some(input.is_visible));
        Ok(row)
    }

    fn patch_row(patch: GalleryItemPatch) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "project_id", patch.project_id);
        put(&mut row, "title", patch.title.as_deref().map(|t| require("title", t)).transpose()?);
        put(&mut row, "description", patch.description.map(optional));
        match (patch.media_url.as_deref(), patch.media_type.as_deref()) {
            (Some(url), Some(kind)) => put_media(&mut row, url, kind)?,
            (None, None) => {}
            _ => {
                return Err(ModelError::Validation("media_url and media_type must be changed together".into()));
            }
        }
        put(&mut row, "display_order", patch.display_order);
        put(&mut row, "is_visible", patch.is_visible);
        Ok(row)
    }

    fn create_parent(input: &NewGalleryItem) -> Option<ParentRef> { Some(parent(input.project_id)) }

    fn patch_parent(patch: &GalleryItemPatch) -> Option<ParentRef> { patch.project_id.map(parent) }
}
