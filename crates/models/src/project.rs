use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{optional, require, ModelError};
use crate::media::Media;
use crate::table::{
    default_visible, nullable, put, ChildRule, Editable, OnDelete, ParentRef, Record, Row, Table, Visible,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sub_service_id: Uuid,
    pub title: String,
    pub project_type: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub video_kind: Option<String>,
    pub video_provider: Option<String>,
    pub video_ref: Option<String>,
    pub display_order: i32,
    pub is_visible: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { SubService, Metrics, Feedback, Gallery }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::SubService => Entity::belongs_to(crate::sub_service::Entity)
                .from(Column::SubServiceId)
                .to(crate::sub_service::Column::Id)
                .into(),
            Relation::Metrics => Entity::has_many(crate::project_metric::Entity).into(),
            Relation::Feedback => Entity::has_one(crate::project_feedback::Entity).into(),
            Relation::Gallery => Entity::has_many(crate::project_gallery::Entity).into(),
        }
    }
}

impl Related<crate::sub_service::Entity> for Entity {
    fn to() -> RelationDef { Relation::SubService.def() }
}

impl Related<crate::project_metric::Entity> for Entity {
    fn to() -> RelationDef { Relation::Metrics.def() }
}

impl Related<crate::project_feedback::Entity> for Entity {
    fn to() -> RelationDef { Relation::Feedback.def() }
}

impl Related<crate::project_gallery::Entity> for Entity {
    fn to() -> RelationDef { Relation::Gallery.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The classified video, rebuilt from the stored columns.
    pub fn video(&self) -> Option<Media> {
        let url = self.video_url.as_deref()?;
        Media::from_columns(
            self.video_kind.as_deref()?,
            url,
            self.video_provider.as_deref(),
            self.video_ref.as_deref(),
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewProject {
    pub sub_service_id: Uuid,
    pub title: String,
    pub project_type: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectPatch {
    pub sub_service_id: Option<Uuid>,
    pub title: Option<String>,
    pub project_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub video_url: Option<Option<String>>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
}

fn parent(id: Uuid) -> ParentRef {
    ParentRef { table: Table::SubServices, field: "sub_service_id", id }
}

/// Classify `video_url` and write it with its media columns. A blank link clears them.
fn put_video(row: &mut Row, video_url: Option<String>) -> Result<Option<Media>, ModelError> {
    let Some(url) = optional(video_url) else {
        for column in ["video_url", "video_kind", "video_provider", "video_ref"] {
            row.insert(column.to_string(), serde_json::Value::Null);
        }
        return Ok(None);
    };
    let media = Media::classify_video(&url).ok_or_else(|| {
        ModelError::Validation(format!("video_url is not a YouTube, Vimeo, Google Drive or direct video link: {url}"))
    })?;
    let cols = media.columns();
    put(row, "video_url", Some(url));
    put(row, "video_kind", Some(cols.kind));
    put(row, "video_provider", Some(cols.provider));
    put(row, "video_ref", Some(cols.reference));
    Ok(Some(media))
}

impl Record for Model {
    const TABLE: Table = Table::Projects;

    fn id(&self) -> Uuid { self.id }
}

impl Visible for Model {
    fn is_visible(&self) -> bool { self.is_visible }
}

impl Editable for Model {
    type Create = NewProject;
    type Patch = ProjectPatch;

    const CHILDREN: &'static [ChildRule] = &[
        ChildRule { table: Table::ProjectMetrics, foreign_key: "project_id", on_delete: OnDelete::Cascade },
        ChildRule { table: Table::ProjectFeedback, foreign_key: "project_id", on_delete: OnDelete::Cascade },
        ChildRule { table: Table::ProjectGallery, foreign_key: "project_id", on_delete: OnDelete::Cascade },
    ];

    fn create_row(input: NewProject) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "sub_service_id", Some(input.sub_service_id));
        put(&mut row, "title", Some(require("title", &input.title)?));
        put(&mut row, "project_type", Some(require("project_type", &input.project_type)?));
        let video = put_video(&mut row, input.video_url)?;
        // YouTube links bring their own poster frame
        let thumbnail = optional(input.thumbnail_url).or_else(|| video.and_then(|v| v.thumbnail_url()));
        put(&mut row, "thumbnail_url", Some(thumbnail));
        put(&mut row, "display_order", Some(input.display_order));
        put(&mut row, "is_visible", Some(input.is_visible));
        Ok(row)
    }

    fn patch_row(patch: ProjectPatch) -> Result<Row, ModelError> {
        let mut row = Row::new();
        put(&mut row, "sub_service_id", patch.sub_service_id);
        put(&mut row, "title", patch.title.as_deref().map(|t| require("title", t)).transpose()?);
        put(
            &mut row,
            "project_type",
            patch.project_type.as_deref().map(|t| require("project_type", t)).transpose()?,
        );
        if let Some(thumbnail) = patch.thumbnail_url {
            put(&mut row, "thumbnail_url", Some(optional(thumbnail)));
        }
        if let Some(video_url) = patch.video_url {
            put_video(&mut row, video_url)?;
        }
        put(&mut row, "display_order", patch.display_order);
        put(&mut row, "is_visible", patch.is_visible);
        Ok(row)
    }

    fn create_parent(input: &NewProject) -> Option<ParentRef> { Some(parent(input.sub_service_id)) }

    fn patch_parent(patch: &ProjectPatch) -> Option<ParentRef> { patch.sub_service_id.map(parent) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::VideoProvider;

    fn input(video_url: Option<&str>) -> NewProject {
        NewProject {
            sub_service_id: Uuid::new_v4(),
            title: "Lot Aerial".into(),
            project_type: "video".into(),
            thumbnail_url: None,
            video_url: video_url.map(str::to_string),
            display_order: 0,
            is_visible: true,
        }
    }

    #[test]
    fn youtube_link_is_classified_once_on_create() {
        let row = Model::create_row(input(Some("https://youtu.be/abc123"))).unwrap();
        assert_eq!(row["video_kind"], "embedded_video");
        assert_eq!(row["video_provider"], "youtube");
        assert_eq!(row["video_ref"], "abc123");
        assert_eq!(row["thumbnail_url"], "https://img.youtube.com/vi/abc123/maxresdefault.jpg");
    }

    #[test]
    fn unknown_video_link_is_a_validation_error() {
        let err = Model::create_row(input(Some("https://example.com/watch-this"))).unwrap_err();
        assert!(matches!(err, ModelError::Validation(msg) if msg.contains("video_url")));
    }

    #[test]
    fn no_video_leaves_media_columns_null() {
        let row = Model::create_row(input(Some("   "))).unwrap();
        assert!(row["video_url"].is_null());
        assert!(row["video_kind"].is_null());
        assert!(row["thumbnail_url"].is_null());
    }

    #[test]
    fn patch_can_clear_the_video() {
        let patch: ProjectPatch = serde_json::from_str(r#"{"video_url": null}"#).unwrap();
        let row = Model::patch_row(patch).unwrap();
        assert!(row["video_provider"].is_null());
        let untouched = Model::patch_row(ProjectPatch::default()).unwrap();
        assert!(untouched.is_empty());
    }

    #[test]
    fn video_is_rebuilt_from_columns() {
        let mut row = Model::create_row(input(Some("https://vimeo.com/76979871"))).unwrap();
        row.insert("id".into(), serde_json::json!(Uuid::new_v4()));
        row.insert("created_at".into(), serde_json::json!("2024-01-01T00:00:00+00:00"));
        row.insert("updated_at".into(), serde_json::json!("2024-01-01T00:00:00+00:00"));
        let model: Model = serde_json::from_value(serde_json::Value::Object(row)).unwrap();
        assert_eq!(
            model.video(),
            Some(Media::EmbeddedVideo { provider: VideoProvider::Vimeo, id: "76979871".into() })
        );
    }
}
