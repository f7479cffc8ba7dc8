//! Media attached to projects and gallery items.
//!
//! A link is classified once, when it is written, and the result is stored in
//! `*_kind`/`*_provider`/`*_ref` columns next to the raw URL. Readers rebuild a
//! [`Media`] from those columns and never look at the URL shape again.

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoProvider {
    Youtube,
    Vimeo,
    GoogleDrive,
}

impl VideoProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoProvider::Youtube => "youtube",
            VideoProvider::Vimeo => "vimeo",
            VideoProvider::GoogleDrive => "google_drive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "youtube" => Some(VideoProvider::Youtube),
            "vimeo" => Some(VideoProvider::Vimeo),
            "google_drive" => Some(VideoProvider::GoogleDrive),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Media {
    Image { url: String },
    EmbeddedVideo { provider: VideoProvider, id: String },
    RawVideo { url: String },
}

const KIND_IMAGE: &str = "image";
const KIND_EMBEDDED: &str = "embedded_video";
const KIND_RAW: &str = "raw_video";

const RAW_VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".mov"];

/// Column values for a classified link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaColumns {
    pub kind: &'static str,
    pub provider: Option<&'static str>,
    pub reference: Option<String>,
}

impl Media {
    /// Classify a video link. `None` when it is neither a known provider page
    /// nor a direct video file.
    pub fn classify_video(link: &str) -> Option<Media> {
        let url = Url::parse(link.trim()).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        let host = host
            .strip_prefix("www.")
            .or_else(|| host.strip_prefix("m."))
            .unwrap_or(&host)
            .to_string();
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let embedded = |provider: VideoProvider, id: Option<&str>| {
            id.filter(|id| !id.is_empty())
                .map(|id| Media::EmbeddedVideo { provider, id: id.to_string() })
        };

        match host.as_str() {
            "youtu.be" => return embedded(VideoProvider::Youtube, segments.first().copied()),
            "youtube.com" | "youtube-nocookie.com" => {
                let id = match segments.as_slice() {
                    ["watch", ..] => url
                        .query_pairs()
                        .find(|(k, _)| k == "v")
                        .map(|(_, v)| v.into_owned()),
                    ["embed", id, ..] | ["shorts", id, ..] | ["live", id, ..] => Some(id.to_string()),
                    _ => None,
                };
                return embedded(VideoProvider::Youtube, id.as_deref());
            }
            "vimeo.com" | "player.vimeo.com" => {
                let id = segments
                    .iter()
                    .rev()
                    .find(|seg| seg.chars().all(|c| c.is_ascii_digit()))
                    .copied();
                return embedded(VideoProvider::Vimeo, id);
            }
            "drive.google.com" => {
                let id = segments
                    .iter()
                    .position(|seg| *seg == "d")
                    .and_then(|i| segments.get(i + 1))
                    .copied();
                return embedded(VideoProvider::GoogleDrive, id);
            }
            _ => {}
        }

        let path = url.path().to_ascii_lowercase();
        if RAW_VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            return Some(Media::RawVideo { url: url.to_string() });
        }
        None
    }

    pub fn columns(&self) -> MediaColumns {
        match self {
            Media::Image { .. } => MediaColumns { kind: KIND_IMAGE, provider: None, reference: None },
            Media::EmbeddedVideo { provider, id } => MediaColumns {
                kind: KIND_EMBEDDED,
                provider: Some(provider.as_str()),
                reference: Some(id.clone()),
            },
            Media::RawVideo { .. } => MediaColumns { kind: KIND_RAW, provider: None, reference: None },
        }
    }

    /// Rebuild from stored columns. `url` is the raw link column.
    pub fn from_columns(kind: &str, url: &str, provider: Option<&str>, reference: Option<&str>) -> Option<Media> {
        match kind {
            KIND_IMAGE => Some(Media::Image { url: url.to_string() }),
            KIND_RAW => Some(Media::RawVideo { url: url.to_string() }),
            KIND_EMBEDDED => {
                let provider = VideoProvider::parse(provider?)?;
                Some(Media::EmbeddedVideo { provider, id: reference?.to_string() })
            }
            _ => None,
        }
    }

    pub fn is_video(&self) -> bool {
        !matches!(self, Media::Image { .. })
    }

    /// Player URL for an inline frame; `None` for images.
    pub fn embed_url(&self, autoplay: bool, muted: bool) -> Option<String> {
        let flag = |b: bool| if b { "1" } else { "0" };
        match self {
            Media::Image { .. } => None,
            Media::RawVideo { url } => Some(url.clone()),
            Media::EmbeddedVideo { provider: VideoProvider::Youtube, id } => Some(format!(
                "https://www.youtube.com/embed/{id}?autoplay={}&mute={}&controls=0&loop=1&playlist={id}",
                flag(autoplay),
                flag(muted),
            )),
            Media::EmbeddedVideo { provider: VideoProvider::Vimeo, id } => Some(format!(
                "https://player.vimeo.com/video/{id}?autoplay={}&muted={}&loop=1&controls=0",
                flag(autoplay),
                flag(muted),
            )),
            // Drive previews ignore player flags
            Media::EmbeddedVideo { provider: VideoProvider::GoogleDrive, id } => {
                Some(format!("https://drive.google.com/file/d/{id}/preview"))
            }
        }
    }

    /// Provider-hosted still frame, when the provider offers one.
    pub fn thumbnail_url(&self) -> Option<String> {
        match self {
            Media::EmbeddedVideo { provider: VideoProvider::Youtube, id } => {
                Some(format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg"))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yt(id: &str) -> Media {
        Media::EmbeddedVideo { provider: VideoProvider::Youtube, id: id.into() }
    }

    #[test]
    fn classifies_youtube_links() {
        assert_eq!(Media::classify_video("https://www.youtube.com/watch?v=abc123&t=4"), Some(yt("abc123")));
        assert_eq!(Media::classify_video("https://youtu.be/abc123?si=x"), Some(yt("abc123")));
        assert_eq!(Media::classify_video("https://youtube.com/shorts/xyz"), Some(yt("xyz")));
        assert_eq!(Media::classify_video("https://www.youtube.com/watch"), None);
    }

    #[test]
    fn classifies_vimeo_and_drive() {
        assert_eq!(
            Media::classify_video("https://vimeo.com/76979871"),
            Some(Media::EmbeddedVideo { provider: VideoProvider::Vimeo, id: "76979871".into() })
        );
        assert_eq!(
            Media::classify_video("https://player.vimeo.com/video/76979871?h=1"),
            Some(Media::EmbeddedVideo { provider: VideoProvider::Vimeo, id: "76979871".into() })
        );
        assert_eq!(
            Media::classify_video("https://drive.google.com/file/d/FILE_ID/view?usp=sharing"),
            Some(Media::EmbeddedVideo { provider: VideoProvider::GoogleDrive, id: "FILE_ID".into() })
        );
    }

    #[test]
    fn direct_files_are_raw_and_pages_are_rejected() {
        assert_eq!(
            Media::classify_video("https://cdn.example.com/reel/final.MP4"),
            Some(Media::RawVideo { url: "https://cdn.example.com/reel/final.MP4".into() })
        );
        assert_eq!(Media::classify_video("https://example.com/portfolio"), None);
        assert_eq!(Media::classify_video("not a url"), None);
    }

    #[test]
    fn columns_rebuild_the_same_media() {
        let media = yt("abc123");
        let cols = media.columns();
        let back = Media::from_columns(cols.kind, "https://youtu.be/abc123", cols.provider, cols.reference.as_deref());
        assert_eq!(back, Some(media));
        assert_eq!(Media::from_columns("hologram", "x", None, None), None);
    }

    #[test]
    fn embed_and_thumbnail_urls() {
        let media = yt("abc");
        assert_eq!(
            media.embed_url(true, true).unwrap(),
            "https://www.youtube.com/embed/abc?autoplay=1&mute=1&controls=0&loop=1&playlist=abc"
        );
        assert_eq!(media.thumbnail_url().unwrap(), "https://img.youtube.com/vi/abc/maxresdefault.jpg");
        let drive = Media::EmbeddedVideo { provider: VideoProvider::GoogleDrive, id: "F".into() };
        assert_eq!(drive.embed_url(true, false).unwrap(), "https://drive.google.com/file/d/F/preview");
        assert_eq!(drive.thumbnail_url(), None);
        assert_eq!(Media::Image { url: "u".into() }.embed_url(false, false), None);
    }

    #[test]
    fn serializes_as_tagged_union() {
        let json = serde_json::to_value(yt("abc")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "embedded_video", "provider": "youtube", "id": "abc"}));
    }
}
