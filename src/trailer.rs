use serde_json::Value;

use crate::models::Trailer;
use crate::utils;

pub const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Video {
    pub key: Option<String>,
    pub name: Option<String>,
    pub site: Option<String>,
    pub kind: Option<String>,
    pub official: bool,
}

impl Video {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            key: utils::text(raw, "key"),
            name: utils::text(raw, "name"),
            site: utils::text(raw, "site"),
            kind: utils::text(raw, "type"),
            official: utils::boolean(raw, "official").unwrap_or(false),
        }
    }

    fn is_youtube_trailer(&self) -> bool {
        self.kind.as_deref() == Some("Trailer")
            && self
                .site
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("YouTube"))
    }
}

/// Entries of a `{ "results": [...] }` video payload.
pub fn videos_from(raw: &Value) -> Vec<Video> {
    utils::items(raw, "results")
        .iter()
        .map(Video::from_raw)
        .collect()
}

/// Official YouTube trailer first, then any YouTube trailer. Upstream order
/// decides between equals.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.is_youtube_trailer() && v.official)
        .or_else(|| videos.iter().find(|v| v.is_youtube_trailer()))
}

/// Selected trailer as a playable link. Entries without a key cannot be
/// played and are skipped before selection.
pub fn trailer_from(raw: &Value) -> Option<Trailer> {
    let videos: Vec<Video> = videos_from(raw)
        .into_iter()
        .filter(|v| v.key.is_some())
        .collect();
    let video = select_trailer(&videos)?;
    let key = video.key.clone()?;
    Some(Trailer {
        url: format!("{YOUTUBE_WATCH}{key}"),
        name: video.name.clone().unwrap_or_else(|| "Trailer".to_string()),
        site: video.site.clone().unwrap_or_default(),
        key,
    })
}
