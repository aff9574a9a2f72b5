use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::PlatformError;

#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Facebook,
    #[default]
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Unknown => "unknown",
        }
    }

    /// Options a detected item of this platform offers to the resolve step.
    pub fn options(&self) -> &'static [MediaOption] {
        match self {
            Self::Youtube => &[
                MediaOption::Video,
                MediaOption::Audio,
                MediaOption::Playlist,
                MediaOption::Subtitles,
                MediaOption::Thumbnail,
            ],
            Self::Instagram | Self::Facebook => &[MediaOption::Post, MediaOption::Audio],
            Self::Unknown => &[],
        }
    }

    /// Option used when a resolve request leaves the option blank.
    pub fn default_option(&self) -> Option<MediaOption> {
        match self {
            Self::Youtube => Some(MediaOption::Video),
            Self::Instagram | Self::Facebook => Some(MediaOption::Post),
            Self::Unknown => None,
        }
    }

    pub fn default_title(&self) -> String {
        format!("{}_media", self.as_str())
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Self::Youtube),
            "instagram" => Ok(Self::Instagram),
            "facebook" => Ok(Self::Facebook),
            _ => Err(PlatformError::InvalidPlatform(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaOption {
    Video,
    Audio,
    Playlist,
    Subtitles,
    Thumbnail,
    Post,
}

impl MediaOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Playlist => "playlist",
            Self::Subtitles => "subtitles",
            Self::Thumbnail => "thumbnail",
            Self::Post => "post",
        }
    }
}

impl Display for MediaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaOption {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "playlist" => Ok(Self::Playlist),
            "subtitles" => Ok(Self::Subtitles),
            "thumbnail" => Ok(Self::Thumbnail),
            "post" => Ok(Self::Post),
            _ => Err(PlatformError::InvalidOption(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Subtitle,
}

impl MediaKind {
    pub fn default_ext(&self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "m4a",
            Self::Image => "jpg",
            Self::Subtitle => "vtt",
        }
    }

    /// Streams of a non-audio plan are images when the backend reports a still format.
    pub fn from_ext(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "webp" | "heic" | "gif" => Self::Image,
            _ => Self::Video,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Reel,
    Story,
    Igtv,
    Video,
    Photo,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatEntry {
    pub format_id: u32,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionResult {
    pub platform: Platform,
    pub title: String,
    pub uploader: String,
    pub thumbnail: String,
    pub duration: u64,
    pub formats: Vec<FormatEntry>,
    pub has_subtitles: bool,
    /// Instagram post sub-type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<ContentType>,
    /// Facebook post sub-type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    pub options: Vec<MediaOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaLocator {
    pub url: String,
    pub filename: String,
    pub kind: MediaKind,
}

// ------------------------------------------------------------
// Backend-side shapes, filled in by a PlatformCapability.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub formats: Vec<StreamEntry>,
    pub subtitles: Vec<SubtitleLanguage>,
}

impl RawMetadata {
    pub fn has_subtitles(&self) -> bool {
        self.subtitles.iter().any(|lang| !lang.tracks.is_empty())
    }

    /// First language, in backend order, carrying at least one track.
    pub fn first_subtitle(&self) -> Option<(&str, &SubtitleTrack)> {
        self.subtitles
            .iter()
            .find_map(|lang| lang.tracks.first().map(|track| (lang.language.as_str(), track)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    pub height: u32,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleLanguage {
    pub language: String,
    pub tracks: Vec<SubtitleTrack>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub url: String,
    pub ext: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub url: Option<String>,
    pub title: Option<String>,
    pub ext: Option<String>,
    pub requested_formats: Vec<RequestedStream>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedStream {
    pub url: String,
    pub ext: Option<String>,
    pub has_video: bool,
}

impl ResolvedMedia {
    /// Direct URL of the result. When the backend split the selection into
    /// separate streams the video stream wins; the audio stream is dropped.
    pub fn primary_stream(&self) -> Option<(&str, Option<&str>)> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Some((url, self.ext.as_deref()));
        }

        self.requested_formats
            .iter()
            .find(|s| s.has_video)
            .or_else(|| self.requested_formats.first())
            .map(|s| (s.url.as_str(), s.ext.as_deref().or(self.ext.as_deref())))
    }
}
