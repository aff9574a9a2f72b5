use super::{util::path_segments, ContentType};

/// Facebook content kind, read from the URL host and path.
pub fn detect_content_type(url: &str) -> ContentType {
    let (host, segments) = path_segments(url);
    let Some(host) = host else {
        return ContentType::Unknown;
    };

    if host.ends_with("fb.watch") {
        return ContentType::Video;
    }

    let has = |segment: &str| segments.iter().any(|s| s == segment);

    if has("reel") || has("reels") {
        ContentType::Reel
    } else if has("watch") || has("videos") || has("video.php") {
        ContentType::Video
    } else if has("stories") {
        ContentType::Story
    } else if segments.iter().any(|s| s.starts_with("photo")) {
        ContentType::Photo
    } else if has("posts") || has("permalink.php") || has("story.php") || has("permalink") {
        ContentType::Post
    } else {
        ContentType::Unknown
    }
}
