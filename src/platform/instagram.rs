use crate::platform::{util::path_segments, ContentType};

/// Instagram content kind, read from the URL path.
pub fn detect_media_type(url: &str) -> ContentType {
    let (_, segments) = path_segments(url);
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    match segments.as_slice() {
        ["p", _shortcode, ..] => ContentType::Post,
        ["reel" | "reels", _shortcode, ..] => ContentType::Reel,
        ["stories", _username, ..] => ContentType::Story,
        ["tv", _shortcode, ..] => ContentType::Igtv,
        [_username, "p", _shortcode, ..] => ContentType::Post,
        [_username, "reel", _shortcode, ..] => ContentType::Reel,
        _ => ContentType::Unknown,
    }
}
