use super::Platform;

const YOUTUBE_MARKERS: [&str; 2] = ["youtube.com", "youtu.be"];
const INSTAGRAM_MARKERS: [&str; 1] = ["instagram.com"];
const FACEBOOK_MARKERS: [&str; 2] = ["facebook.com", "fb.watch"];

/// Classifies a URL by case-insensitive domain markers, checked in order.
pub fn classify(url: &str) -> Platform {
    let url = url.to_lowercase();
    let matches = |markers: &[&str]| markers.iter().any(|m| url.contains(m));

    if matches(&YOUTUBE_MARKERS) {
        Platform::Youtube
    } else if matches(&INSTAGRAM_MARKERS) {
        Platform::Instagram
    } else if matches(&FACEBOOK_MARKERS) {
        Platform::Facebook
    } else {
        Platform::Unknown
    }
}

/// Path segments of a URL, or an empty list for text that does not parse.
/// URLs without a scheme are read as https.
pub(crate) fn path_segments(url: &str) -> (Option<String>, Vec<String>) {
    let url = url.trim();
    let parsed = if url.contains("://") {
        url::Url::parse(url)
    } else {
        url::Url::parse(&format!("https://{}", url))
    };
    match parsed {
        Ok(parsed) => {
            let host = parsed.host_str().map(|h| h.to_lowercase());
            let segments = parsed
                .path_segments()
                .map(|s| s.filter(|p| !p.is_empty()).map(|p| p.to_lowercase()).collect())
                .unwrap_or_default();
            (host, segments)
        }
        Err(_) => (None, Vec::new()),
    }
}
