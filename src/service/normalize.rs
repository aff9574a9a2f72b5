use crate::platform::{facebook, instagram, DetectionResult, FormatEntry, Platform, RawMetadata};

const UNKNOWN: &str = "Unknown";

/// Maps one platform's probed metadata onto the shared detection shape.
pub fn normalize(platform: Platform, url: &str, metadata: &RawMetadata) -> DetectionResult {
    let base = DetectionResult {
        platform,
        title: metadata.title.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        uploader: metadata.uploader.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        thumbnail: metadata.thumbnail.clone().unwrap_or_default(),
        duration: 0,
        formats: Vec::new(),
        has_subtitles: false,
        media_type: None,
        content_type: None,
        options: platform.options().to_vec(),
    };

    match platform {
        Platform::Youtube => DetectionResult {
            duration: duration_secs(metadata),
            formats: metadata
                .formats
                .iter()
                .map(|f| FormatEntry {
                    format_id: f.height,
                    label: f.display.clone(),
                })
                .collect(),
            has_subtitles: metadata.has_subtitles(),
            ..base
        },
        Platform::Instagram => DetectionResult {
            media_type: Some(instagram::detect_media_type(url)),
            ..base
        },
        Platform::Facebook => DetectionResult {
            duration: duration_secs(metadata),
            content_type: Some(facebook::detect_content_type(url)),
            ..base
        },
        Platform::Unknown => base,
    }
}

fn duration_secs(metadata: &RawMetadata) -> u64 {
    metadata
        .duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| d as u64)
        .unwrap_or(0)
}
