mod error;
mod normalize;
mod resolve;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use error::*;
pub use normalize::normalize;

use crate::platform::{
    classify, traits::PlatformCapability, DetectionResult, MediaKind, MediaLocator, MediaOption, Platform,
    PlatformRegistry, QualityHint, RawMetadata, ResolutionPlan,
};

/// Inbound resolve request, as the HTTP layer receives it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub option: String,
    #[serde(default)]
    pub format_id: Option<String>,
}

/// Ties classification, backends, normalization and option resolution
/// together. Holds no per-request state.
#[derive(Clone)]
pub struct Dispatcher {
    registry: PlatformRegistry,
}

impl Dispatcher {
    pub fn new(registry: PlatformRegistry) -> Self {
        Self { registry }
    }

    fn backend(&self, platform: Platform) -> ServiceResult<Arc<dyn PlatformCapability>> {
        self.registry.get_platform(&platform).ok_or_else(|| {
            error!("No backend registered for {}", platform);
            Failure::backend_unavailable(format!("No backend available for {}", platform))
        })
    }

    pub async fn detect(&self, url: &str) -> ServiceResult<DetectionResult> {
        let url = url.trim();
        if url.is_empty() {
            warn!("Detect called without a URL");
            return Err(Failure::invalid_input("URL is required"));
        }

        let platform = classify(url);
        if platform == Platform::Unknown {
            warn!("Unsupported platform for url: {}", url);
            return Err(Failure::unsupported_platform("Unsupported platform"));
        }

        info!("Detecting {} media: {}", platform, url);
        let metadata = self.probe(platform, url).await?;
        let result = normalize(platform, url, &metadata);

        info!("Detect succeeded for {} - {}", platform, url);
        Ok(result)
    }

    pub async fn resolve(&self, request: &ResolveRequest) -> ServiceResult<MediaLocator> {
        let url = request.url.trim();
        if url.is_empty() || request.platform.trim().is_empty() {
            warn!("Resolve called without url or platform");
            return Err(Failure::invalid_input("URL and platform are required"));
        }

        let platform = request.platform.parse::<Platform>().map_err(|e| {
            warn!("{}", e);
            Failure::unsupported_platform(format!("Unsupported platform: {}", request.platform))
        })?;

        let option = match request.option.trim() {
            "" => platform.default_option(),
            option => option.parse::<MediaOption>().ok(),
        };
        let option = option.ok_or_else(|| {
            warn!("Unknown option '{}' for {}", request.option, platform);
            Failure::invalid_option(format!("Unknown option: {}", request.option))
        })?;

        let hint = request.format_id.as_deref().and_then(QualityHint::parse);
        let plan = resolve::plan(platform, option, hint.as_ref())?;

        info!("Resolving {} {} via {}: {}", platform, option, plan, url);
        let locator = match &plan {
            ResolutionPlan::Thumbnail => self.thumbnail(platform, url).await?,
            ResolutionPlan::Subtitles => self.subtitles(platform, url).await?,
            ResolutionPlan::Stream { audio_only, .. } => self.stream(platform, url, &plan, *audio_only).await?,
        };

        info!("Resolved {} {} to {}", platform, option, locator.filename);
        Ok(locator)
    }

    async fn probe(&self, platform: Platform, url: &str) -> ServiceResult<RawMetadata> {
        let backend = self.backend(platform)?;
        match backend.probe(url).await {
            Ok(Some(metadata)) => Ok(metadata),
            Ok(None) => {
                error!("Failed to fetch {} information for {}", backend.platform_name(), url);
                Err(Failure::backend_unavailable(format!(
                    "Failed to fetch {} information",
                    backend.platform_name()
                )))
            }
            Err(e) => {
                error!("{} probe failed for {}: {}", backend.platform_name(), url, e);
                Err(Failure::extraction_failed(e.to_string()))
            }
        }
    }

    async fn stream(
        &self,
        platform: Platform,
        url: &str,
        plan: &ResolutionPlan,
        audio_only: bool,
    ) -> ServiceResult<MediaLocator> {
        let backend = self.backend(platform)?;
        let resolved = backend.resolve(url, plan).await.map_err(|e| {
            error!("{} resolution failed for {}: {}", backend.platform_name(), url, e);
            Failure::extraction_failed(e.to_string())
        })?;

        let (stream_url, ext) = resolved
            .primary_stream()
            .ok_or_else(|| Failure::extraction_failed(format!("{} returned no direct URL", backend.platform_name())))?;

        let kind = if audio_only {
            MediaKind::Audio
        } else {
            ext.map(MediaKind::from_ext).unwrap_or(MediaKind::Video)
        };

        Ok(MediaLocator {
            url: stream_url.to_string(),
            filename: build_filename(platform, resolved.title.as_deref(), None, ext, kind),
            kind,
        })
    }

    async fn thumbnail(&self, platform: Platform, url: &str) -> ServiceResult<MediaLocator> {
        let metadata = self.probe(platform, url).await?;
        let thumbnail = metadata
            .thumbnail
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Failure::not_found("No thumbnail available"))?;

        let ext = url_extension(thumbnail);
        Ok(MediaLocator {
            url: thumbnail.to_string(),
            filename: build_filename(platform, metadata.title.as_deref(), None, ext.as_deref(), MediaKind::Image),
            kind: MediaKind::Image,
        })
    }

    async fn subtitles(&self, platform: Platform, url: &str) -> ServiceResult<MediaLocator> {
        let metadata = self.probe(platform, url).await?;
        let (language, track) = metadata
            .first_subtitle()
            .ok_or_else(|| Failure::not_found("No subtitles available"))?;

        let ext = track.ext.clone().or_else(|| url_extension(&track.url));
        Ok(MediaLocator {
            url: track.url.clone(),
            filename: build_filename(
                platform,
                metadata.title.as_deref(),
                Some(language),
                ext.as_deref(),
                MediaKind::Subtitle,
            ),
            kind: MediaKind::Subtitle,
        })
    }
}

/// Filename limit of common filesystems, in bytes.
const MAX_FILENAME_BYTES: usize = 255;

/// `<title>[.<qualifier>].<ext>` with platform and kind defaults for missing parts.
fn build_filename(
    platform: Platform,
    title: Option<&str>,
    qualifier: Option<&str>,
    ext: Option<&str>,
    kind: MediaKind,
) -> String {
    let title = title
        .map(|t| sanitize_filename::sanitize(t.trim()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| platform.default_title());

    let ext = ext
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .unwrap_or(kind.default_ext());

    let suffix = match qualifier.map(sanitize_filename::sanitize).filter(|q| !q.is_empty()) {
        Some(q) => format!(".{}.{}", q, ext),
        None => format!(".{}", ext),
    };

    let title = truncate_on_char_boundary(&title, MAX_FILENAME_BYTES.saturating_sub(suffix.len()));
    format!("{}{}", title, suffix)
}

/// Longest prefix of `s` that fits in `max_bytes`, without trailing dots or spaces.
fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].trim_end_matches(['.', ' '])
}

fn url_extension(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    let (_, ext) = last.rsplit_once('.')?;
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())).then(|| ext.to_lowercase())
}
