use async_trait::async_trait;

use super::{
    traits::PlatformCapability,
    ytdlp::{self, YtDlp},
    Platform, PlatformError, RawMetadata, ResolutionPlan, ResolvedMedia,
};

/// Backend capability served by the external extractor executable.
pub struct ExtractorPlatform {
    platform: Platform,
    name: &'static str,
    ytdlp: YtDlp,
}

impl ExtractorPlatform {
    pub fn youtube(ytdlp: YtDlp) -> Self {
        Self {
            platform: Platform::Youtube,
            name: "YouTube",
            ytdlp,
        }
    }

    pub fn instagram(ytdlp: YtDlp) -> Self {
        Self {
            platform: Platform::Instagram,
            name: "Instagram",
            ytdlp,
        }
    }

    pub fn facebook(ytdlp: YtDlp) -> Self {
        Self {
            platform: Platform::Facebook,
            name: "Facebook",
            ytdlp,
        }
    }
}

#[async_trait]
impl PlatformCapability for ExtractorPlatform {
    fn platform_id(&self) -> Platform {
        self.platform
    }

    fn platform_name(&self) -> &str {
        self.name
    }

    async fn probe(&self, url: &str) -> Result<Option<RawMetadata>, PlatformError> {
        let json = self.ytdlp.dump_json(url, None).await?;
        Ok(json.as_ref().map(ytdlp::parse_metadata))
    }

    async fn resolve(&self, url: &str, plan: &ResolutionPlan) -> Result<ResolvedMedia, PlatformError> {
        let selector = plan
            .selector()
            .ok_or_else(|| PlatformError::Backend(format!("{} plan carries no stream selector", plan)))?;

        let json = self
            .ytdlp
            .dump_json(url, Some(&selector.expression()))
            .await?
            .ok_or_else(|| PlatformError::Backend(format!("{} returned no media for {}", self.name, url)))?;

        let resolved = ytdlp::parse_resolved(&json);
        if resolved.primary_stream().is_none() {
            return Err(PlatformError::Backend(format!("{} returned no direct URL", self.name)));
        }
        Ok(resolved)
    }
}
