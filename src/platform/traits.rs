use async_trait::async_trait;

use super::{Platform, PlatformError, RawMetadata, ResolutionPlan, ResolvedMedia};

/// One extraction backend. Implementations are stateless network clients and
/// may be shared between concurrent requests.
#[async_trait]
pub trait PlatformCapability: Send + Sync {
    fn platform_id(&self) -> Platform;

    fn platform_name(&self) -> &str;

    /// Best-effort metadata fetch. `Ok(None)` means the backend found nothing.
    async fn probe(&self, url: &str) -> Result<Option<RawMetadata>, PlatformError>;

    /// Resolve a stream plan to a direct media URL.
    async fn resolve(&self, url: &str, plan: &ResolutionPlan) -> Result<ResolvedMedia, PlatformError>;
}
