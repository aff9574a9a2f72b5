mod backend;
mod error;
pub mod facebook;
mod format;
pub mod instagram;
mod model;
mod plan;
pub mod traits;
mod util;
pub mod ytdlp;

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;

pub use backend::ExtractorPlatform;
pub use error::*;
pub use format::*;
pub use model::*;
pub use plan::ResolutionPlan;
use traits::PlatformCapability;
pub use util::classify;
use ytdlp::{Credentials, YtDlp};

use crate::config::ExtractorConfig;

#[derive(Clone, Default)]
pub struct PlatformRegistry {
    platforms: Arc<DashMap<Platform, Arc<dyn PlatformCapability>>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry backed by the extractor executable for every supported platform.
    pub fn from_config(config: &ExtractorConfig) -> Self {
        info!("Initializing platform registry");
        let timeout = Duration::from_secs(config.timeout_secs);
        let registry = Self::new();

        info!("Registering YouTube platform");
        registry.register(Arc::new(ExtractorPlatform::youtube(YtDlp::new(
            &config.ytdlp_path,
            timeout,
            Credentials::none(),
        ))));

        info!("Registering Instagram platform");
        registry.register(Arc::new(ExtractorPlatform::instagram(YtDlp::new(
            &config.ytdlp_path,
            timeout,
            Credentials::from_cookie_file(config.instagram_cookies.clone()),
        ))));

        info!("Registering Facebook platform");
        registry.register(Arc::new(ExtractorPlatform::facebook(YtDlp::new(
            &config.ytdlp_path,
            timeout,
            Credentials::from_cookie_file(config.facebook_cookies.clone()),
        ))));

        info!("Platform registry initialized");
        registry
    }

    pub fn register(&self, platform: Arc<dyn PlatformCapability>) {
        self.platforms.insert(platform.platform_id(), platform);
    }

    pub fn get_platform(&self, platform: &Platform) -> Option<Arc<dyn PlatformCapability>> {
        self.platforms.get(platform).map(|p| Arc::clone(p.value()))
    }

    pub fn get_supported_platforms(&self) -> Vec<Platform> {
        let mut platforms = self.platforms.iter().map(|p| *p.key()).collect::<Vec<_>>();
        platforms.sort();
        platforms
    }
}
