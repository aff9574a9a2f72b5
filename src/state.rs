use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    platform::PlatformRegistry,
    runtime::RuntimeManager,
    service::Dispatcher,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dispatcher: Dispatcher,
    pub runtime: RuntimeManager,
}

impl AppState {
    /// Wires the dispatcher and the download runtime. Workers are not started.
    pub fn new(config: AppConfig, registry: PlatformRegistry) -> AppResult<Self> {
        info!("Supported platforms: {:?}", registry.get_supported_platforms());

        let dispatcher = Dispatcher::new(registry);
        let runtime = RuntimeManager::new(&config.runtime, dispatcher.clone())?;

        Ok(Self {
            config: Arc::new(config),
            dispatcher,
            runtime,
        })
    }
}
