use crate::backend::Backend;
use crate::config::ProxyConfig;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ProxyState {
    /// Proxy configuration
    pub config: Arc<ProxyConfig>,

    /// Backend launched for every request
    pub backend: Backend,
}

impl ProxyState {
    pub fn new(config: ProxyConfig) -> Self {
        let backend = Backend::from_config(&config);
        Self {
            config: Arc::new(config),
            backend,
        }
    }
}
