use std::sync::Arc;

use safar_store::app_config::{AuthConfig, Backend};
use safar_store::{LocalImageStore, Repositories};

use crate::middleware::metrics::HttpMetrics;

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub images: LocalImageStore,
    pub auth: AuthConfig,
    pub backend: Backend,
    pub max_image_mb: u64,
    /// Origin allowed by CORS; any origin when unset.
    pub site_url: Option<String>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        images: LocalImageStore,
        auth: AuthConfig,
        backend: Backend,
        max_image_mb: u64,
    ) -> Result<Self, prometheus::Error> {
        Ok(Self {
            repos,
            images,
            auth,
            backend,
            max_image_mb,
            site_url: None,
            metrics: Arc::new(HttpMetrics::new()?),
        })
    }

    pub fn with_site_url(mut self, site_url: Option<String>) -> Self {
        self.site_url = site_url;
        self
    }
}
