//! Application state shared by every handler.

use std::sync::Arc;

use voidview_core::Config;
use voidview_nasa::NasaClient;

/// Nothing here is mutable: handlers are independent and the service keeps
/// no state between requests.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub nasa: NasaClient,
}

impl AppState {
    pub fn new(config: Config, nasa: NasaClient) -> Arc<Self> {
        Arc::new(Self { config, nasa })
    }

    pub fn max_input_pixels(&self) -> u64 {
        self.config.max_input_pixels()
    }
}
