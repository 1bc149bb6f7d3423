use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when no Google API key is configured. Analysis requests then
    /// fail with a configuration error while uploads keep working.
    pub text_generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    pub fn new(config: Config, text_generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            config,
            text_generator,
        }
    }

    #[cfg(test)]
    pub fn for_tests(text_generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self::new(Config::default(), text_generator)
    }
}
