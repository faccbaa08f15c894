use crate::domain::routing::{Dials, FallbackConfig, ProviderConfig, RouterModelConfig, ToolsConfig};

/// Configuration captured at client construction.
///
/// Everything here is read-only once the client is built, so a single
/// client can serve many concurrent calls.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_key: String,
    /// Overrides the hosted endpoint, e.g. for a local server
    pub base_url: Option<String>,
    pub dials: Option<Dials>,
    pub provider_config: ProviderConfig,
    pub router_model_config: Option<RouterModelConfig>,
    pub fallback_config: Option<FallbackConfig>,
    pub tools_config: Option<ToolsConfig>,
}

impl ClientOptions {
    pub fn new(api_key: impl Into<String>, provider_config: ProviderConfig) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            dials: None,
            provider_config,
            router_model_config: None,
            fallback_config: None,
            tools_config: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_dials(mut self, dials: Dials) -> Self {
        self.dials = Some(dials);
        self
    }

    pub fn with_router_model_config(mut self, config: RouterModelConfig) -> Self {
        self.router_model_config = Some(config);
        self
    }

    pub fn with_fallback_config(mut self, config: FallbackConfig) -> Self {
        self.fallback_config = Some(config);
        self
    }

    pub fn with_tools_config(mut self, config: ToolsConfig) -> Self {
        self.tools_config = Some(config);
        self
    }
}

/// Read an environment variable, trimming surrounding whitespace.
/// Absent keys yield `None` rather than an error.
pub fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|value| value.trim().to_string())
}
