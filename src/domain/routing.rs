use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Models known to the router, identified by their wire ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Llm {
    #[serde(rename = "claude-3-5-sonnet-20240620")]
    Claude35Sonnet,
    #[serde(rename = "claude-3-haiku-20240307")]
    Claude3Haiku,
    #[serde(rename = "gpt-4o-2024-05-13")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini-2024-07-18")]
    Gpt4oMini,
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
    #[serde(rename = "command-r-plus")]
    CommandRPlus,
    #[serde(rename = "command-r")]
    CommandR,
    #[serde(rename = "llama3-70b-8192")]
    Llama370b,
    #[serde(rename = "llama3.1-8b")]
    Llama318b,
    #[serde(rename = "llama3.1-70b")]
    Llama3170b,
    #[serde(rename = "llama3.1-405b")]
    Llama31405b,
}

/// Upstream inference providers the router can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Groq,
    DeepInfra,
    Fireworks,
    Together,
    Replicate,
    Anthropic,
    Google,
    Cohere,
}

/// Routing preference weights in an implicit [0, 1] range.
///
/// Not validated locally; the server is the authority on accepted values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dials {
    pub quality: f64,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl Dials {
    pub fn new(quality: f64, cost: f64) -> Self {
        Self {
            quality,
            cost,
            speed: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

impl Default for Dials {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

/// Credential record for a single provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCredentials {
    pub api_key: String,
}

impl ProviderCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

/// Per-provider credentials; an absent entry means the provider is
/// unavailable for routing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<ProviderCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<ProviderCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<ProviderCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohere: Option<ProviderCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groq: Option<ProviderCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicate: Option<ProviderCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fireworks: Option<ProviderCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub together: Option<ProviderCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepinfra: Option<ProviderCredentials>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openai(mut self, api_key: impl Into<String>) -> Self {
        self.openai = Some(ProviderCredentials::new(api_key));
        self
    }

    pub fn with_anthropic(mut self, api_key: impl Into<String>) -> Self {
        self.anthropic = Some(ProviderCredentials::new(api_key));
        self
    }

    pub fn with_google(mut self, api_key: impl Into<String>) -> Self {
        self.google = Some(ProviderCredentials::new(api_key));
        self
    }

    pub fn with_cohere(mut self, api_key: impl Into<String>) -> Self {
        self.cohere = Some(ProviderCredentials::new(api_key));
        self
    }

    pub fn with_groq(mut self, api_key: impl Into<String>) -> Self {
        self.groq = Some(ProviderCredentials::new(api_key));
        self
    }

    pub fn with_replicate(mut self, api_key: impl Into<String>) -> Self {
        self.replicate = Some(ProviderCredentials::new(api_key));
        self
    }

    pub fn with_fireworks(mut self, api_key: impl Into<String>) -> Self {
        self.fireworks = Some(ProviderCredentials::new(api_key));
        self
    }

    pub fn with_together(mut self, api_key: impl Into<String>) -> Self {
        self.together = Some(ProviderCredentials::new(api_key));
        self
    }

    pub fn with_deepinfra(mut self, api_key: impl Into<String>) -> Self {
        self.deepinfra = Some(ProviderCredentials::new(api_key));
        self
    }
}

/// Route record for model families served by a single provider list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRoute {
    pub providers: Vec<Provider>,
}

impl ProviderRoute {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }
}

/// Route record for model families whose eligible providers differ between
/// tool-capable and tool-free serving
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSplitRoute {
    pub tools_providers: Vec<Provider>,
    pub no_tools_providers: Vec<Provider>,
}

impl ToolSplitRoute {
    pub fn new(tools_providers: Vec<Provider>, no_tools_providers: Vec<Provider>) -> Self {
        Self {
            tools_providers,
            no_tools_providers,
        }
    }
}

/// Per-model provider preferences plus optional include/exclude filters.
///
/// Each model field takes the route shape its family supports, so a config
/// cannot declare a tool split for a model that has none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterModelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_models: Option<Vec<Llm>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_models: Option<Vec<Llm>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpt_4o: Option<ProviderRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpt_4o_mini: Option<ProviderRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claude_3_5_sonnet: Option<ProviderRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claude_3_haiku: Option<ProviderRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_1_5_pro: Option<ProviderRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_1_5_flash: Option<ProviderRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_r_plus: Option<ProviderRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_r: Option<ProviderRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llama_3_70b: Option<ToolSplitRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llama_3_1_8b: Option<ToolSplitRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llama_3_1_70b: Option<ToolSplitRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llama_3_1_405b: Option<ToolSplitRoute>,
}

impl RouterModelConfig {
    /// Config with no per-model routes and no filters; the server applies
    /// its own defaults for anything left unset
    pub fn empty() -> Self {
        Self {
            include_models: None,
            exclude_models: None,
            gpt_4o: None,
            gpt_4o_mini: None,
            claude_3_5_sonnet: None,
            claude_3_haiku: None,
            gemini_1_5_pro: None,
            gemini_1_5_flash: None,
            command_r_plus: None,
            command_r: None,
            llama_3_70b: None,
            llama_3_1_8b: None,
            llama_3_1_70b: None,
            llama_3_1_405b: None,
        }
    }

    pub fn with_include_models(mut self, models: Vec<Llm>) -> Self {
        self.include_models = Some(models);
        self
    }

    pub fn with_exclude_models(mut self, models: Vec<Llm>) -> Self {
        self.exclude_models = Some(models);
        self
    }
}

static DEFAULT_ROUTER_MODEL_CONFIG: Lazy<RouterModelConfig> = Lazy::new(|| RouterModelConfig {
    include_models: None,
    exclude_models: None,
    gpt_4o: Some(ProviderRoute::new(vec![Provider::OpenAi])),
    gpt_4o_mini: Some(ProviderRoute::new(vec![Provider::OpenAi])),
    claude_3_5_sonnet: Some(ProviderRoute::new(vec![Provider::Anthropic])),
    claude_3_haiku: Some(ProviderRoute::new(vec![Provider::Anthropic])),
    gemini_1_5_pro: Some(ProviderRoute::new(vec![Provider::Google])),
    gemini_1_5_flash: Some(ProviderRoute::new(vec![Provider::Google])),
    command_r_plus: Some(ProviderRoute::new(vec![Provider::Cohere])),
    command_r: Some(ProviderRoute::new(vec![Provider::Cohere])),
    llama_3_70b: Some(ToolSplitRoute::new(
        vec![Provider::Groq, Provider::DeepInfra],
        vec![
            Provider::Groq,
            Provider::Fireworks,
            Provider::Together,
            Provider::DeepInfra,
            Provider::Replicate,
        ],
    )),
    llama_3_1_8b: Some(ToolSplitRoute::new(
        vec![Provider::Groq],
        vec![
            Provider::Groq,
            Provider::Fireworks,
            Provider::Together,
            Provider::DeepInfra,
        ],
    )),
    llama_3_1_70b: Some(ToolSplitRoute::new(
        vec![Provider::Groq],
        vec![
            Provider::Groq,
            Provider::Fireworks,
            Provider::Together,
            Provider::DeepInfra,
        ],
    )),
    llama_3_1_405b: Some(ToolSplitRoute::new(
        vec![],
        vec![Provider::Fireworks, Provider::Together, Provider::DeepInfra],
    )),
});

impl Default for RouterModelConfig {
    /// Built-in preference table covering all known models
    fn default() -> Self {
        DEFAULT_ROUTER_MODEL_CONFIG.clone()
    }
}

/// Bounds on server-side fallback, interpreted entirely by the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<Llm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_model_fallback_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_provider_fallback_attempts: Option<u32>,
}

/// Tool-use policy forwarded to the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_use: Option<bool>,
}
