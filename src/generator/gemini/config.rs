use super::error::{GeminiError, GeminiResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Runtime configuration describing how to reach the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Sent as `x-goog-api-key`.
    pub api_key: String,
    /// Model name, e.g. `gemini-3-flash-preview`.
    pub model: String,
    /// Scheme and host, without a trailing path.
    pub base_url: String,
}

impl GeminiConfig {
    /// Construct a configuration for the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Use a different model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different endpoint (proxies, local mocks).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> GeminiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GeminiError::MissingEnvVar {
                var: "GEMINI_API_KEY",
            })?;

        let mut config = Self::new(api_key);
        if let Some(model) = std::env::var("GEMINI_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
        {
            config = config.with_model(model);
        }
        if let Some(base_url) = std::env::var("GEMINI_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
        {
            config = config.with_base_url(base_url);
        }

        Ok(config)
    }
}
