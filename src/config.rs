use std::time::Duration;

use crate::error::{AgentError, Result};

pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://serpapi.com";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://vibenavigator247.vercel.app";
pub const DEFAULT_PORT: u16 = 5001;

/// Process-wide settings, loaded once at startup and never mutated afterwards.
///
/// Credentials are optional on purpose: a missing key only fails the stage
/// that actually needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm_api_key: Option<String>,
    pub search_api_key: Option<String>,
    pub llm_base_url: String,
    pub search_base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: usize,
    pub max_iterations: usize,
    pub allowed_origin: String,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_api_key: None,
            search_api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 0,
            max_iterations: 10,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            llm_api_key: non_empty("GOOGLE_API_KEY"),
            search_api_key: non_empty("SERPAPI_KEY"),
            llm_base_url: non_empty("LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            search_base_url: non_empty("SERPAPI_BASE_URL").unwrap_or(defaults.search_base_url),
            model: non_empty("LLM_MODEL").unwrap_or(defaults.model),
            timeout: match non_empty("LLM_TIMEOUT_SECS") {
                Some(raw) => Duration::from_secs(parse_number(&raw, "LLM_TIMEOUT_SECS")?),
                None => defaults.timeout,
            },
            max_retries: match non_empty("LLM_MAX_RETRIES") {
                Some(raw) => parse_number(&raw, "LLM_MAX_RETRIES")?,
                None => defaults.max_retries,
            },
            max_iterations: match non_empty("AGENT_MAX_ITERATIONS") {
                Some(raw) => parse_number(&raw, "AGENT_MAX_ITERATIONS")?,
                None => defaults.max_iterations,
            },
            allowed_origin: match non_empty("ALLOWED_ORIGIN") {
                Some(raw) => parse_origin(&raw)?,
                None => defaults.allowed_origin,
            },
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: match non_empty("PORT") {
                Some(raw) => parse_number(&raw, "PORT")?,
                None => defaults.port,
            },
        })
    }

    pub fn with_allowed_origin(mut self, origin: &str) -> Result<Self> {
        self.allowed_origin = parse_origin(origin)?;
        Ok(self)
    }
}

/// Normalize an allowed CORS origin to `scheme://host[:port]`.
///
/// Browsers send `Origin` without a trailing slash, so one is stripped.
pub fn parse_origin(raw: &str) -> Result<String> {
    let origin = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(origin)
        .map_err(|err| AgentError::Config(format!("ALLOWED_ORIGIN '{raw}' is not a URL: {err}")))?;

    let valid = matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some()
        && url.path() == "/"
        && url.query().is_none();

    if !valid {
        return Err(AgentError::Config(format!(
            "ALLOWED_ORIGIN '{raw}' must look like https://host[:port]"
        )));
    }

    Ok(origin.to_string())
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AgentError::Config(format!("{key} must be a number, got '{raw}'")))
}
