use super::{tool::ToolFuture, Tool};
use crate::config::DEFAULT_SEARCH_BASE_URL;
use crate::AgentError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const DEFAULT_NUM_RESULTS: u8 = 5;
const MAX_NUM_RESULTS: u8 = 10;

/// Parameters accepted by the web search tool
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WebSearchParams {
    /// Search query, e.g. "best ramen near Shinjuku station"
    pub query: String,
    /// How many organic results to return (1-10, default 5)
    #[serde(default)]
    pub num_results: Option<u8>,
}

/// One organic search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Compact search result handed back to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResponse {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub results: Vec<SearchHit>,
}

/// Google search through SerpApi
#[derive(Debug, Clone)]
pub struct SerpApiTool {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl SerpApiTool {
    /// A missing key is accepted here and reported when the tool is first called.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search(&self, params: WebSearchParams) -> Result<WebSearchResponse, AgentError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AgentError::Config("SERPAPI_KEY is not set; web search is unavailable".to_string())
        })?;

        let num = params
            .num_results
            .unwrap_or(DEFAULT_NUM_RESULTS)
            .clamp(1, MAX_NUM_RESULTS);
        let num_param = num.to_string();
        let url = format!("{}/search.json", self.base_url.trim_end_matches('/'));

        debug!(query = %params.query, num, "searching the web");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", params.query.as_str()),
                ("num", num_param.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await
            .map_err(|err| AgentError::ToolExecution(format!("Failed to call SerpApi: {}", err)))?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|err| {
            AgentError::ToolExecution(format!("Failed to read SerpApi response: {}", err))
        })?;

        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(AgentError::ToolExecution(format!(
                "SerpApi error ({}): {}",
                status, message
            )));
        }

        if !status.is_success() {
            return Err(AgentError::ToolExecution(format!(
                "SerpApi returned status {}",
                status
            )));
        }

        Ok(parse_search_response(&params.query, &body, num as usize))
    }
}

impl Tool for SerpApiTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        "Search the web with Google for current information; returns titles, links and snippets"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let schema = schemars::schema_for!(WebSearchParams);
        serde_json::to_value(&schema.schema).unwrap_or_else(|_| {
            serde_json::json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            })
        })
    }

    fn execute(&self, parameters: serde_json::Value) -> ToolFuture<'_> {
        Box::pin(async move {
            let params: WebSearchParams = serde_json::from_value(parameters).map_err(|err| {
                AgentError::ToolExecution(format!("Invalid parameters: {}", err))
            })?;

            let response = self.search(params).await?;
            Ok(serde_json::to_value(response)?)
        })
    }
}

fn parse_search_response(query: &str, body: &Value, limit: usize) -> WebSearchResponse {
    let answer = body.get("answer_box").and_then(|answer_box| {
        ["answer", "snippet"]
            .iter()
            .find_map(|key| answer_box.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    });

    let results = body
        .get("organic_results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(SearchHit {
                        title: item.get("title")?.as_str()?.to_string(),
                        link: item.get("link")?.as_str()?.to_string(),
                        snippet: item
                            .get("snippet")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                })
                .take(limit)
                .collect()
        })
        .unwrap_or_default();

    WebSearchResponse {
        query: query.to_string(),
        answer,
        results,
    }
}
