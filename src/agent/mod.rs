//! Conversational agent client.
//!
//! Connects to a running MCP server over streamable HTTP, advertises the
//! server's tools to an OpenAI-compatible chat model, and relays tool calls
//! until the model produces a plain answer. A lost server connection is
//! fatal for the conversation; there is no reconnect.

use pmcp::shared::streamable_http::{
    StreamableHttpTransport, StreamableHttpTransportConfigBuilder,
};
use pmcp::{Client, ClientCapabilities};
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use crate::utils::HttpClient;

/// Upper bound on tool-call rounds for a single user turn.
const MAX_TOOL_ROUNDS: usize = 8;

/// Errors the agent can hit.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The MCP server connection failed or dropped mid-conversation
    #[error("Server connection lost: {0}")]
    ConnectionLost(String),

    /// The chat model API returned an error or an unusable response
    #[error("Chat model error: {0}")]
    Llm(String),

    /// Local configuration problem (bad URL, missing API key)
    #[error("Agent configuration error: {0}")]
    Config(String),
}

impl From<pmcp::Error> for AgentError {
    fn from(err: pmcp::Error) -> Self {
        AgentError::ConnectionLost(err.to_string())
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::Llm(err.to_string())
    }
}

/// One tool the server advertises, in the shape the chat API expects.
#[derive(Debug, Clone)]
pub struct AdvertisedTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl AdvertisedTool {
    /// OpenAI function-calling definition for this tool.
    fn to_function_def(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.input_schema,
            }
        })
    }
}

/// MCP client connection to the statistics server.
#[derive(Debug)]
pub struct AgentClient {
    client: Client<StreamableHttpTransport>,
    tools: Vec<AdvertisedTool>,
}

impl AgentClient {
    /// Connect to the server, initialize the session, and fetch the tool
    /// list.
    pub async fn connect(server_url: &str) -> Result<Self, AgentError> {
        let url = Url::parse(server_url)
            .map_err(|e| AgentError::Config(format!("invalid server URL: {}", e)))?;
        let transport =
            StreamableHttpTransport::new(StreamableHttpTransportConfigBuilder::new(url).build());
        let mut client = Client::new(transport);

        let info = client.initialize(ClientCapabilities::default()).await?;
        info!(
            "connected to {} {}",
            info.server_info.name, info.server_info.version
        );

        let listed = client.list_tools(None).await?;
        let tools = listed
            .tools
            .into_iter()
            .map(|t| AdvertisedTool {
                name: t.name,
                description: t.description.unwrap_or_default(),
                input_schema: t.input_schema,
            })
            .collect();

        Ok(Self { client, tools })
    }

    /// The tools the server advertises.
    pub fn tools(&self) -> &[AdvertisedTool] {
        &self.tools
    }

    /// Call one server tool and flatten the result content to text.
    pub async fn call_tool(&mut self, name: &str, args: Value) -> Result<String, AgentError> {
        debug!("calling tool {} with {}", name, args);
        let result = self.client.call_tool(name.to_string(), args).await?;
        let rendered = serde_json::to_value(&result.content)
            .map(|v| flatten_content(&v))
            .unwrap_or_default();
        Ok(rendered)
    }
}

/// Extract the text parts of an MCP content array into one string.
fn flatten_content(content: &Value) -> String {
    match content.as_array() {
        Some(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n"),
        None => content.to_string(),
    }
}

/// Client for an OpenAI-compatible chat-completions API.
pub struct ChatModel {
    http: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatModel {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }

    /// One chat-completions round trip. Returns the assistant message.
    async fn complete(&self, messages: &[Value], tools: &[Value]) -> Result<Value, AgentError> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if !tools.is_empty() {
            body["tools"] = Value::Array(tools.to_vec());
        }

        let mut request = self
            .http
            .post(&format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AgentError::Llm(format!(
                "chat API returned {}",
                response.status()
            )));
        }
        let payload: Value = response.json().await?;
        payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .cloned()
            .ok_or_else(|| AgentError::Llm("chat API response had no message".to_string()))
    }
}

/// The conversation loop: holds the message history and relays tool calls
/// between the model and the server.
pub struct Conversation {
    server: AgentClient,
    model: ChatModel,
    messages: Vec<Value>,
}

impl Conversation {
    pub fn new(server: AgentClient, model: ChatModel) -> Self {
        let system = "You are a Formula 1 statistics assistant. Use the available tools \
                      to answer questions about historical seasons (1950 to present) and \
                      live session data. Prefer tool results over your own recall.";
        Self {
            server,
            model,
            messages: vec![json!({"role": "system", "content": system})],
        }
    }

    /// Handle one user turn: ask the model, execute any tool calls it makes,
    /// and return its final answer.
    pub async fn ask(&mut self, user_input: &str) -> Result<String, AgentError> {
        self.messages
            .push(json!({"role": "user", "content": user_input}));
        let function_defs: Vec<Value> = self
            .server
            .tools()
            .iter()
            .map(AdvertisedTool::to_function_def)
            .collect();

        for _ in 0..MAX_TOOL_ROUNDS {
            let message = self.model.complete(&self.messages, &function_defs).await?;
            self.messages.push(message.clone());

            let tool_calls = match message.get("tool_calls").and_then(|t| t.as_array()) {
                Some(calls) if !calls.is_empty() => calls.clone(),
                _ => {
                    return Ok(message
                        .get("content")
                        .and_then(|c| c.as_str())
                        .unwrap_or("")
                        .to_string());
                }
            };

            for call in tool_calls {
                let id = call.get("id").and_then(|i| i.as_str()).unwrap_or_default();
                let function = call.get("function").cloned().unwrap_or_default();
                let name = function
                    .get("name")
                    .and_then(|n| n.as_str())
                    .unwrap_or_default()
                    .to_string();
                let args: Value = function
                    .get("arguments")
                    .and_then(|a| a.as_str())
                    .and_then(|a| serde_json::from_str(a).ok())
                    .unwrap_or_else(|| json!({}));

                let result = self.server.call_tool(&name, args).await?;
                self.messages.push(json!({
                    "role": "tool",
                    "tool_call_id": id,
                    "content": result,
                }));
            }
        }

        Err(AgentError::Llm(format!(
            "model did not answer within {} tool rounds",
            MAX_TOOL_ROUNDS
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_def_shape() {
        let tool = AdvertisedTool {
            name: "season_calendar".into(),
            description: "List every Grand Prix of a season".into(),
            input_schema: json!({"type": "object", "properties": {"year": {"type": "integer"}}}),
        };
        let def = tool.to_function_def();
        assert_eq!(def["type"], "function");
        assert_eq!(def["function"]["name"], "season_calendar");
        assert_eq!(def["function"]["parameters"]["type"], "object");
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let err = AgentClient::connect("not a url").await.unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_flatten_content() {
        let content = json!([
            {"type": "text", "text": "first"},
            {"type": "text", "text": "second"},
            {"type": "image", "data": "..."}
        ]);
        assert_eq!(flatten_content(&content), "first\nsecond");
    }

    #[tokio::test]
    async fn test_chat_model_round_trip() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                r#"{"choices": [{"message": {"role": "assistant", "content": "42"}}]}"#,
            )
            .create_async()
            .await;

        let model = ChatModel::new(server.url(), "test-model", None);
        let message = model
            .complete(&[json!({"role": "user", "content": "hi"})], &[])
            .await
            .unwrap();
        assert_eq!(message["content"], "42");
    }

    #[tokio::test]
    async fn test_chat_model_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .create_async()
            .await;

        let model = ChatModel::new(server.url(), "test-model", None);
        let err = model.complete(&[], &[]).await.unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
    }
}
