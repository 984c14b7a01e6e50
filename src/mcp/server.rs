use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use super::notify::{ClientNotifier, Outbound};
use super::protocol::{
    CallToolParams, CallToolResult, Implementation, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, LoggingCapability, LoggingLevel, MCP_PROTOCOL_VERSION, ServerCapabilities, SetLevelParams,
    ToolsCapability,
};
use crate::api::CatalystClient;
use crate::tools::{Progress, ToolContext, ToolError, ToolRegistry};

pub const SERVER_NAME: &str = "catalyst-center-mcp";

const INSTRUCTIONS: &str = "Tools for querying Cisco Catalyst Center: client counts and \
    details, device inventory, network and site health, issues, compliance and EoX summaries.";

/// MCP request dispatcher.
///
/// Holds the one API client for the process; every tool call goes through it.
pub struct McpServer {
    client: Arc<CatalystClient>,
    tools: ToolRegistry,
    // Minimum level for `notifications/message`, set by `logging/setLevel`
    log_level: AtomicU8,
}

impl McpServer {
    pub fn new(client: Arc<CatalystClient>) -> Self {
        Self {
            client,
            tools: ToolRegistry::new(),
            log_level: AtomicU8::new(LoggingLevel::Info.as_u8()),
        }
    }

    pub fn log_level(&self) -> LoggingLevel {
        LoggingLevel::from_u8(self.log_level.load(Ordering::Relaxed))
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle one raw message line. Returns the serialized response, if any.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        self.handle_message(line, None).await
    }

    /// Like [`handle_line`](Self::handle_line), sending tool progress to `outbound` as it happens
    pub async fn handle_message(&self, line: &str, outbound: Option<&Outbound>) -> Option<String> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding unparseable message: {}", e);
                return Self::encode(JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error(e)));
            }
        };

        if raw.is_array() {
            return Self::encode(JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::invalid_request("batch requests are not supported"),
            ));
        }

        let id = raw.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                return Self::encode(JsonRpcResponse::failure(id, JsonRpcError::invalid_request(e)));
            }
        };

        let response = self.dispatch(request, outbound).await?;
        Self::encode(response)
    }

    /// Dispatch a parsed request. Notifications produce no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        self.dispatch(request, None).await
    }

    async fn dispatch(&self, request: JsonRpcRequest, outbound: Option<&Outbound>) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            log::debug!("Received notification {}", request.method);
            return None;
        };

        if id.is_null() {
            return Some(JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::invalid_request("request id must not be null"),
            ));
        }

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request(format!("unsupported jsonrpc version '{}'", request.jsonrpc)),
            ));
        }

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools.definitions() })),
            "logging/setLevel" => self.set_level(request.params),
            "tools/call" => self.call_tool(request.params, outbound).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let client_name = params
            .and_then(|p| p.pointer("/clientInfo/name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");
        log::info!("Initializing session for client {}", client_name);

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
                logging: LoggingCapability::default(),
            },
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: INSTRUCTIONS.to_string(),
        };

        serde_json::to_value(result).unwrap_or(Value::Null)
    }

    fn set_level(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("missing params"))?;
        let params: SetLevelParams = serde_json::from_value(params).map_err(JsonRpcError::invalid_params)?;
        self.log_level.store(params.level.as_u8(), Ordering::Relaxed);
        log::info!("Client log level set to {:?}", params.level);
        Ok(json!({}))
    }

    async fn call_tool(&self, params: Option<Value>, outbound: Option<&Outbound>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("missing params"))?;
        let params: CallToolParams = serde_json::from_value(params).map_err(JsonRpcError::invalid_params)?;

        let tool = self
            .tools
            .get(&params.name)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("unknown tool '{}'", params.name)))?;

        log::debug!("Calling tool {}", params.name);
        let notifier = ClientNotifier::new(outbound, &self.log_level, SERVER_NAME);
        let ctx = ToolContext::new(&self.client, &notifier);

        let result = match tool.call(&ctx, params.arguments).await {
            Ok(value) => CallToolResult::success(value),
            Err(e) => {
                log::warn!("Tool {} failed: {}", params.name, e);
                let message = Self::describe_failure(tool.name(), &e);
                notifier.error(&message);
                CallToolResult::error(message)
            }
        };

        serde_json::to_value(result).map_err(JsonRpcError::internal_error)
    }

    fn describe_failure(tool: &str, error: &ToolError) -> String {
        match error {
            ToolError::Api(api) if api.is_retryable_later() => {
                format!("{} failed ({}); retrying later may succeed", tool, api)
            }
            other => format!("{} failed: {}", tool, other),
        }
    }

    fn encode(response: JsonRpcResponse) -> Option<String> {
        match serde_json::to_string(&response) {
            Ok(line) => Some(line),
            Err(e) => {
                log::error!("Failed to serialize response: {}", e);
                None
            }
        }
    }
}
