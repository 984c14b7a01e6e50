//! Catalyst Center tools exposed over MCP
//!
//! Each tool maps its arguments onto a [`RequestDescriptor`](crate::api::RequestDescriptor),
//! calls the shared [`CatalystClient`], and shapes the JSON that comes back.
//! Progress is reported through a [`ToolContext`] so the MCP client sees it too.

pub mod clients;
pub mod compliance;
pub mod devices;
pub mod health;
pub mod issues;
pub mod params;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::api::{ApiError, CatalystClient};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type ToolResult = Result<Value, ToolError>;

/// Receives progress messages while a tool runs
pub trait Progress: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);
}

/// What a tool gets to work with during one call
pub struct ToolContext<'a> {
    pub client: &'a CatalystClient,
    progress: &'a dyn Progress,
}

impl<'a> ToolContext<'a> {
    pub fn new(client: &'a CatalystClient, progress: &'a dyn Progress) -> Self {
        Self { client, progress }
    }

    /// Log locally and forward to the client
    pub fn info(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::info!("{}", message);
        self.progress.info(message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::warn!("{}", message);
        self.progress.error(message);
    }
}

/// A single callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON Schema describing the tool's arguments
    fn input_schema(&self) -> Value;

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult;
}

/// Tool metadata as advertised by `tools/list`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// The fixed set of tools served by this process
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: vec![
                Box::new(clients::GetClientCounts),
                Box::new(devices::GetNetworkDevices),
                Box::new(health::GetNetworkHealth),
                Box::new(issues::GetIssues),
                Box::new(health::GetSiteHealth),
                Box::new(clients::GetClientDetail),
                Box::new(compliance::GetComplianceStatus),
                Box::new(compliance::GetEoxSummary),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize tool arguments, treating a missing argument object as `{}`
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Extract the `response` array most intent API payloads wrap their data in
pub(crate) fn response_items(payload: &Value) -> Vec<Value> {
    payload
        .get("response")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default()
}

/// Decode each item of a `response` array into a typed record
pub(crate) fn decode_items<T: DeserializeOwned>(payload: &Value) -> Result<Vec<T>, ToolError> {
    response_items(payload)
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ToolError::UnexpectedResponse(e.to_string())))
        .collect()
}

/// Timestamp echoed back with point-in-time results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataTimestamp {
    Epoch(u64),
    Current(&'static str),
}

impl DataTimestamp {
    /// Echo the requested time; zero or no timestamp means current data
    pub fn from_request(timestamp: Option<u64>) -> Self {
        match timestamp {
            Some(ts) if ts > 0 => DataTimestamp::Epoch(ts),
            _ => DataTimestamp::Current("current"),
        }
    }
}

pub(crate) fn to_value<T: Serialize>(result: &T) -> ToolResult {
    serde_json::to_value(result).map_err(|e| ToolError::UnexpectedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_names_unique_and_complete() {
        let registry = ToolRegistry::new();
        let mut names = registry.names();
        assert_eq!(names.len(), 8);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
        assert!(registry.get("get_issues").is_some());
        assert!(registry.get("delete_everything").is_none());
    }

    #[test]
    fn test_schemas_are_objects() {
        for def in ToolRegistry::new().definitions() {
            assert_eq!(def.input_schema["type"], "object", "tool {}", def.name);
            assert!(!def.description.is_empty());
        }
    }

    #[test]
    fn test_parse_args_null_is_empty_object() {
        #[derive(serde::Deserialize)]
        struct Args {
            #[serde(default)]
            limit: Option<u32>,
        }
        let args: Args = parse_args(Value::Null).unwrap();
        assert_eq!(args.limit, None);
    }

    #[test]
    fn test_timestamp_serialization() {
        assert_eq!(serde_json::to_value(DataTimestamp::from_request(Some(42))).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(DataTimestamp::from_request(None)).unwrap(), json!("current"));
    }

    #[test]
    fn test_zero_timestamp_reported_as_current() {
        assert_eq!(DataTimestamp::from_request(Some(0)), DataTimestamp::Current("current"));
    }
}
