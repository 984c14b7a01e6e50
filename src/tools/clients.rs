use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::params::MacAddress;
use super::{DataTimestamp, Tool, ToolContext, ToolResult, parse_args, response_items, to_value};
use crate::api::constants::endpoints;
use crate::api::RequestDescriptor;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientCountsArgs {
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientCounts {
    pub wired_count: u64,
    pub wireless_count: u64,
    pub total_count: u64,
    pub timestamp: DataTimestamp,
}

pub struct GetClientCounts;

impl GetClientCounts {
    pub fn build_request(args: &ClientCountsArgs) -> RequestDescriptor {
        RequestDescriptor::get(endpoints::CLIENT_HEALTH).param_opt("timestamp", args.timestamp)
    }

    /// Sum client counts per connection type across all sites in a client-health payload
    pub fn summarize(payload: &Value, timestamp: Option<u64>) -> ClientCounts {
        let mut wired_count = 0;
        let mut wireless_count = 0;

        for site in response_items(payload) {
            let Some(scores) = site.get("scoreDetail").and_then(|s| s.as_array()) else {
                continue;
            };
            for score in scores {
                let count = score.get("clientCount").and_then(|c| c.as_u64()).unwrap_or(0);
                match score.pointer("/scoreCategory/value").and_then(|v| v.as_str()) {
                    Some("WIRED") => wired_count += count,
                    Some("WIRELESS") => wireless_count += count,
                    _ => {}
                }
            }
        }

        ClientCounts {
            wired_count,
            wireless_count,
            total_count: wired_count + wireless_count,
            timestamp: DataTimestamp::from_request(timestamp),
        }
    }
}

#[async_trait]
impl Tool for GetClientCounts {
    fn name(&self) -> &'static str {
        "get_client_counts"
    }

    fn description(&self) -> &'static str {
        "Get the count of wired and wireless clients connected to the network. \
         Optionally pass an epoch timestamp in milliseconds to query historical data."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timestamp": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Epoch time in milliseconds. Omit for current data."
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult {
        let args: ClientCountsArgs = parse_args(arguments)?;
        ctx.info("Fetching client counts from Catalyst Center");
        let payload = ctx.client.request(&Self::build_request(&args)).await?;
        let counts = Self::summarize(&payload, args.timestamp);
        ctx.info(format!(
            "Retrieved {} wired, {} wireless ({} total) clients",
            counts.wired_count, counts.wireless_count, counts.total_count
        ));
        to_value(&counts)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientDetailArgs {
    pub mac_address: MacAddress,
    pub timestamp: Option<u64>,
}

pub struct GetClientDetail;

impl GetClientDetail {
    pub fn build_request(args: &ClientDetailArgs) -> RequestDescriptor {
        RequestDescriptor::get(endpoints::CLIENT_DETAIL)
            .param("macAddress", &args.mac_address)
            .param_opt("timestamp", args.timestamp)
    }
}

#[async_trait]
impl Tool for GetClientDetail {
    fn name(&self) -> &'static str {
        "get_client_detail"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a specific client by MAC address, including \
         connection status, health scores and connectivity details."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "mac_address": {
                    "type": "string",
                    "pattern": "^[0-9A-Fa-f]{2}(:[0-9A-Fa-f]{2}){5}$",
                    "description": "Client MAC address (xx:xx:xx:xx:xx:xx)"
                },
                "timestamp": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Epoch time in milliseconds. Omit for current data."
                }
            },
            "required": ["mac_address"],
            "additionalProperties": false
        })
    }

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult {
        let args: ClientDetailArgs = parse_args(arguments)?;
        ctx.info(format!("Fetching details for client {}", args.mac_address));
        let detail = ctx.client.request(&Self::build_request(&args)).await?;
        ctx.info(format!("Retrieved detailed information for client {}", args.mac_address));
        Ok(detail)
    }
}
