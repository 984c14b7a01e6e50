use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

use super::params::{SiteType, clamp_limit, clamp_offset};
use super::{DataTimestamp, Tool, ToolContext, ToolResult, decode_items, parse_args, response_items, to_value};
use crate::api::constants::endpoints;
use crate::api::RequestDescriptor;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkHealthArgs {
    pub timestamp: Option<u64>,
}

/// Health figures for one device category (Access, Core, Router, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHealth {
    /// -1 means not applicable
    pub health_score: i64,
    pub total_count: i64,
    pub good_count: i64,
    pub bad_count: i64,
    pub fair_count: i64,
    pub unmonitored_count: i64,
}

impl CategoryHealth {
    fn from_payload(item: &Value) -> Self {
        let int = |key: &str, default: i64| item.get(key).and_then(|v| v.as_i64()).unwrap_or(default);
        Self {
            health_score: int("healthScore", -1),
            total_count: int("totalCount", 0),
            good_count: int("goodCount", 0),
            bad_count: int("badCount", 0),
            fair_count: int("fairCount", 0),
            unmonitored_count: int("unmonitoredCount", 0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkHealthResponse {
    pub categories: BTreeMap<String, CategoryHealth>,
    pub timestamp: DataTimestamp,
}

pub struct GetNetworkHealth;

impl GetNetworkHealth {
    pub fn build_request(args: &NetworkHealthArgs) -> RequestDescriptor {
        RequestDescriptor::get(endpoints::NETWORK_HEALTH).param_opt("timestamp", args.timestamp)
    }

    pub fn summarize(payload: &Value, timestamp: Option<u64>) -> NetworkHealthResponse {
        let categories = response_items(payload)
            .iter()
            .map(|item| {
                let name = item
                    .get("category")
                    .and_then(|c| c.as_str())
                    .unwrap_or("Unknown")
                    .to_string();
                (name, CategoryHealth::from_payload(item))
            })
            .collect();

        NetworkHealthResponse {
            categories,
            timestamp: DataTimestamp::from_request(timestamp),
        }
    }
}

#[async_trait]
impl Tool for GetNetworkHealth {
    fn name(&self) -> &'static str {
        "get_network_health"
    }

    fn description(&self) -> &'static str {
        "Get overall network health by device category (Access, Distribution, Core, \
         Router, Wireless)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timestamp": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "UTC epoch time in milliseconds. Omit for current data."
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult {
        let args: NetworkHealthArgs = parse_args(arguments)?;
        ctx.info("Fetching network health data");
        let payload = ctx.client.request(&Self::build_request(&args)).await?;
        let health = Self::summarize(&payload, args.timestamp);
        ctx.info(format!("Retrieved health data for {} device categories", health.categories.len()));
        to_value(&health)
    }
}

pub const DEFAULT_SITE_LIMIT: u32 = 25;
pub const MAX_SITE_LIMIT: u32 = 50;

fn default_site_limit() -> u32 {
    DEFAULT_SITE_LIMIT
}

fn default_offset() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteHealthArgs {
    pub site_type: Option<SiteType>,
    #[serde(default = "default_site_limit")]
    pub limit: u32,
    #[serde(default = "default_offset")]
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteHealth {
    pub site_name: Option<String>,
    pub site_type: Option<String>,
    pub healthy_network_device_percentage: Option<i64>,
    pub healthy_clients_percentage: Option<i64>,
    pub number_of_clients: Option<i64>,
    pub number_of_network_device: Option<i64>,
    pub network_health_average: Option<i64>,
    pub client_health_average: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteHealthResponse {
    pub sites: Vec<SiteHealth>,
    pub count: usize,
}

pub struct GetSiteHealth;

impl GetSiteHealth {
    pub fn build_request(args: &SiteHealthArgs) -> RequestDescriptor {
        RequestDescriptor::get(endpoints::SITE_HEALTH)
            .param("limit", clamp_limit(args.limit, MAX_SITE_LIMIT))
            .param("offset", clamp_offset(args.offset))
            .param_opt("siteType", args.site_type)
    }
}

#[async_trait]
impl Tool for GetSiteHealth {
    fn name(&self) -> &'static str {
        "get_site_health"
    }

    fn description(&self) -> &'static str {
        "Get health information for sites in the network hierarchy, optionally \
         filtered by site type."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "site_type": {
                    "type": "string",
                    "enum": SiteType::VALUES,
                    "description": "Site type filter (case insensitive)"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_SITE_LIMIT,
                    "default": DEFAULT_SITE_LIMIT
                },
                "offset": {
                    "type": "integer",
                    "minimum": 1,
                    "default": 1,
                    "description": "1-based pagination offset"
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult {
        let args: SiteHealthArgs = parse_args(arguments)?;
        ctx.info("Fetching site health data");
        let payload = ctx.client.request(&Self::build_request(&args)).await?;
        let sites: Vec<SiteHealth> = decode_items(&payload)?;
        ctx.info(format!("Retrieved health data for {} sites", sites.len()));
        to_value(&SiteHealthResponse {
            count: sites.len(),
            sites,
        })
    }
}
