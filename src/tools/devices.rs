use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::params::{clamp_limit, non_empty};
use super::{Tool, ToolContext, ToolResult, decode_items, parse_args, to_value};
use crate::api::constants::endpoints;
use crate::api::RequestDescriptor;

pub const DEFAULT_DEVICE_LIMIT: u32 = 25;
pub const MAX_DEVICE_LIMIT: u32 = 500;

fn default_limit() -> u32 {
    DEFAULT_DEVICE_LIMIT
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkDevicesArgs {
    pub hostname: Option<String>,
    pub management_ip: Option<String>,
    pub device_family: Option<String>,
    pub device_type: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDevice {
    pub hostname: Option<String>,
    pub management_ip_address: Option<String>,
    pub family: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub software_version: Option<String>,
    pub reachability_status: Option<String>,
    pub serial_number: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkDevicesResponse {
    pub devices: Vec<NetworkDevice>,
    pub count: usize,
}

pub struct GetNetworkDevices;

impl GetNetworkDevices {
    pub fn build_request(args: NetworkDevicesArgs) -> RequestDescriptor {
        RequestDescriptor::get(endpoints::NETWORK_DEVICE)
            .param("limit", clamp_limit(args.limit, MAX_DEVICE_LIMIT))
            .param_opt("hostname", non_empty(args.hostname))
            .param_opt("managementIpAddress", non_empty(args.management_ip))
            .param_opt("family", non_empty(args.device_family))
            .param_opt("type", non_empty(args.device_type))
    }
}

#[async_trait]
impl Tool for GetNetworkDevices {
    fn name(&self) -> &'static str {
        "get_network_devices"
    }

    fn description(&self) -> &'static str {
        "Get the list of network devices matching the filter criteria. Hostname and \
         management IP filters support the .* wildcard."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "hostname": {"type": "string", "description": "Device hostname (supports .* wildcard)"},
                "management_ip": {"type": "string", "description": "Management IP address (supports .* wildcard)"},
                "device_family": {"type": "string", "description": "Device family, e.g. 'Switches and Hubs', 'Routers'"},
                "device_type": {"type": "string", "description": "Device type"},
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_DEVICE_LIMIT,
                    "default": DEFAULT_DEVICE_LIMIT,
                    "description": "Maximum number of devices to return"
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult {
        let args: NetworkDevicesArgs = parse_args(arguments)?;
        ctx.info("Fetching network devices");
        let payload = ctx.client.request(&Self::build_request(args)).await?;
        let devices: Vec<NetworkDevice> = decode_items(&payload)?;
        ctx.info(format!("Found {} matching devices", devices.len()));
        to_value(&NetworkDevicesResponse {
            count: devices.len(),
            devices,
        })
    }
}
