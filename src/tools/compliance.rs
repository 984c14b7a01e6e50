use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::params::{ComplianceStatus, clamp_limit, clamp_offset, non_empty};
use super::{Tool, ToolContext, ToolResult, decode_items, parse_args, to_value};
use crate::api::constants::endpoints;
use crate::api::RequestDescriptor;

pub const DEFAULT_COMPLIANCE_LIMIT: u32 = 25;
pub const MAX_COMPLIANCE_LIMIT: u32 = 500;

fn default_limit() -> u32 {
    DEFAULT_COMPLIANCE_LIMIT
}

fn default_offset() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplianceArgs {
    pub compliance_status: Option<ComplianceStatus>,
    pub device_uuid: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_offset")]
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCompliance {
    pub device_uuid: Option<String>,
    pub compliance_status: Option<String>,
    pub last_update_time: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceResponse {
    pub devices: Vec<DeviceCompliance>,
    pub count: usize,
}

pub struct GetComplianceStatus;

impl GetComplianceStatus {
    pub fn build_request(args: ComplianceArgs) -> RequestDescriptor {
        RequestDescriptor::get(endpoints::COMPLIANCE)
            .param_opt("complianceStatus", args.compliance_status)
            .param_opt("deviceUuid", non_empty(args.device_uuid))
            .param("limit", clamp_limit(args.limit, MAX_COMPLIANCE_LIMIT))
            .param("offset", clamp_offset(args.offset))
    }
}

#[async_trait]
impl Tool for GetComplianceStatus {
    fn name(&self) -> &'static str {
        "get_compliance_status"
    }

    fn description(&self) -> &'static str {
        "Get the configuration compliance status of network devices, optionally \
         filtered by status or device UUID."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "compliance_status": {
                    "type": "string",
                    "enum": ComplianceStatus::VALUES,
                    "description": "Compliance status filter (case insensitive)"
                },
                "device_uuid": {"type": "string", "description": "Device UUID"},
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_COMPLIANCE_LIMIT,
                    "default": DEFAULT_COMPLIANCE_LIMIT
                },
                "offset": {"type": "integer", "minimum": 1, "default": 1, "description": "1-based pagination offset"}
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult {
        let args: ComplianceArgs = parse_args(arguments)?;
        ctx.info("Fetching device compliance status");
        let payload = ctx.client.request(&Self::build_request(args)).await?;
        let devices: Vec<DeviceCompliance> = decode_items(&payload)?;
        ctx.info(format!("Retrieved compliance status for {} devices", devices.len()));
        to_value(&ComplianceResponse {
            count: devices.len(),
            devices,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EoxSummaryArgs {}

/// Counts of devices affected by end-of-life (EoX) announcements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EoxSummary {
    pub hardware_count: i64,
    pub software_count: i64,
    pub module_count: i64,
    pub total_count: i64,
}

pub struct GetEoxSummary;

impl GetEoxSummary {
    pub fn build_request() -> RequestDescriptor {
        RequestDescriptor::get(endpoints::EOX_SUMMARY)
    }

    pub fn summarize(payload: &Value) -> EoxSummary {
        let summary = payload.get("response").unwrap_or(&Value::Null);
        let int = |key: &str| summary.get(key).and_then(|v| v.as_i64()).unwrap_or(0);
        EoxSummary {
            hardware_count: int("hardwareCount"),
            software_count: int("softwareCount"),
            module_count: int("moduleCount"),
            total_count: int("totalCount"),
        }
    }
}

#[async_trait]
impl Tool for GetEoxSummary {
    fn name(&self) -> &'static str {
        "get_eox_summary"
    }

    fn description(&self) -> &'static str {
        "Get a summary of devices affected by hardware, software and module \
         end-of-life (EoX) announcements."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult {
        let _: EoxSummaryArgs = parse_args(arguments)?;
        ctx.info("Fetching EoX summary");
        let payload = ctx.client.request(&Self::build_request()).await?;
        let summary = Self::summarize(&payload);
        ctx.info(format!("{} devices affected by EoX announcements", summary.total_count));
        to_value(&summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_request() {
        let args: ComplianceArgs = parse_args(json!({"compliance_status": "non_compliant", "limit": 0})).unwrap();
        let request = GetComplianceStatus::build_request(args);
        assert_eq!(request.path, endpoints::COMPLIANCE);
        assert_eq!(request.param_value("complianceStatus"), Some("NON_COMPLIANT"));
        assert_eq!(request.param_value("limit"), Some("1"));
        assert_eq!(request.param_value("offset"), Some("1"));
        assert_eq!(request.param_value("deviceUuid"), None);
    }

    #[test]
    fn test_eox_summary_defaults() {
        let payload = json!({"response": {"hardwareCount": 4, "softwareCount": 2, "totalCount": 6}});
        let summary = GetEoxSummary::summarize(&payload);
        assert_eq!(summary.hardware_count, 4);
        assert_eq!(summary.module_count, 0);
        assert_eq!(summary.total_count, 6);

        assert_eq!(GetEoxSummary::summarize(&Value::Null).total_count, 0);
    }

    #[test]
    fn test_eox_rejects_arguments() {
        assert!(parse_args::<EoxSummaryArgs>(json!({"limit": 5})).is_err());
        assert!(parse_args::<EoxSummaryArgs>(Value::Null).is_ok());
    }
}
