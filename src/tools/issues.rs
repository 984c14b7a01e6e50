use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::params::{AiDriven, IssueStatus, MacAddress, Priority, non_empty};
use super::{Tool, ToolContext, ToolResult, decode_items, parse_args, to_value};
use crate::api::constants::endpoints;
use crate::api::RequestDescriptor;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuesArgs {
    pub priority: Option<Priority>,
    pub issue_status: Option<IssueStatus>,
    pub site_id: Option<String>,
    pub device_id: Option<String>,
    pub mac_address: Option<MacAddress>,
    pub ai_driven: Option<AiDriven>,
}

// Field spellings follow the upstream payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub issue_id: Option<String>,
    pub name: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub issue_occurence_count: Option<i64>,
    pub last_occurence_time: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuesResponse {
    pub issues: Vec<Issue>,
    pub count: usize,
}

pub struct GetIssues;

impl GetIssues {
    pub fn build_request(args: IssuesArgs) -> RequestDescriptor {
        RequestDescriptor::get(endpoints::ISSUES)
            .param_opt("priority", args.priority)
            .param_opt("issueStatus", args.issue_status)
            .param_opt("siteId", non_empty(args.site_id))
            .param_opt("deviceId", non_empty(args.device_id))
            .param_opt("macAddress", args.mac_address)
            .param_opt("aiDriven", args.ai_driven)
    }
}

#[async_trait]
impl Tool for GetIssues {
    fn name(&self) -> &'static str {
        "get_issues"
    }

    fn description(&self) -> &'static str {
        "Get network issues filtered by priority, status, site, device, client MAC \
         address or AI-driven flag."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "priority": {"type": "string", "enum": Priority::VALUES, "description": "Issue priority (case insensitive)"},
                "issue_status": {"type": "string", "enum": IssueStatus::VALUES, "description": "Issue status (case insensitive)"},
                "site_id": {"type": "string", "description": "Site UUID"},
                "device_id": {"type": "string", "description": "Device UUID"},
                "mac_address": {
                    "type": "string",
                    "pattern": "^[0-9A-Fa-f]{2}(:[0-9A-Fa-f]{2}){5}$",
                    "description": "Client MAC address (xx:xx:xx:xx:xx:xx)"
                },
                "ai_driven": {"type": "string", "enum": AiDriven::VALUES, "description": "AI-driven issues only (case insensitive)"}
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, ctx: &ToolContext<'_>, arguments: Value) -> ToolResult {
        let args: IssuesArgs = parse_args(arguments)?;
        ctx.info("Fetching network issues");
        let payload = ctx.client.request(&Self::build_request(args)).await?;
        let issues: Vec<Issue> = decode_items(&payload)?;
        ctx.info(format!("Found {} matching issues", issues.len()));
        to_value(&IssuesResponse {
            count: issues.len(),
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_filters_canonicalized() {
        let args: IssuesArgs = parse_args(json!({
            "priority": "p2",
            "issue_status": "active",
            "ai_driven": "no",
            "site_id": "site-1"
        }))
        .unwrap();

        let request = GetIssues::build_request(args);
        assert_eq!(request.param_value("priority"), Some("P2"));
        assert_eq!(request.param_value("issueStatus"), Some("ACTIVE"));
        assert_eq!(request.param_value("aiDriven"), Some("NO"));
        assert_eq!(request.param_value("siteId"), Some("site-1"));
        assert_eq!(request.param_value("deviceId"), None);
    }

    #[test]
    fn test_unknown_argument_rejected() {
        assert!(parse_args::<IssuesArgs>(json!({"severity": "high"})).is_err());
    }

    #[test]
    fn test_issue_decoding() {
        let payload = json!({
            "response": [{
                "issueId": "i-1",
                "name": "AP down",
                "priority": "P1",
                "status": "ACTIVE",
                "category": "Availability",
                "issueOccurenceCount": 3,
                "lastOccurenceTime": 1700000000000i64
            }]
        });
        let issues: Vec<Issue> = decode_items(&payload).unwrap();
        assert_eq!(issues[0].issue_occurence_count, Some(3));
        assert_eq!(serde_json::to_value(&issues[0]).unwrap()["issueId"], "i-1");
    }
}
