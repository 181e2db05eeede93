//! detailed_help tool handler to provide structured help for tools

use crate::error::{EpicConsultError, Result};
use crate::schemas::{
    TOOL_CONSULTATION_LOOKUP, TOOL_DETAILED_HELP, TOOL_EPIC_CONSULTATION, TOOL_EPIC_SCORE,
    TOOL_NAMES,
};
use crate::server::{EpicConsultServer, parse_arguments};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct DetailedHelpParams {
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

const CONTEXT_ARGUMENTS: &[(&str, &str)] = &[
    ("company_name", "string (alias: company); default 'Your Company'"),
    ("industry", "string (alias: market); case-sensitive catalog name, unknown values are neutral"),
    ("business_stage", "string (alias: stage); e.g. 'venture-seed', 'series-a', 'bootstrapped'; default 'mid-market'"),
    ("challenge_text", "string (aliases: gtm_challenge, current_challenges, challenge); keyword-matched"),
    ("company_description", "string (alias: description); keyword-matched"),
    ("team_size", "integer|string; drives the capacity tier"),
    ("monthly_budget", "number|string like '$5,000'; drives the capacity tier"),
    ("digital_presence", "string[]|string; URLs listed in the report"),
];

fn context_arguments() -> serde_json::Map<String, Value> {
    CONTEXT_ARGUMENTS
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

/// Full help document for `tool`, or `None` when the name is unknown.
pub fn tool_help(tool: &str) -> Option<Value> {
    let help = match tool {
        TOOL_EPIC_CONSULTATION => {
            let mut args = context_arguments();
            args.insert(
                "refresh".into(),
                json!("boolean (default false); recompute and attach a progress report against the cached result"),
            );
            args.insert("format".into(), json!("'json'|'html' (default 'json'); html adds a rendered report"));
            json!({
                "name": TOOL_EPIC_CONSULTATION,
                "description": "Run the full EPIC consultation. Results are cached for 30 days per company/industry/stage; a cache hit returns cached=true.",
                "arguments": args,
                "returns": {
                    "consultation_id": "uuid",
                    "cache_key": "string",
                    "cached": "boolean",
                    "created_at": "RFC 3339 timestamp",
                    "consultation": "{company_name, industry, business_stage, epic_scores, primary_focus, secondary_focus, capacity_tier, recommendations, roadmap}",
                    "progress": "present after refresh when a previous consultation existed",
                    "html": "present when format = 'html'"
                },
                "examples": [{
                    "request": {"name": TOOL_EPIC_CONSULTATION, "arguments": {"company_name": "Acme", "industry": "SaaS", "business_stage": "venture-seed", "challenge_text": "We need better product-led growth and onboarding"}},
                    "response": {"cached": false, "consultation": {"epic_scores": {"E": 22, "P": 57, "I": 30, "C": 25}, "primary_focus": "P"}}
                }]
            })
        }
        TOOL_EPIC_SCORE => json!({
            "name": TOOL_EPIC_SCORE,
            "description": "Score a business context without caching. Scores are integers 0-100; ties resolve P, E, I, C.",
            "arguments": context_arguments(),
            "returns": {"epic_scores": "{E, P, I, C}", "primary_focus": "letter", "secondary_focus": "letter"}
        }),
        TOOL_CONSULTATION_LOOKUP => json!({
            "name": TOOL_CONSULTATION_LOOKUP,
            "description": "Fetch the cached consultation for a company identity. Errors when nothing fresh is cached.",
            "arguments": {
                "company_name": "string",
                "industry": "string",
                "business_stage": "string"
            },
            "returns": {"id": "uuid", "cache_key": "string", "created_at": "timestamp", "consultation": "object"}
        }),
        TOOL_DETAILED_HELP => json!({
            "name": TOOL_DETAILED_HELP,
            "description": "Help for a tool; without 'tool' lists every tool.",
            "arguments": {
                "tool": "string; one of the tool names",
                "format": "'compact'|'full' (default 'full')"
            },
            "returns": {"name": "string", "description": "string", "arguments": "object"}
        }),
        _ => return None,
    };
    Some(help)
}

impl EpicConsultServer {
    /// Handle the detailed_help tool call
    pub async fn handle_detailed_help(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: DetailedHelpParams = parse_arguments(request.arguments)?;
        let format = params.format.as_deref().unwrap_or("full");
        if format != "full" && format != "compact" {
            return Err(EpicConsultError::Validation {
                message: format!("Unknown format: {}", format),
            });
        }

        let Some(tool) = params.tool else {
            let tools: Vec<Value> = TOOL_NAMES
                .iter()
                .filter_map(|name| tool_help(name))
                .map(|h| json!({"name": h["name"], "description": h["description"]}))
                .collect();
            return Ok(CallToolResult::structured(json!({ "tools": tools })));
        };

        let help = tool_help(&tool).ok_or_else(|| EpicConsultError::Validation {
            message: format!("Unknown tool: {}", tool),
        })?;

        let output = if format == "compact" {
            // Provide a concise one-paragraph summary
            json!({
                "tool": tool,
                "summary": help.get("description").cloned().unwrap_or(json!("")),
                "arguments": help.get("arguments").cloned().unwrap_or(json!({}))
            })
        } else {
            help
        };

        Ok(CallToolResult::structured(output))
    }
}
