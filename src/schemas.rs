//! JSON schemas for the MCP tools and the function-calling descriptors
//! served to third-party LLM platforms.

use serde_json::{Map, Value, json};
use std::sync::Arc;

pub const TOOL_EPIC_CONSULTATION: &str = "epic_consultation";
pub const TOOL_EPIC_SCORE: &str = "epic_score";
pub const TOOL_CONSULTATION_LOOKUP: &str = "consultation_lookup";
pub const TOOL_DETAILED_HELP: &str = "detailed_help";

pub const TOOL_NAMES: [&str; 4] = [
    TOOL_EPIC_CONSULTATION,
    TOOL_EPIC_SCORE,
    TOOL_CONSULTATION_LOOKUP,
    TOOL_DETAILED_HELP,
];

/// Platforms `function_descriptor` knows how to describe.
pub const PLATFORMS: [&str; 4] = ["openai", "anthropic", "gemini", "mcp"];

const CONSULTATION_DESCRIPTION: &str = "Generate an EPIC go-to-market consultation (Ecosystem, Product-led, Inbound, Community): scores, primary/secondary focus, recommendations and a 180-day roadmap. Results are cached per company for 30 days.";

fn to_map(schema: Value) -> Arc<Map<String, Value>> {
    Arc::new(schema.as_object().cloned().unwrap_or_else(Map::new))
}

/// Business-context properties shared by every tool that accepts a context.
fn business_context_properties() -> Map<String, Value> {
    let props = json!({
        "company_name": {"type": "string", "description": "Company name (alias: company)"},
        "industry": {"type": "string", "description": "Industry, e.g. SaaS, E-commerce, Healthcare (alias: market)"},
        "business_stage": {"type": "string", "description": "Stage, e.g. pre-launch, venture-seed, venture-series-a, bootstrapped, enterprise (alias: stage)"},
        "challenge_text": {"type": "string", "description": "Current go-to-market challenge in free text (aliases: gtm_challenge, current_challenges, challenge)"},
        "company_description": {"type": "string", "description": "Short company description (alias: description)"},
        "team_size": {"type": ["integer", "string"], "minimum": 0, "description": "Headcount; strings like '12 people' are accepted"},
        "monthly_budget": {"type": ["number", "string"], "minimum": 0, "description": "Monthly marketing budget; '$5,000' is accepted"},
        "website": {"type": "string"},
        "digital_presence": {"type": ["array", "string"], "items": {"type": "string"}, "description": "URLs, as a list or comma-separated string"}
    });
    props.as_object().cloned().unwrap_or_default()
}

fn scores_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "E": {"type": "integer", "minimum": 0, "maximum": 100},
            "P": {"type": "integer", "minimum": 0, "maximum": 100},
            "I": {"type": "integer", "minimum": 0, "maximum": 100},
            "C": {"type": "integer", "minimum": 0, "maximum": 100}
        },
        "required": ["E", "P", "I", "C"]
    })
}

fn letter_schema() -> Value {
    json!({"type": "string", "enum": ["E", "P", "I", "C"]})
}

pub fn epic_consultation_schema() -> Arc<Map<String, Value>> {
    let mut props = business_context_properties();
    props.insert(
        "refresh".into(),
        json!({"type": "boolean", "default": false, "description": "Recompute even when a cached consultation exists; attaches a progress comparison"}),
    );
    props.insert(
        "format".into(),
        json!({"type": "string", "enum": ["json", "html"], "default": "json"}),
    );
    to_map(json!({"type": "object", "properties": props}))
}

pub fn epic_score_schema() -> Arc<Map<String, Value>> {
    to_map(json!({"type": "object", "properties": business_context_properties()}))
}

pub fn consultation_lookup_schema() -> Arc<Map<String, Value>> {
    to_map(json!({
        "type": "object",
        "properties": {
            "company_name": {"type": "string"},
            "industry": {"type": "string"},
            "business_stage": {"type": "string"}
        }
    }))
}

pub fn detailed_help_schema() -> Arc<Map<String, Value>> {
    to_map(json!({
        "type": "object",
        "properties": {
            "tool": {"type": "string", "enum": TOOL_NAMES},
            "format": {"type": "string", "enum": ["compact", "full"], "default": "full"}
        }
    }))
}

fn consultation_body_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "company_name": {"type": "string"},
            "industry": {"type": "string"},
            "business_stage": {"type": "string"},
            "epic_scores": scores_schema(),
            "primary_focus": letter_schema(),
            "secondary_focus": letter_schema(),
            "capacity_tier": {"type": "string", "enum": ["constrained", "moderate", "strong", "high"]},
            "recommendations": {
                "type": "array",
                "maxItems": 8,
                "items": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string"},
                        "epic_component": letter_schema(),
                        "priority": {"type": "string", "enum": ["high", "medium", "low"]}
                    },
                    "required": ["text", "epic_component", "priority"]
                }
            },
            "roadmap": {
                "type": "object",
                "properties": {
                    "days_30": {"type": "array"},
                    "days_60": {"type": "array"},
                    "first_quarter": {"type": "array"},
                    "second_quarter": {"type": "array"}
                },
                "required": ["days_30", "days_60", "first_quarter", "second_quarter"]
            }
        },
        "required": ["company_name", "industry", "business_stage", "epic_scores", "primary_focus", "secondary_focus", "capacity_tier", "recommendations", "roadmap"]
    })
}

pub fn epic_consultation_output_schema() -> Arc<Map<String, Value>> {
    to_map(json!({
        "type": "object",
        "properties": {
            "consultation_id": {"type": "string"},
            "cache_key": {"type": "string"},
            "cached": {"type": "boolean"},
            "created_at": {"type": "string"},
            "consultation": consultation_body_schema(),
            "progress": {"type": "object"},
            "html": {"type": "string"}
        },
        "required": ["consultation_id", "cache_key", "cached", "created_at"]
    }))
}

pub fn epic_score_output_schema() -> Arc<Map<String, Value>> {
    to_map(json!({
        "type": "object",
        "properties": {
            "epic_scores": scores_schema(),
            "primary_focus": letter_schema(),
            "secondary_focus": letter_schema()
        },
        "required": ["epic_scores", "primary_focus", "secondary_focus"]
    }))
}

pub fn consultation_lookup_output_schema() -> Arc<Map<String, Value>> {
    to_map(json!({
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "cache_key": {"type": "string"},
            "created_at": {"type": "string"},
            "consultation": consultation_body_schema()
        },
        "required": ["id", "cache_key", "created_at", "consultation"]
    }))
}

pub fn detailed_help_output_schema() -> Arc<Map<String, Value>> {
    to_map(json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "tool": {"type": "string"},
            "description": {"type": "string"},
            "summary": {"type": "string"},
            "arguments": {"type": "object"},
            "returns": {"type": "object"},
            "tools": {"type": "array"}
        }
    }))
}

/// Gemini function declarations take an OpenAPI subset without type unions.
fn collapse_type_unions(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(types)) = map.get("type")
                && let Some(first) = types.first().cloned()
            {
                map.insert("type".into(), first);
            }
            for v in map.values_mut() {
                collapse_type_unions(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(collapse_type_unions),
        _ => {}
    }
}

/// Function-calling descriptor of `epic_consultation` for `platform`.
///
/// Returns `None` for platforms outside [`PLATFORMS`].
pub fn function_descriptor(platform: &str) -> Option<Value> {
    let parameters = Value::Object(epic_consultation_schema().as_ref().clone());
    match platform {
        "openai" => Some(json!({
            "type": "function",
            "function": {
                "name": TOOL_EPIC_CONSULTATION,
                "description": CONSULTATION_DESCRIPTION,
                "parameters": parameters
            }
        })),
        "anthropic" => Some(json!({
            "name": TOOL_EPIC_CONSULTATION,
            "description": CONSULTATION_DESCRIPTION,
            "input_schema": parameters
        })),
        "gemini" => {
            let mut parameters = parameters;
            collapse_type_unions(&mut parameters);
            Some(json!({
                "function_declarations": [{
                    "name": TOOL_EPIC_CONSULTATION,
                    "description": CONSULTATION_DESCRIPTION,
                    "parameters": parameters
                }]
            }))
        }
        "mcp" => Some(json!({
            "name": TOOL_EPIC_CONSULTATION,
            "title": "EPIC Consultation",
            "description": CONSULTATION_DESCRIPTION,
            "inputSchema": parameters,
            "outputSchema": Value::Object(epic_consultation_output_schema().as_ref().clone())
        })),
        _ => None,
    }
}
