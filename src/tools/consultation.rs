//! epic_consultation and epic_score tool handlers

use crate::engine::{self, RawBusinessContext};
use crate::error::Result;
use crate::report::render_html;
use crate::server::{EpicConsultServer, parse_arguments};
use crate::store::{ConsultOptions, ConsultationOutcome, consult_with_cache};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Output format of epic_consultation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
}

/// Non-context arguments accepted alongside the business context.
#[derive(Debug, Default, Deserialize)]
pub struct ConsultationFlags {
    #[serde(default)]
    pub refresh: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Score-only view returned by epic_score and `POST /api/score`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub epic_scores: engine::EpicScores,
    pub primary_focus: engine::EpicLetter,
    pub secondary_focus: engine::EpicLetter,
}

pub fn score_summary(raw: &RawBusinessContext) -> ScoreSummary {
    let ctx = engine::normalize(raw);
    let epic_scores = engine::score(&ctx);
    let focus = engine::classify(&epic_scores);
    ScoreSummary {
        epic_scores,
        primary_focus: focus.primary,
        secondary_focus: focus.secondary,
    }
}

/// Serialize an outcome, inlining the HTML report when asked for.
pub fn outcome_json(outcome: &ConsultationOutcome, format: OutputFormat) -> Result<Value> {
    let mut value = serde_json::to_value(outcome)?;
    if format == OutputFormat::Html
        && let Some(obj) = value.as_object_mut()
    {
        obj.insert(
            "html".into(),
            Value::String(render_html(&outcome.context, &outcome.consultation)),
        );
    }
    Ok(value)
}

impl EpicConsultServer {
    /// Handle the epic_consultation tool call
    pub async fn handle_epic_consultation(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let raw: RawBusinessContext = parse_arguments(request.arguments.clone())?;
        let flags: ConsultationFlags = parse_arguments(request.arguments)?;

        let outcome = self
            .with_tool_timeout(
                "epic_consultation",
                consult_with_cache(
                    self.store.as_ref(),
                    &raw,
                    ConsultOptions {
                        refresh: flags.refresh,
                    },
                ),
            )
            .await?;

        tracing::debug!(
            "epic_consultation {} cached={} primary={}",
            outcome.cache_key,
            outcome.cached,
            outcome.consultation.primary_focus
        );

        Ok(CallToolResult::structured(outcome_json(
            &outcome,
            flags.format,
        )?))
    }

    /// Handle the epic_score tool call
    pub async fn handle_epic_score(&self, request: CallToolRequestParam) -> Result<CallToolResult> {
        let raw: RawBusinessContext = parse_arguments(request.arguments)?;
        let summary = score_summary(&raw);
        Ok(CallToolResult::structured(json!(summary)))
    }
}
