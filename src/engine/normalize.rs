//! Context normalization: defaults for every optional field plus the
//! lowercased search text the scorer runs keyword matching against.

use super::scoring::BusinessStage;
use super::types::{BusinessContext, RawBusinessContext};

pub const DEFAULT_COMPANY_NAME: &str = "Your Company";
pub const DEFAULT_INDUSTRY: &str = "General";
pub const DEFAULT_STAGE_LABEL: &str = "mid-market";

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Fill defaults and derive the search text. Never fails.
pub fn normalize(raw: &RawBusinessContext) -> BusinessContext {
    let company_name = non_blank(raw.company_name.as_deref())
        .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string());
    let industry =
        non_blank(raw.industry.as_deref()).unwrap_or_else(|| DEFAULT_INDUSTRY.to_string());
    let business_stage = non_blank(raw.business_stage.as_deref())
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| DEFAULT_STAGE_LABEL.to_string());
    let challenge_text = non_blank(raw.challenge_text.as_deref()).unwrap_or_default();
    let company_description = non_blank(raw.company_description.as_deref()).unwrap_or_default();

    let search_text = format!("{challenge_text} {company_description} {industry}").to_lowercase();

    let mut digital_presence: Vec<String> = Vec::new();
    let urls = raw
        .website
        .iter()
        .chain(raw.digital_presence.iter().flatten());
    for url in urls {
        let url = url.trim();
        if !url.is_empty() && !digital_presence.iter().any(|u| u == url) {
            digital_presence.push(url.to_string());
        }
    }

    BusinessContext {
        stage: BusinessStage::from_label(&business_stage),
        company_name,
        industry,
        business_stage,
        challenge_text,
        company_description,
        team_size: raw.team_size,
        monthly_budget: raw.monthly_budget.filter(|b| b.is_finite() && *b >= 0.0),
        digital_presence,
        search_text,
    }
}
