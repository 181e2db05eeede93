//! Custom deserializers for flexible parameter parsing in epic-consult.
//!
//! Callers reach the engine through HTTP forms, MCP clients and LLM function
//! calls, so numeric fields arrive as numbers, numeric strings or formatted
//! text. These deserializers coerce what they can and drop what they cannot;
//! they never reject a value the engine could default instead.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:\.\d+)?").expect("static regex should compile")
});

static MAGNITUDE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d\s*[kmb]\b").expect("static regex should compile")
});

/// Parse a currency amount that may carry formatting characters.
///
/// Keeps ASCII digits and `.` only, so `"$5,000"` and `"5000/mo"` both parse
/// to `5000.0`. Shorthand like `"5k"` or `"$1.5M"` is not expanded; it
/// returns `None` (unknown budget) rather than a wrong small amount. Returns
/// `None` for empty or unparsable input.
pub fn parse_currency(raw: &str) -> Option<f64> {
    if MAGNITUDE_SUFFIX.is_match(raw) {
        return None;
    }
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Deserializes team_size accepting integers, floats (rounded), numeric strings
/// and free text containing a number (`"10-20 people"` -> 10).
///
/// Negative values clamp to 0; anything without a number becomes `None`.
pub fn de_option_u32_forgiving<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    let value = match v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(|i| i as f64)
            .or_else(|| n.as_f64()),
        serde_json::Value::String(s) => FIRST_NUMBER
            .find(s.trim())
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        _ => None,
    };
    Ok(value
        .filter(|f| f.is_finite())
        .map(|f| f.round().clamp(0.0, u32::MAX as f64) as u32))
}

/// Deserializes monthly_budget from a number or a formatted string.
///
/// # Examples
///
/// ```json
/// { "monthly_budget": 5000 }
/// { "monthly_budget": "$5,000" }
/// { "monthly_budget": "5000/mo" }
/// ```
pub fn de_option_budget<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    Ok(match v {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| f.is_finite() && *f >= 0.0),
        serde_json::Value::String(s) => parse_currency(&s),
        _ => None,
    })
}

/// Deserializes a URL list from a single string, a comma separated string, or an array.
/// Non-string array elements are dropped.
pub fn de_option_urls<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    match v {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        serde_json::Value::Array(arr) => Ok(Some(
            arr.into_iter()
                .filter_map(|el| match el {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        )),
        other => Err(D::Error::custom(format!(
            "invalid type for digital_presence: {}",
            other
        ))),
    }
}
