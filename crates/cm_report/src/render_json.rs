//! render_json.rs — report model → JSON value.
//!
//! Section order in the value follows `ReportModel` field order. Callers that
//! persist the report write it through the canonical writer (sorted keys).

use serde_json::Value;

use crate::model::ReportModel;

pub fn render_report_json(m: &ReportModel) -> Result<Value, serde_json::Error> {
    serde_json::to_value(m)
}

/// Human-readable form for stdout.
pub fn render_report_json_pretty(m: &ReportModel) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(m)
}
