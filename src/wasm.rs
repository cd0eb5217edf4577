//! WASM entry points for browser use.
//!
//! All entry points run against the embedded rule set.

use wasm_bindgen::prelude::*;

use crate::config::RuleConfig;
use crate::error::EngineError;
use crate::validate;

/// Validate one label. Returns a `ValidationResult` object; a `kind` the
/// engine does not know yields a clean result with no checks applied.
#[wasm_bindgen]
pub fn validate_label(label: &str, kind: &str, role_separation_active: bool) -> JsValue {
    to_js(&validate::validate_label_named(
        label,
        kind,
        role_separation_active,
        RuleConfig::builtin(),
    ))
}

/// Split a compound label. Returns a `CompoundDetection` object.
#[wasm_bindgen]
pub fn detect_compound(label: &str) -> JsValue {
    to_js(&validate::detect_compound(label, RuleConfig::builtin()))
}

/// Run the structural rules on a flow JSON document.
/// Returns a JSON array of `StructIssue` objects, or an `errors` object when
/// the document does not parse.
#[wasm_bindgen]
pub fn analyze_flow(json: &str) -> JsValue {
    match crate::parse::parse(json) {
        Ok(doc) => to_js(&validate::analyze_structure(
            &doc.nodes,
            &doc.edges,
            RuleConfig::builtin(),
        )),
        Err(errors) => to_js(&ReviewResult::Errors {
            errors: errors.into_iter().map(ErrorDto::from).collect(),
        }),
    }
}

/// Label and structure review of a whole flow JSON document.
/// Returns a JSON object with either `report` (success) or `errors`.
#[wasm_bindgen]
pub fn review_flow(json: &str, role_separation_active: bool) -> JsValue {
    to_js(&review_flow_inner(json, role_separation_active))
}

fn review_flow_inner(json: &str, role_separation_active: bool) -> ReviewResult {
    match crate::parse::parse(json) {
        Ok(doc) => ReviewResult::Report {
            report: validate::review_document(&doc, role_separation_active, RuleConfig::builtin()),
        },
        Err(errors) => ReviewResult::Errors {
            errors: errors.into_iter().map(ErrorDto::from).collect(),
        },
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    element_id: Option<String>,
}

impl From<EngineError> for ErrorDto {
    fn from(e: EngineError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            element_id: e.element_id,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum ReviewResult {
    #[serde(rename = "report")]
    Report { report: validate::FlowReport },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
