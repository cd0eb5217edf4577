//! Quality validation: L7 label rules and flow structure rules.
//!
//! Both engines are pure functions of their input and a shared, read-only
//! `RuleConfig`; they can be called concurrently without coordination.

pub mod compound;
pub mod label_rules;
pub mod structural;
pub mod system_name;
pub mod types;

pub use compound::{CompoundDetection, detect_compound};
pub use label_rules::{validate_label, validate_label_named};
pub use structural::analyze_structure;
pub use types::*;

use serde::{Deserialize, Serialize};

use crate::config::RuleConfig;
use crate::parse::types::FlowDocument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelReportItem {
    pub node_id: String,
    pub node_label: String,
    pub status: LabelStatus,
    pub result: ValidationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub checked: usize,
    pub passed: usize,
    pub warned: usize,
    pub rejected: usize,
    /// Mean label score, rounded to one decimal. 100 when nothing was checked.
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub labels: Vec<LabelReportItem>,
    pub structure: Vec<StructIssue>,
    pub summary: ReviewSummary,
}

/// Validate every step label and the chart structure of one document.
pub fn review_document(
    doc: &FlowDocument,
    role_separation_active: bool,
    config: &RuleConfig,
) -> FlowReport {
    let labels: Vec<LabelReportItem> = doc
        .nodes
        .iter()
        .filter(|n| n.kind.is_labelled_step())
        .map(|n| {
            let result = validate_label(&n.label, n.kind, role_separation_active, config);
            LabelReportItem {
                node_id: n.id.clone(),
                node_label: n.label.clone(),
                status: result.status(),
                result,
            }
        })
        .collect();

    let structure = analyze_structure(&doc.nodes, &doc.edges, config);
    let summary = summarize(&labels);

    tracing::debug!(
        checked = summary.checked,
        rejected = summary.rejected,
        structure_issues = structure.len(),
        "reviewed flow document"
    );

    FlowReport {
        labels,
        structure,
        summary,
    }
}

fn summarize(labels: &[LabelReportItem]) -> ReviewSummary {
    let count = |status: LabelStatus| labels.iter().filter(|l| l.status == status).count();
    let average_score = if labels.is_empty() {
        100.0
    } else {
        let total: u32 = labels.iter().map(|l| l.result.score).sum();
        (f64::from(total) / labels.len() as f64 * 10.0).round() / 10.0
    };
    ReviewSummary {
        checked: labels.len(),
        passed: count(LabelStatus::Pass),
        warned: count(LabelStatus::Warning),
        rejected: count(LabelStatus::Reject),
        average_score,
    }
}
