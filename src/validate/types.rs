//! Result types shared by the label and structure engines.
//!
//! Rule ids (`R-01`…`R-15`, `S-01`…`S-12`) are a stable vocabulary keyed on
//! by callers; renaming one is a breaking change.

use serde::{Deserialize, Serialize};

/// Ordered so that `Reject > Warning > Suggestion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Suggestion,
    Warning,
    Reject,
}

impl Severity {
    /// Score deduction for one issue of this severity.
    pub fn penalty(self) -> u32 {
        match self {
            Severity::Reject => 30,
            Severity::Warning => 10,
            Severity::Suggestion => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub rule_id: String,
    pub severity: Severity,
    pub human_tag: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl Issue {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        human_tag: &str,
        message: impl Into<String>,
    ) -> Self {
        Issue {
            rule_id: rule_id.into(),
            severity,
            human_tag: human_tag.into(),
            message: message.into(),
            suggestion_text: None,
            reasoning: None,
        }
    }

    pub fn with_suggestion(mut self, text: impl Into<String>) -> Self {
        self.suggestion_text = Some(text.into());
        self
    }

    pub fn with_reasoning(mut self, text: impl Into<String>) -> Self {
        self.reasoning = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub pass: bool,
    pub score: u32,
    pub issues: Vec<Issue>,
    /// Filled in by an external rewrite service; never set by this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_system_name: Option<String>,
    pub encouragement_text: String,
}

impl ValidationResult {
    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.issues.iter().any(|i| i.rule_id == rule_id)
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.rule_id.as_str()).collect()
    }

    pub fn status(&self) -> LabelStatus {
        if !self.pass {
            LabelStatus::Reject
        } else if self.issues.iter().any(|i| i.severity == Severity::Warning) {
            LabelStatus::Warning
        } else {
            LabelStatus::Pass
        }
    }
}

/// Badge state a caller shows on a node after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStatus {
    Pass,
    Warning,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructIssue {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_ids: Vec<String>,
}

impl StructIssue {
    /// Structural findings are always warnings.
    pub fn warning(rule_id: &str, message: impl Into<String>) -> Self {
        StructIssue {
            rule_id: rule_id.into(),
            severity: Severity::Warning,
            message: message.into(),
            node_ids: Vec::new(),
            edge_ids: Vec::new(),
        }
    }

    pub fn with_nodes(mut self, node_ids: Vec<String>) -> Self {
        self.node_ids = node_ids;
        self
    }

    pub fn with_edges(mut self, edge_ids: Vec<String>) -> Self {
        self.edge_ids = edge_ids;
        self
    }
}
