//! Flow document types: the serde target for flowchart JSON.

use serde::{Deserialize, Serialize};

// =============================================================================
// TOP-LEVEL DOCUMENT
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDocument {
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FlowEdge {
    /// True when the edge carries a non-blank branch label.
    pub fn has_label(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Process,
    Decision,
    Subprocess,
}

impl NodeKind {
    /// Start and end markers carry no step semantics.
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeKind::Start | NodeKind::End)
    }

    /// Kinds whose labels are checked by the L7 rules.
    pub fn is_labelled_step(self) -> bool {
        matches!(
            self,
            NodeKind::Process | NodeKind::Decision | NodeKind::Subprocess
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Process => "process",
            NodeKind::Decision => "decision",
            NodeKind::Subprocess => "subprocess",
        }
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(NodeKind::Start),
            "end" => Ok(NodeKind::End),
            "process" => Ok(NodeKind::Process),
            "decision" => Ok(NodeKind::Decision),
            "subprocess" => Ok(NodeKind::Subprocess),
            other => Err(format!("unknown node kind '{}'", other)),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    #[serde(alias = "nodeType")]
    pub kind: NodeKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: Position,
    /// Side field that receives a system name moved out of the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_name: Option<String>,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        FlowNode {
            id: id.into(),
            kind,
            label: label.into(),
            position: Position::default(),
            system_name: None,
        }
    }
}
