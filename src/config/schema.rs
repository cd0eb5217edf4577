//! Serde shape of `rules/l7_rules.yaml`.
//!
//! These types hold the rule document exactly as written. Nothing here is
//! compiled; `RuleConfig::from_rule_set` turns a `RuleSet` into the form the
//! engines run against.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub version: u32,
    pub length: LengthBounds,
    #[serde(default)]
    pub banned_verbs: Vec<String>,
    #[serde(default)]
    pub refinable_verbs: Vec<RefinableVerb>,
    #[serde(default)]
    pub transitive_verbs: Vec<String>,
    pub particles: Particles,
    pub system_name: SystemNameRules,
    pub compound: CompoundRules,
    #[serde(default)]
    pub decision_hints: Vec<String>,
    pub closing_form: ClosingForm,
    pub structure: StructureRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinableVerb {
    pub verb: String,
    pub alternatives: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particles {
    pub object: String,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemNameRules {
    pub bracket: String,
    pub prefix: String,
    pub bracket_marker: String,
    #[serde(default)]
    pub non_system_terms: Vec<String>,
    pub numeric: String,
    pub keywords: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundRules {
    pub closing_affix: String,
    #[serde(default)]
    pub clause_endings: Vec<ClauseEnding>,
    #[serde(default)]
    pub patterns: Vec<CompoundPatternDef>,
    #[serde(default)]
    pub intent_exclude: Vec<String>,
}

/// Rewrites a connective clause ending (`하고`) into a sentence ending (`한다`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseEnding {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundPatternDef {
    pub name: String,
    pub connective: String,
    pub regex: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingForm {
    pub process: String,
    pub decision: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureRules {
    #[serde(default)]
    pub placeholder_labels: Vec<String>,
    pub max_flow_nodes: usize,
    pub max_decision_branches: usize,
}
