//! Compound-action detection.
//!
//! A label such as "지원서를 접수하고, 적격여부를 판정한다" narrates two steps.
//! The detector finds the first configured pattern that splits it into two
//! clauses and rewrites each clause into a complete sentence, so the parts can
//! be used directly as the labels of two replacement nodes.

use serde::{Deserialize, Serialize};

use crate::config::{CompoundPatterns, RuleConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundDetection {
    pub is_compound: bool,
    /// Two normalized clauses when compound, otherwise the label itself.
    pub parts: Vec<String>,
    /// Name of the pattern that matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Connective phrase that joins the parts back into one sentence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connective: Option<String>,
}

impl CompoundDetection {
    fn single(label: &str) -> Self {
        CompoundDetection {
            is_compound: false,
            parts: vec![label.to_string()],
            pattern: None,
            connective: None,
        }
    }
}

pub fn detect_compound(label: &str, config: &RuleConfig) -> CompoundDetection {
    let rules = &config.compound;
    if label.trim().is_empty() {
        return CompoundDetection::single(label);
    }

    // An expressed intent ("~하고 싶다") is one wish, not two steps.
    if rules.intent_exclude.iter().any(|re| re.is_match(label)) {
        return CompoundDetection::single(label);
    }

    for pattern in &rules.patterns {
        let Some(caps) = pattern.regex.captures(label) else {
            continue;
        };
        let (Some(first), Some(second)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if first.as_str().trim().is_empty() || second.as_str().trim().is_empty() {
            continue;
        }
        return CompoundDetection {
            is_compound: true,
            parts: vec![
                normalize_clause(first.as_str(), rules),
                normalize_clause(second.as_str(), rules),
            ],
            pattern: Some(pattern.name.clone()),
            connective: Some(pattern.connective.clone()),
        };
    }

    CompoundDetection::single(label)
}

/// Give a captured clause the closing form of a complete sentence.
fn normalize_clause(clause: &str, rules: &CompoundPatterns) -> String {
    let clause = clause.trim().trim_end_matches([',', '，']).trim_end();
    if clause.ends_with(rules.closing_affix.as_str()) {
        return clause.to_string();
    }
    for ending in &rules.clause_endings {
        if let Some(stem) = clause.strip_suffix(ending.from.as_str()) {
            return format!("{}{}", stem, ending.to);
        }
    }
    format!("{}{}", clause, rules.closing_affix)
}
