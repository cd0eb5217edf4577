//! Rule set loading.
//!
//! The rule parameters live in one YAML document (`rules/l7_rules.yaml`).
//! It is embedded at build time and compiled once into an immutable
//! `RuleConfig`; callers may load a replacement document at startup with
//! `RuleConfig::from_yaml_str`. Every pattern is compiled during loading, so a
//! bad pattern surfaces as a `ConfigError` naming the category and index and
//! never as a fault during a validation call.

pub mod schema;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
pub use schema::{ClauseEnding, RefinableVerb, RuleSet, StructureRules};

/// The rule document shipped with the crate.
pub const BUILTIN_RULES: &str = include_str!("../../rules/l7_rules.yaml");

static BUILTIN: Lazy<RuleConfig> = Lazy::new(|| {
    RuleConfig::from_yaml_str(BUILTIN_RULES).expect("embedded rules/l7_rules.yaml must load")
});

/// Compiled, read-only rule set shared by the label and structure engines.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub version: u32,
    pub min_length: usize,
    pub max_length: usize,
    pub banned_verbs: Vec<String>,
    pub refinable_verbs: Vec<RefinableVerb>,
    pub transitive_verbs: Vec<String>,
    pub object_particle: Regex,
    pub subject_particle: Regex,
    pub system_name: SystemNamePatterns,
    pub compound: CompoundPatterns,
    pub decision_hints: Vec<String>,
    pub process_closing: Regex,
    pub decision_closing: Regex,
    pub structure: StructureRules,
}

#[derive(Debug, Clone)]
pub struct SystemNamePatterns {
    /// One capture group: the text inside the brackets.
    pub bracket: Regex,
    /// One capture group: the text before `에서`.
    pub prefix: Regex,
    pub bracket_marker: Regex,
    pub non_system_terms: HashSet<String>,
    pub numeric: Regex,
    pub keywords: Regex,
}

#[derive(Debug, Clone)]
pub struct CompoundPatterns {
    pub closing_affix: String,
    pub clause_endings: Vec<ClauseEnding>,
    /// Evaluated in order; the first match wins.
    pub patterns: Vec<CompoundPattern>,
    pub intent_exclude: Vec<Regex>,
}

#[derive(Debug, Clone)]
pub struct CompoundPattern {
    pub name: String,
    pub connective: String,
    pub regex: Regex,
}

impl RuleConfig {
    /// The embedded rule set, compiled on first use.
    pub fn builtin() -> &'static RuleConfig {
        &BUILTIN
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let rules: RuleSet = serde_yaml::from_str(yaml)?;
        Self::from_rule_set(rules)
    }

    pub fn from_rule_set(rules: RuleSet) -> Result<Self, ConfigError> {
        require_non_empty("banned_verbs", &rules.banned_verbs)?;
        require_non_empty("refinable_verbs", &rules.refinable_verbs)?;
        require_non_empty("transitive_verbs", &rules.transitive_verbs)?;
        require_non_empty("decision_hints", &rules.decision_hints)?;
        require_non_empty("compound.patterns", &rules.compound.patterns)?;
        require_non_empty("compound.intent_exclude", &rules.compound.intent_exclude)?;
        if rules.compound.closing_affix.is_empty() {
            return Err(ConfigError::MissingCategory("compound.closing_affix"));
        }
        if rules.length.min > rules.length.max {
            return Err(ConfigError::LengthBounds {
                min: rules.length.min,
                max: rules.length.max,
            });
        }

        let sys = &rules.system_name;
        let system_name = SystemNamePatterns {
            bracket: compile_with_groups("system_name.bracket", 0, &sys.bracket, 1)?,
            prefix: compile_with_groups("system_name.prefix", 0, &sys.prefix, 1)?,
            bracket_marker: compile("system_name.bracket_marker", 0, &sys.bracket_marker)?,
            non_system_terms: sys.non_system_terms.iter().cloned().collect(),
            numeric: compile("system_name.numeric", 0, &sys.numeric)?,
            keywords: compile("system_name.keywords", 0, &sys.keywords)?,
        };

        let patterns = rules
            .compound
            .patterns
            .iter()
            .enumerate()
            .map(|(i, def)| {
                Ok(CompoundPattern {
                    name: def.name.clone(),
                    connective: def.connective.clone(),
                    regex: compile_with_groups("compound.patterns", i, &def.regex, 2)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let intent_exclude = rules
            .compound
            .intent_exclude
            .iter()
            .enumerate()
            .map(|(i, p)| compile("compound.intent_exclude", i, p))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let config = RuleConfig {
            version: rules.version,
            min_length: rules.length.min,
            max_length: rules.length.max,
            object_particle: compile("particles.object", 0, &rules.particles.object)?,
            subject_particle: compile("particles.subject", 0, &rules.particles.subject)?,
            system_name,
            compound: CompoundPatterns {
                closing_affix: rules.compound.closing_affix,
                clause_endings: rules.compound.clause_endings,
                patterns,
                intent_exclude,
            },
            process_closing: compile("closing_form.process", 0, &rules.closing_form.process)?,
            decision_closing: compile("closing_form.decision", 0, &rules.closing_form.decision)?,
            banned_verbs: rules.banned_verbs,
            refinable_verbs: rules.refinable_verbs,
            transitive_verbs: rules.transitive_verbs,
            decision_hints: rules.decision_hints,
            structure: rules.structure,
        };

        tracing::debug!(
            version = config.version,
            banned = config.banned_verbs.len(),
            refinable = config.refinable_verbs.len(),
            transitive = config.transitive_verbs.len(),
            compound = config.compound.patterns.len(),
            hints = config.decision_hints.len(),
            "loaded rule set"
        );

        Ok(config)
    }

    /// Alternatives configured for a refinable verb.
    pub fn alternatives_for(&self, verb: &str) -> Option<&str> {
        self.refinable_verbs
            .iter()
            .find(|r| r.verb == verb)
            .map(|r| r.alternatives.as_str())
    }
}

fn require_non_empty<T>(category: &'static str, items: &[T]) -> Result<(), ConfigError> {
    if items.is_empty() {
        return Err(ConfigError::MissingCategory(category));
    }
    Ok(())
}

fn compile(category: &'static str, index: usize, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        category,
        index,
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_with_groups(
    category: &'static str,
    index: usize,
    pattern: &str,
    expected: usize,
) -> Result<Regex, ConfigError> {
    let regex = compile(category, index, pattern)?;
    // captures_len counts the implicit whole-match group.
    let found = regex.captures_len() - 1;
    if found != expected {
        return Err(ConfigError::PatternGroups {
            category,
            index,
            pattern: pattern.to_string(),
            expected,
            found,
        });
    }
    Ok(regex)
}
