//! Error types: fatal rule-set load errors and flow document errors.

use thiserror::Error;

/// Raised while loading a rule set. Every variant is fatal for the process:
/// the engines are never run against a partially valid rule set.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rule set is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("rule set category '{0}' must not be empty")]
    MissingCategory(&'static str),

    #[error("invalid pattern in '{category}' (#{index}) `{pattern}`: {source}")]
    InvalidPattern {
        category: &'static str,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "pattern in '{category}' (#{index}) `{pattern}` needs {expected} capture group(s), found {found}"
    )]
    PatternGroups {
        category: &'static str,
        index: usize,
        pattern: String,
        expected: usize,
        found: usize,
    },

    #[error("length bounds are inverted: min {min} > max {max}")]
    LengthBounds { min: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Graph,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Graph => write!(f, "Graph"),
        }
    }
}

/// Problem with a flow document itself (as opposed to a quality finding).
#[derive(Debug, Clone)]
pub struct EngineError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub element_id: Option<String>,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.element_id {
            Some(id) => write!(
                f,
                "[{}:{}] {} (element '{}')",
                self.phase, self.code, self.message, id
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        EngineError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            element_id: None,
        }
    }

    pub fn graph(code: &str, message: impl Into<String>, element_id: Option<String>) -> Self {
        EngineError {
            code: code.into(),
            phase: Phase::Graph,
            message: message.into(),
            element_id,
        }
    }
}
