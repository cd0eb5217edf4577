//! System-name extraction for R-04.

use crate::config::SystemNamePatterns;

/// Outcome of scanning a label for a system name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemNameMatch {
    /// A substring that passed the candidate filter.
    Named(String),
    /// Bracket characters are present but no substring could be captured.
    Unextracted,
    None,
}

pub fn scan(label: &str, patterns: &SystemNamePatterns) -> SystemNameMatch {
    let bracket_capture = patterns
        .bracket
        .captures(label)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty());

    if let Some(candidate) = bracket_capture {
        if is_system_candidate(candidate, patterns) {
            return SystemNameMatch::Named(candidate.to_string());
        }
    }

    if let Some(candidate) = patterns
        .prefix
        .captures(label)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
    {
        if !candidate.is_empty() && is_system_candidate(candidate, patterns) {
            return SystemNameMatch::Named(candidate.to_string());
        }
    }

    // A capture rejected by the filter (e.g. "(PDF)") is not reported.
    if bracket_capture.is_none() && patterns.bracket_marker.is_match(label) {
        return SystemNameMatch::Unextracted;
    }

    SystemNameMatch::None
}

fn is_system_candidate(text: &str, patterns: &SystemNamePatterns) -> bool {
    if patterns.non_system_terms.contains(text) {
        return false;
    }
    if patterns.numeric.is_match(text) {
        return false;
    }
    if text.chars().any(|c| c.is_ascii_uppercase()) {
        return true;
    }
    patterns.keywords.is_match(text)
}
