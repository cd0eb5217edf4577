//! L7 label rules (R-01…R-15).
//!
//! Checks run in a fixed order and each appends at most one issue. R-03b is
//! only evaluated when R-03a did not fire, and never on decision nodes, which
//! also skip R-05 and R-07. Labels shorter than the minimum length get R-01
//! and, on decision nodes, R-08; the wording rules need a label long enough
//! to carry a verb.

use crate::config::RuleConfig;
use crate::parse::types::NodeKind;
use crate::validate::compound::detect_compound;
use crate::validate::system_name::{self, SystemNameMatch};
use crate::validate::types::{Issue, Severity, ValidationResult};

const PRAISE: &str = "좋은 라벨입니다. 현재 기준을 잘 지키고 있어요.";
const NUDGE: &str = "좋은 방향입니다. 제안을 반영하면 더 명확해질 수 있어요.";
const CORRECTIVE: &str = "수정이 필요한 항목이 있어요. 제안을 참고해주세요.";

/// Validate one step label.
///
/// `role_separation_active` is set when the chart already groups steps by
/// actor (swim lanes); R-06 is not evaluated at all in that case.
pub fn validate_label(
    label: &str,
    kind: NodeKind,
    role_separation_active: bool,
    config: &RuleConfig,
) -> ValidationResult {
    let text = label.trim();
    let mut issues = Vec::new();
    let mut detected_system_name = None;

    if kind.is_labelled_step() {
        let len = text.chars().count();
        let long_enough = len >= config.min_length;

        r01_too_short(len, config, &mut issues);
        r02_too_long(len, config, &mut issues);

        if long_enough {
            // Decision labels state a criterion, not an action.
            let verb_rules = kind != NodeKind::Decision;
            let banned = r03a_banned_verb(text, config, &mut issues);
            if verb_rules && !banned {
                r03b_refinable_verb(text, config, &mut issues);
            }
            detected_system_name = r04_system_name(text, config, &mut issues);
            if verb_rules {
                r05_compound_action(text, config, &mut issues);
            }
            if !role_separation_active {
                r06_missing_subject(text, config, &mut issues);
            }
            if verb_rules {
                r07_missing_object(text, config, &mut issues);
            }
        }

        r08_decision_criteria(text, kind, config, &mut issues);

        if long_enough {
            r15_closing_form(text, kind, config, &mut issues);
        }
    }

    finish(issues, detected_system_name)
}

/// Same as [`validate_label`] for a node kind given by name. A kind outside
/// the rule set gets no checks, like a terminal node.
pub fn validate_label_named(
    label: &str,
    kind: &str,
    role_separation_active: bool,
    config: &RuleConfig,
) -> ValidationResult {
    match kind.parse::<NodeKind>() {
        Ok(kind) => validate_label(label, kind, role_separation_active, config),
        Err(message) => {
            tracing::debug!(%message, "label not checked");
            finish(Vec::new(), None)
        }
    }
}

fn finish(issues: Vec<Issue>, detected_system_name: Option<String>) -> ValidationResult {
    let penalty: u32 = issues.iter().map(|i| i.severity.penalty()).sum();
    let score = 100u32.saturating_sub(penalty);
    let pass = !issues.iter().any(|i| i.severity == Severity::Reject);

    let encouragement = if issues.is_empty() {
        PRAISE
    } else if pass {
        NUDGE
    } else {
        CORRECTIVE
    };

    ValidationResult {
        pass,
        score,
        issues,
        rewrite_suggestion: None,
        detected_system_name,
        encouragement_text: encouragement.to_string(),
    }
}

fn has_decision_hint(text: &str, config: &RuleConfig) -> bool {
    config.decision_hints.iter().any(|h| text.contains(h.as_str()))
}

fn r01_too_short(len: usize, config: &RuleConfig, issues: &mut Vec<Issue>) {
    if len < config.min_length {
        issues.push(
            Issue::new(
                "R-01",
                Severity::Warning,
                "길이 부족",
                "라벨이 너무 짧아 의미 전달이 어려울 수 있어요",
            )
            .with_suggestion("동작과 대상이 드러나도록 조금 더 구체화해보세요."),
        );
    }
}

fn r02_too_long(len: usize, config: &RuleConfig, issues: &mut Vec<Issue>) {
    if len > config.max_length {
        issues.push(
            Issue::new(
                "R-02",
                Severity::Warning,
                "길이 초과",
                "라벨이 길어지면 핵심 동작이 흐려질 수 있어요",
            )
            .with_suggestion("핵심 동작 1개 중심으로 간결하게 줄여보세요."),
        );
    }
}

fn r03a_banned_verb(text: &str, config: &RuleConfig, issues: &mut Vec<Issue>) -> bool {
    let Some(verb) = config.banned_verbs.iter().find(|v| text.contains(v.as_str())) else {
        return false;
    };
    issues.push(
        Issue::new(
            "R-03a",
            Severity::Reject,
            "금지 동사",
            format!("'{}'는 L7 라벨로 사용할 수 없어요", verb),
        )
        .with_suggestion("조회한다, 입력한다, 저장한다, 승인한다 같은 구체 동사로 바꿔주세요.")
        .with_reasoning(
            "이 동사는 어떤 맥락에서도 구체적 행위를 나타내지 않아 제3자가 수행할 수 없습니다.",
        ),
    );
    true
}

fn r03b_refinable_verb(text: &str, config: &RuleConfig, issues: &mut Vec<Issue>) {
    let Some(refinable) = config
        .refinable_verbs
        .iter()
        .find(|r| text.contains(r.verb.as_str()))
    else {
        return;
    };
    issues.push(
        Issue::new(
            "R-03b",
            Severity::Warning,
            "구체화 권장",
            format!(
                "'{}' 대신 구체 동사({})를 쓰면 더 명확해질 수 있어요",
                refinable.verb, refinable.alternatives
            ),
        )
        .with_suggestion(format!("대안: {}", refinable.alternatives))
        .with_reasoning("구체적 동사는 제3자가 정확히 이해할 수 있도록 도와줍니다."),
    );
}

fn r04_system_name(text: &str, config: &RuleConfig, issues: &mut Vec<Issue>) -> Option<String> {
    match system_name::scan(text, &config.system_name) {
        SystemNameMatch::Named(name) => {
            issues.push(
                Issue::new(
                    "R-04",
                    Severity::Warning,
                    "시스템명 분리",
                    format!(
                        "시스템명 '{}'이 감지되었습니다. 메타데이터로 분리하면 라벨이 깔끔해져요",
                        name
                    ),
                )
                .with_suggestion(format!(
                    "라벨은 동작만 남기고 '{}'은 시스템명 필드에 입력해보세요.",
                    name
                ))
                .with_reasoning("라벨과 시스템명을 분리하면 프로세스 로직이 명확해집니다."),
            );
            Some(name)
        }
        SystemNameMatch::Unextracted => {
            issues.push(
                Issue::new(
                    "R-04",
                    Severity::Warning,
                    "시스템명 분리",
                    "괄호 표기가 감지되었습니다. 시스템명이라면 메타데이터로 분리해보세요",
                )
                .with_suggestion("괄호 안의 내용은 시스템명 필드나 메모로 옮겨보세요."),
            );
            None
        }
        SystemNameMatch::None => None,
    }
}

fn r05_compound_action(text: &str, config: &RuleConfig, issues: &mut Vec<Issue>) {
    let compound = detect_compound(text, config);
    if !compound.is_compound {
        return;
    }
    let (first, second) = (&compound.parts[0], &compound.parts[1]);
    issues.push(
        Issue::new(
            "R-05",
            Severity::Reject,
            "복수 동작",
            format!(
                "한 라벨에 동작이 2개 이상 포함되어 있어요: \"{}\" / \"{}\"",
                first, second
            ),
        )
        .with_suggestion(format!(
            "각 동작을 별도 단계로 분리해보세요: \"{}\" / \"{}\"",
            first, second
        ))
        .with_reasoning("하나의 화면 내 연속 동작 = 1개 L7 원칙에 따라 분리가 필요합니다."),
    );
}

fn r06_missing_subject(text: &str, config: &RuleConfig, issues: &mut Vec<Issue>) {
    if config.object_particle.is_match(text) && !config.subject_particle.is_match(text) {
        issues.push(
            Issue::new(
                "R-06",
                Severity::Suggestion,
                "주체 명시",
                "누가 수행하는 단계인지 드러나지 않아요",
            )
            .with_suggestion("\"담당자가 급여를 조회한다\"처럼 수행 주체를 앞에 적어보세요."),
        );
    }
}

fn r07_missing_object(text: &str, config: &RuleConfig, issues: &mut Vec<Issue>) {
    let Some(verb) = config
        .transitive_verbs
        .iter()
        .find(|v| text.contains(v.as_str()))
    else {
        return;
    };
    if config.object_particle.is_match(text) {
        return;
    }
    issues.push(
        Issue::new(
            "R-07",
            Severity::Warning,
            "목적어 누락",
            format!("'{}'는 타동사인데 목적어(을/를)가 없어요", verb),
        )
        .with_suggestion(format!("예: \"급여를 {}\" 형태로 대상을 명시해보세요.", verb))
        .with_reasoning("목적어가 있으면 제3자가 무엇에 대한 동작인지 바로 알 수 있습니다."),
    );
}

fn r08_decision_criteria(text: &str, kind: NodeKind, config: &RuleConfig, issues: &mut Vec<Issue>) {
    if kind != NodeKind::Decision || has_decision_hint(text, config) {
        return;
    }
    issues.push(
        Issue::new(
            "R-08",
            Severity::Warning,
            "기준값 누락",
            "분기 기준이 드러나지 않아 판단 조건이 모호할 수 있어요",
        )
        .with_suggestion(
            "'~여부', '~인가?', '~가 있는가?', '~되어 있는가?', 'D-N 이전인가?' 중 하나의 형식을 사용해보세요.",
        ),
    );
}

fn r15_closing_form(text: &str, kind: NodeKind, config: &RuleConfig, issues: &mut Vec<Issue>) {
    let conforms = match kind {
        NodeKind::Process | NodeKind::Subprocess => config.process_closing.is_match(text),
        NodeKind::Decision => {
            config.decision_closing.is_match(text) || has_decision_hint(text, config)
        }
        NodeKind::Start | NodeKind::End => true,
    };
    if conforms {
        return;
    }
    let (message, suggestion) = match kind {
        NodeKind::Decision => (
            "판단 노드는 '~여부' 또는 '~인가?' 형식으로 끝나야 해요",
            "예: \"승인 여부\", \"금액이 한도를 초과하는가?\"",
        ),
        _ => (
            "단계 라벨은 '~한다' 형식의 서술형으로 끝나야 해요",
            "예: \"급여를 조회한다\"",
        ),
    };
    issues.push(Issue::new("R-15", Severity::Warning, "표준 형식", message).with_suggestion(suggestion));
}
