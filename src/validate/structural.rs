//! Flow-level structural rules (S-01…S-12).
//!
//! Every finding is a warning; a chart is never rejected for its shape.
//! Disconnected and cyclic charts are the input these rules exist for.

use std::collections::{HashMap, HashSet};

use crate::config::RuleConfig;
use crate::parse::graph::FlowGraph;
use crate::parse::types::{FlowEdge, FlowNode, NodeKind};
use crate::validate::types::StructIssue;

/// Outgoing edges keyed by source id, in document order. Built from the raw
/// edge list so an edge to a missing node still counts as a way out.
type Outgoing<'a> = HashMap<&'a str, Vec<&'a FlowEdge>>;

/// Run all structural rules. Issues come out in rule order.
pub fn analyze_structure(
    nodes: &[FlowNode],
    edges: &[FlowEdge],
    config: &RuleConfig,
) -> Vec<StructIssue> {
    let mut outgoing: Outgoing = HashMap::new();
    for edge in edges {
        outgoing.entry(edge.source.as_str()).or_default().push(edge);
    }
    let flow_nodes: Vec<&FlowNode> = nodes.iter().filter(|n| !n.kind.is_terminal()).collect();
    let connected: HashSet<&str> = edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();

    let mut issues = Vec::new();

    s01_missing_end(nodes, &mut issues);
    s02_placeholder_labels(&flow_nodes, config, &mut issues);
    s03_orphans(&flow_nodes, &connected, &mut issues);
    s04_dead_ends(&flow_nodes, &connected, &outgoing, &mut issues);
    s05_implicit_branching(nodes, &outgoing, &mut issues);
    s06_duplicate_edges(edges, &mut issues);
    s07_trivial_decisions(nodes, &outgoing, &mut issues);
    s08_unlabeled_branches(nodes, &outgoing, &mut issues);
    s09_multiple_starts(nodes, &mut issues);
    s10_decision_fan_out(nodes, &outgoing, config, &mut issues);
    s11_too_many_nodes(&flow_nodes, config, &mut issues);
    s12_escapeless_cycles(nodes, edges, &outgoing, &mut issues);

    issues
}

fn ids(nodes: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    nodes.into_iter().map(|s| s.as_ref().to_string()).collect()
}

fn out_count(outgoing: &Outgoing, id: &str) -> usize {
    outgoing.get(id).map_or(0, Vec::len)
}

fn decisions(nodes: &[FlowNode]) -> impl Iterator<Item = &FlowNode> {
    nodes.iter().filter(|n| n.kind == NodeKind::Decision)
}

fn s01_missing_end(nodes: &[FlowNode], issues: &mut Vec<StructIssue>) {
    if !nodes.iter().any(|n| n.kind == NodeKind::End) {
        issues.push(StructIssue::warning(
            "S-01",
            "종료 노드가 없으면 프로세스 범위가 불명확할 수 있어요.",
        ));
    }
}

fn s02_placeholder_labels(
    flow_nodes: &[&FlowNode],
    config: &RuleConfig,
    issues: &mut Vec<StructIssue>,
) {
    let placeholders = &config.structure.placeholder_labels;
    let found: Vec<&str> = flow_nodes
        .iter()
        .filter(|n| {
            let label = n.label.trim();
            label.is_empty() || placeholders.iter().any(|p| p == label)
        })
        .map(|n| n.id.as_str())
        .collect();
    if !found.is_empty() {
        issues.push(
            StructIssue::warning(
                "S-02",
                format!(
                    "기본 라벨이 그대로인 단계가 {}개 있어요. 구체적인 라벨로 바꿔주세요.",
                    found.len()
                ),
            )
            .with_nodes(ids(found)),
        );
    }
}

fn s03_orphans(flow_nodes: &[&FlowNode], connected: &HashSet<&str>, issues: &mut Vec<StructIssue>) {
    let orphans: Vec<&str> = flow_nodes
        .iter()
        .filter(|n| !connected.contains(n.id.as_str()))
        .map(|n| n.id.as_str())
        .collect();
    if !orphans.is_empty() {
        issues.push(
            StructIssue::warning(
                "S-03",
                format!("연결되지 않은 단계 {}개가 있습니다.", orphans.len()),
            )
            .with_nodes(ids(orphans)),
        );
    }
}

fn s04_dead_ends(
    flow_nodes: &[&FlowNode],
    connected: &HashSet<&str>,
    outgoing: &Outgoing,
    issues: &mut Vec<StructIssue>,
) {
    // Orphans are S-03's concern.
    let dead_ends: Vec<&str> = flow_nodes
        .iter()
        .filter(|n| n.kind.is_labelled_step())
        .filter(|n| connected.contains(n.id.as_str()))
        .filter(|n| out_count(outgoing, &n.id) == 0)
        .map(|n| n.id.as_str())
        .collect();
    if !dead_ends.is_empty() {
        issues.push(
            StructIssue::warning(
                "S-04",
                format!(
                    "나가는 연결이 없는 단계 {}개가 있어요. 흐름이 끊길 수 있습니다.",
                    dead_ends.len()
                ),
            )
            .with_nodes(ids(dead_ends)),
        );
    }
}

fn s05_implicit_branching(nodes: &[FlowNode], outgoing: &Outgoing, issues: &mut Vec<StructIssue>) {
    let branching: Vec<&str> = nodes
        .iter()
        .filter(|n| matches!(n.kind, NodeKind::Process | NodeKind::Subprocess))
        .filter(|n| out_count(outgoing, &n.id) > 1)
        .map(|n| n.id.as_str())
        .collect();
    if !branching.is_empty() {
        issues.push(
            StructIssue::warning(
                "S-05",
                format!(
                    "프로세스 노드에서 2개 이상 분기하는 곳이 {}개 있어요. 판단 노드로 분기 조건을 명시하면 더 명확해집니다.",
                    branching.len()
                ),
            )
            .with_nodes(ids(branching)),
        );
    }
}

fn s06_duplicate_edges(edges: &[FlowEdge], issues: &mut Vec<StructIssue>) {
    // Groups keep the order in which each (source, target) pair first appears.
    let mut groups: Vec<(&str, Vec<&FlowEdge>)> = Vec::new();
    let mut group_of: HashMap<(&str, &str), usize> = HashMap::new();
    for edge in edges {
        let key = (edge.source.as_str(), edge.target.as_str());
        let slot = *group_of.entry(key).or_insert_with(|| {
            groups.push((edge.source.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(edge);
    }

    let mut duplicate_ids = Vec::new();
    let mut source_ids: Vec<&str> = Vec::new();
    for (source, group) in &groups {
        if group.len() < 2 {
            continue;
        }
        duplicate_ids.extend(group[1..].iter().map(|e| e.id.clone()));
        if !source_ids.contains(source) {
            source_ids.push(*source);
        }
    }

    if !duplicate_ids.is_empty() {
        issues.push(
            StructIssue::warning(
                "S-06",
                format!("동일한 방향의 중복 연결이 {}개 있어요.", duplicate_ids.len()),
            )
            .with_edges(duplicate_ids)
            .with_nodes(ids(source_ids)),
        );
    }
}

fn s07_trivial_decisions(nodes: &[FlowNode], outgoing: &Outgoing, issues: &mut Vec<StructIssue>) {
    let trivial: Vec<&str> = decisions(nodes)
        .filter(|n| out_count(outgoing, &n.id) == 1)
        .map(|n| n.id.as_str())
        .collect();
    if !trivial.is_empty() {
        issues.push(
            StructIssue::warning(
                "S-07",
                format!(
                    "분기 경로가 1개뿐인 판단 노드 {}개가 있어요. 분기가 불필요하다면 프로세스 노드로 변경해보세요.",
                    trivial.len()
                ),
            )
            .with_nodes(ids(trivial)),
        );
    }
}

fn s08_unlabeled_branches(nodes: &[FlowNode], outgoing: &Outgoing, issues: &mut Vec<StructIssue>) {
    let mut edge_ids = Vec::new();
    let mut node_ids = Vec::new();
    for decision in decisions(nodes) {
        let Some(out) = outgoing.get(decision.id.as_str()) else {
            continue;
        };
        if out.len() < 2 {
            continue;
        }
        let unlabeled: Vec<String> = out
            .iter()
            .filter(|e| !e.has_label())
            .map(|e| e.id.clone())
            .collect();
        if !unlabeled.is_empty() {
            edge_ids.extend(unlabeled);
            node_ids.push(decision.id.clone());
        }
    }
    if !edge_ids.is_empty() {
        issues.push(
            StructIssue::warning(
                "S-08",
                format!(
                    "판단 노드의 분기 연결 {}개에 조건 라벨이 없어요. 'Yes/No' 또는 구체적 조건을 적어주세요.",
                    edge_ids.len()
                ),
            )
            .with_edges(edge_ids)
            .with_nodes(node_ids),
        );
    }
}

fn s09_multiple_starts(nodes: &[FlowNode], issues: &mut Vec<StructIssue>) {
    let starts: Vec<&str> = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Start)
        .map(|n| n.id.as_str())
        .collect();
    if starts.len() > 1 {
        issues.push(
            StructIssue::warning(
                "S-09",
                format!(
                    "시작 노드가 {}개 있어요. 의도된 구조인지 확인해주세요. 일반적으로 프로세스는 시작점이 1개입니다.",
                    starts.len()
                ),
            )
            .with_nodes(ids(starts)),
        );
    }
}

fn s10_decision_fan_out(
    nodes: &[FlowNode],
    outgoing: &Outgoing,
    config: &RuleConfig,
    issues: &mut Vec<StructIssue>,
) {
    let limit = config.structure.max_decision_branches;
    let excessive: Vec<&str> = decisions(nodes)
        .filter(|n| out_count(outgoing, &n.id) >= limit)
        .map(|n| n.id.as_str())
        .collect();
    if !excessive.is_empty() {
        issues.push(
            StructIssue::warning(
                "S-10",
                format!(
                    "분기가 {}개 이상인 판단 노드 {}개가 있어요. 중첩 판단으로 분해하면 가독성이 좋아집니다.",
                    limit,
                    excessive.len()
                ),
            )
            .with_nodes(ids(excessive)),
        );
    }
}

fn s11_too_many_nodes(flow_nodes: &[&FlowNode], config: &RuleConfig, issues: &mut Vec<StructIssue>) {
    let limit = config.structure.max_flow_nodes;
    if flow_nodes.len() > limit {
        issues.push(StructIssue::warning(
            "S-11",
            format!(
                "전체 노드가 {}개로, {}개를 초과했어요. 서브프로세스로 분해하면 관리가 쉬워집니다.",
                flow_nodes.len(),
                limit
            ),
        ));
    }
}

fn s12_escapeless_cycles(
    nodes: &[FlowNode],
    edges: &[FlowEdge],
    outgoing: &Outgoing,
    issues: &mut Vec<StructIssue>,
) {
    let graph = FlowGraph::from_parts(nodes, edges);
    let labels: HashMap<&str, &str> = nodes
        .iter()
        .map(|n| (n.id.as_str(), n.label.trim()))
        .collect();

    for cycle in graph.find_cycles() {
        if has_exit(&cycle, outgoing) {
            continue;
        }
        let narration = cycle
            .iter()
            .map(|id| match labels.get(id.as_str()) {
                Some(label) if !label.is_empty() => *label,
                _ => id.as_str(),
            })
            .collect::<Vec<_>>()
            .join(" → ");
        issues.push(
            StructIssue::warning(
                "S-12",
                format!(
                    "탈출 조건이 없는 루프가 감지되었어요: {}. 루프 내 판단 노드에 탈출 분기를 추가해주세요.",
                    narration
                ),
            )
            .with_nodes(cycle),
        );
    }
}

/// True when some member of `cycle` has an edge leaving the cycle's node set.
fn has_exit(cycle: &[String], outgoing: &Outgoing) -> bool {
    let members: HashSet<&str> = cycle.iter().map(String::as_str).collect();
    cycle.iter().any(|id| {
        outgoing
            .get(id.as_str())
            .is_some_and(|out| out.iter().any(|e| !members.contains(e.target.as_str())))
    })
}
