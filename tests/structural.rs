//! Integration tests for the structural rules (S-01…S-12).

#[allow(dead_code)]
mod helpers;

use flow_quality::config::RuleConfig;
use flow_quality::parse::*;
use flow_quality::validate::{Severity, StructIssue, analyze_structure};
use helpers::*;

fn analyze(nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<StructIssue> {
    analyze_structure(nodes, edges, RuleConfig::builtin())
}

fn rule_ids(issues: &[StructIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.rule_id.as_str()).collect()
}

fn find<'a>(issues: &'a [StructIssue], rule: &str) -> &'a StructIssue {
    issues
        .iter()
        .find(|i| i.rule_id == rule)
        .unwrap_or_else(|| panic!("Expected {}, got: {:?}", rule, rule_ids(issues)))
}

fn assert_no_issue(issues: &[StructIssue], rule: &str) {
    assert!(
        !issues.iter().any(|i| i.rule_id == rule),
        "Did not expect {}, but got: {:?}",
        rule,
        rule_ids(issues)
    );
}

#[test]
fn well_formed_flow_has_no_issues() {
    let doc = well_formed_flow();
    let issues = analyze(&doc.nodes, &doc.edges);
    assert!(issues.is_empty(), "{:?}", issues);
}

#[test]
fn all_structural_issues_are_warnings() {
    let nodes = vec![start("s1"), start("s2"), process("p", "새 태스크"), decision("d", "여부")];
    let edges = vec![edge("e1", "s1", "d"), edge("e2", "d", "p"), edge("e3", "d", "p")];
    let issues = analyze(&nodes, &edges);
    assert!(!issues.is_empty());
    assert!(issues.iter().all(|i| i.severity == Severity::Warning));
}

// =============================================================================
// S-01: end node
// =============================================================================

#[test]
fn s01_removing_the_end_node_adds_only_s01() {
    let doc = well_formed_flow();
    assert_no_issue(&analyze(&doc.nodes, &doc.edges), "S-01");

    let nodes: Vec<FlowNode> = doc.nodes.iter().filter(|n| n.kind != NodeKind::End).cloned().collect();
    let issues = analyze(&nodes, &doc.edges);
    assert_eq!(rule_ids(&issues), vec!["S-01"]);
}

// =============================================================================
// S-02…S-05: node-level shape
// =============================================================================

#[test]
fn s02_placeholder_and_blank_labels() {
    let nodes = vec![
        start("s"),
        process("p1", "새 태스크"),
        decision("d1", "  "),
        process("p2", "급여를 조회한다"),
        end("e"),
    ];
    let edges = vec![
        edge("e1", "s", "p1"),
        edge("e2", "p1", "d1"),
        labeled_edge("e3", "d1", "p2", "예"),
        labeled_edge("e4", "d1", "e", "아니오"),
        edge("e5", "p2", "e"),
    ];
    let issue = find(&analyze(&nodes, &edges), "S-02").clone();
    assert_eq!(issue.node_ids, vec!["p1", "d1"]);
}

#[test]
fn s02_ignores_terminal_labels() {
    let nodes = vec![node("s", NodeKind::Start, ""), process("p", "급여를 조회한다"), node("e", NodeKind::End, "")];
    let edges = vec![edge("e1", "s", "p"), edge("e2", "p", "e")];
    assert_no_issue(&analyze(&nodes, &edges), "S-02");
}

#[test]
fn s03_orphan_is_not_also_a_dead_end() {
    let mut doc = well_formed_flow();
    doc.nodes.push(process("lonely", "보고서를 보관한다"));
    let issues = analyze(&doc.nodes, &doc.edges);
    assert_eq!(find(&issues, "S-03").node_ids, vec!["lonely"]);
    assert_no_issue(&issues, "S-04");
}

#[test]
fn s03_ignores_unconnected_terminals() {
    let mut doc = well_formed_flow();
    doc.nodes.push(end("e2"));
    assert_no_issue(&analyze(&doc.nodes, &doc.edges), "S-03");
}

#[test]
fn s04_dead_end_steps() {
    let nodes = vec![start("s"), process("p1", "신청서를 접수한다"), subprocess("sp", "심사를 수행한다"), end("e")];
    let edges = vec![edge("e1", "s", "p1"), edge("e2", "p1", "sp")];
    let issues = analyze(&nodes, &edges);
    assert_eq!(find(&issues, "S-04").node_ids, vec!["sp"]);
}

#[test]
fn s05_process_with_two_outgoing_edges() {
    let nodes = vec![
        start("s"),
        process("p1", "신청서를 접수한다"),
        process("p2", "서류를 보관한다"),
        process("p3", "결과를 통보한다"),
        end("e"),
    ];
    let edges = vec![
        edge("e1", "s", "p1"),
        edge("e2", "p1", "p2"),
        edge("e3", "p1", "p3"),
        edge("e4", "p2", "e"),
        edge("e5", "p3", "e"),
    ];
    let issues = analyze(&nodes, &edges);
    assert_eq!(find(&issues, "S-05").node_ids, vec!["p1"]);
}

// =============================================================================
// S-06: duplicate edges
// =============================================================================

#[test]
fn s06_keeps_first_edge_and_flags_the_rest() {
    let nodes = vec![start("s"), process("p1", "신청서를 접수한다"), end("e")];
    let edges = vec![
        edge("e1", "s", "p1"),
        edge("e2", "p1", "e"),
        edge("e2-dup", "p1", "e"),
        edge("e1-dup", "s", "p1"),
        edge("e2-dup2", "p1", "e"),
    ];
    let issues = analyze(&nodes, &edges);
    let issue = find(&issues, "S-06");
    // Grouped by the first appearance of each (source, target) pair.
    assert_eq!(issue.edge_ids, vec!["e1-dup", "e2-dup", "e2-dup2"]);
    assert_eq!(issue.node_ids, vec!["s", "p1"]);
}

// =============================================================================
// S-07, S-08, S-10: decisions
// =============================================================================

#[test]
fn s07_decision_with_single_branch() {
    let nodes = vec![start("s"), decision("d", "승인 여부"), end("e")];
    let edges = vec![edge("e1", "s", "d"), labeled_edge("e2", "d", "e", "예")];
    let issues = analyze(&nodes, &edges);
    assert_eq!(find(&issues, "S-07").node_ids, vec!["d"]);
    // One branch is not "branching", so the label rule stays quiet.
    assert_no_issue(&issues, "S-08");
}

#[test]
fn s08_unlabeled_branches() {
    let mut doc = well_formed_flow();
    doc.edges[3].label = Some("   ".into());
    let issues = analyze(&doc.nodes, &doc.edges);
    let issue = find(&issues, "S-08");
    assert_eq!(issue.edge_ids, vec!["e4"]);
    assert_eq!(issue.node_ids, vec!["d1"]);
}

#[test]
fn s10_decision_fan_out() {
    let mut nodes = vec![start("s"), decision("d", "등급 구분 여부"), end("e")];
    let mut edges = vec![edge("e0", "s", "d")];
    for i in 0..4 {
        let id = format!("p{i}");
        nodes.push(process(&id, "결과를 통보한다"));
        edges.push(labeled_edge(&format!("b{i}"), "d", &id, &format!("{i}등급")));
        edges.push(edge(&format!("x{i}"), &id, "e"));
    }
    let issues = analyze(&nodes, &edges);
    assert_eq!(find(&issues, "S-10").node_ids, vec!["d"]);

    edges.retain(|e| e.id != "b3");
    nodes.retain(|n| n.id != "p3");
    edges.retain(|e| e.id != "x3");
    assert_no_issue(&analyze(&nodes, &edges), "S-10");
}

// =============================================================================
// S-09, S-11: whole chart
// =============================================================================

#[test]
fn s09_multiple_start_nodes() {
    let mut doc = well_formed_flow();
    doc.nodes.push(start("s2"));
    doc.edges.push(edge("e7", "s2", "p1"));
    let issues = analyze(&doc.nodes, &doc.edges);
    assert_eq!(find(&issues, "S-09").node_ids, vec!["s", "s2"]);
}

#[test]
fn s11_counts_only_step_nodes() {
    let build = |count: usize| {
        let mut nodes = vec![start("s"), end("e")];
        let mut edges = Vec::new();
        let mut prev = "s".to_string();
        for i in 0..count {
            let id = format!("p{i}");
            nodes.push(process(&id, "급여를 조회한다"));
            edges.push(edge(&format!("e{i}"), &prev, &id));
            prev = id;
        }
        edges.push(edge("last", &prev, "e"));
        (nodes, edges)
    };

    let (nodes, edges) = build(50);
    assert_no_issue(&analyze(&nodes, &edges), "S-11");

    let (nodes, edges) = build(51);
    let issues = analyze(&nodes, &edges);
    assert_eq!(rule_ids(&issues), vec!["S-11"]);
}

// =============================================================================
// S-12: escape-less cycles
// =============================================================================

#[test]
fn s12_closed_triangle_reports_path_in_discovery_order() {
    let nodes = vec![
        process("A", "서류를 작성한다"),
        process("B", "서류를 제출한다"),
        process("C", "서류를 보완한다"),
    ];
    let edges = vec![edge("ab", "A", "B"), edge("bc", "B", "C"), edge("ca", "C", "A")];
    let issues = analyze(&nodes, &edges);
    let cycles: Vec<&StructIssue> = issues.iter().filter(|i| i.rule_id == "S-12").collect();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].node_ids, vec!["A", "B", "C"]);
    assert!(
        cycles[0]
            .message
            .contains("서류를 작성한다 → 서류를 제출한다 → 서류를 보완한다"),
        "{}",
        cycles[0].message
    );
}

#[test]
fn s12_any_exit_edge_clears_the_cycle() {
    let nodes = vec![
        process("A", "서류를 작성한다"),
        process("B", "서류를 제출한다"),
        process("C", "서류를 보완한다"),
        end("E"),
    ];
    for exit_from in ["A", "B", "C"] {
        let edges = vec![
            edge("ab", "A", "B"),
            edge("bc", "B", "C"),
            edge("ca", "C", "A"),
            edge("exit", exit_from, "E"),
        ];
        assert_no_issue(&analyze(&nodes, &edges), "S-12");
    }
}

#[test]
fn s12_cycle_entered_from_outside_starts_at_the_reentry_node() {
    let nodes = vec![
        start("s"),
        process("p", "신청서를 접수한다"),
        process("q", "서류를 검증한다"),
        process("r", "서류를 보완한다"),
    ];
    let edges = vec![
        edge("e1", "s", "p"),
        edge("e2", "p", "q"),
        edge("e3", "q", "r"),
        edge("e4", "r", "q"),
    ];
    let issues = analyze(&nodes, &edges);
    assert_eq!(find(&issues, "S-12").node_ids, vec!["q", "r"]);
}

#[test]
fn s12_self_loop_without_exit() {
    let nodes = vec![start("s"), process("p", "결과를 대기한다")];
    let edges = vec![edge("e1", "s", "p"), edge("loop", "p", "p")];
    let issues = analyze(&nodes, &edges);
    assert_eq!(find(&issues, "S-12").node_ids, vec!["p"]);
}

#[test]
fn s12_checks_each_extracted_cycle_on_its_own() {
    // A→B→A and A→B→C→A share one component. The short cycle leaves through
    // B→C, so only the full path is reported.
    let nodes = vec![
        process("A", "서류를 작성한다"),
        process("B", "서류를 제출한다"),
        process("C", "서류를 보완한다"),
    ];
    let edges = vec![
        edge("ab", "A", "B"),
        edge("ba", "B", "A"),
        edge("bc", "B", "C"),
        edge("ca", "C", "A"),
    ];
    let issues = analyze(&nodes, &edges);
    let cycles: Vec<&Vec<String>> = issues
        .iter()
        .filter(|i| i.rule_id == "S-12")
        .map(|i| &i.node_ids)
        .collect();
    assert_eq!(cycles, vec![&vec!["A".to_string(), "B".to_string(), "C".to_string()]]);

    // Figure eight: each extracted cycle exits into the other loop, so
    // nothing is reported even though the component has no way out.
    let edges = vec![
        edge("ab", "A", "B"),
        edge("ba", "B", "A"),
        edge("ac", "A", "C"),
        edge("ca", "C", "A"),
    ];
    assert_no_issue(&analyze(&nodes, &edges), "S-12");
}

#[test]
fn s12_unlabeled_cycle_members_are_narrated_by_id() {
    let nodes = vec![process("A", ""), process("B", "서류를 제출한다")];
    let edges = vec![edge("ab", "A", "B"), edge("ba", "B", "A")];
    let issues = analyze(&nodes, &edges);
    assert!(find(&issues, "S-12").message.contains("A → 서류를 제출한다"));
}

#[test]
fn s12_long_ring_does_not_exhaust_the_stack() {
    const LEN: usize = 100_000;
    let nodes: Vec<FlowNode> = (0..LEN)
        .map(|i| process(&format!("n{i}"), "급여를 조회한다"))
        .collect();
    let edges: Vec<FlowEdge> = (0..LEN)
        .map(|i| edge(&format!("x{i}"), &format!("n{i}"), &format!("n{}", (i + 1) % LEN)))
        .collect();

    let issues = analyze(&nodes, &edges);
    assert_eq!(rule_ids(&issues), vec!["S-01", "S-11", "S-12"]);
    let cycle = &find(&issues, "S-12").node_ids;
    assert_eq!(cycle.len(), LEN);
    assert_eq!(cycle[0], "n0");
    assert_eq!(cycle[LEN - 1], format!("n{}", LEN - 1));
}

#[test]
fn dangling_edges_do_not_crash_analysis() {
    let mut doc = well_formed_flow();
    doc.edges.push(edge("ghost", "p1", "nowhere"));
    doc.edges.push(edge("ghost2", "missing", "p1"));
    let issues = analyze(&doc.nodes, &doc.edges);
    assert_no_issue(&issues, "S-12");
    assert_no_issue(&issues, "S-03");
}

#[test]
fn empty_chart_only_misses_an_end() {
    let issues = analyze(&[], &[]);
    assert_eq!(rule_ids(&issues), vec!["S-01"]);
}
