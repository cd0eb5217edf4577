use flow_quality::parse::*;

// =============================================================================
// Node builders
// =============================================================================

pub fn node(id: &str, kind: NodeKind, label: &str) -> FlowNode {
    FlowNode::new(id, kind, label)
}

pub fn start(id: &str) -> FlowNode {
    node(id, NodeKind::Start, "시작")
}

pub fn end(id: &str) -> FlowNode {
    node(id, NodeKind::End, "종료")
}

pub fn process(id: &str, label: &str) -> FlowNode {
    node(id, NodeKind::Process, label)
}

pub fn decision(id: &str, label: &str) -> FlowNode {
    node(id, NodeKind::Decision, label)
}

pub fn subprocess(id: &str, label: &str) -> FlowNode {
    node(id, NodeKind::Subprocess, label)
}

// =============================================================================
// Edge builders
// =============================================================================

pub fn edge(id: &str, source: &str, target: &str) -> FlowEdge {
    FlowEdge {
        id: id.into(),
        source: source.into(),
        target: target.into(),
        label: None,
    }
}

pub fn labeled_edge(id: &str, source: &str, target: &str, label: &str) -> FlowEdge {
    FlowEdge {
        label: Some(label.into()),
        ..edge(id, source, target)
    }
}

// =============================================================================
// Documents
// =============================================================================

/// start → 신청서를 접수한다 → 승인 여부 →(예) 결과를 통보한다 → end
///                                      →(아니오) 신청서를 반려한다 → end
pub fn well_formed_flow() -> FlowDocument {
    FlowDocument {
        nodes: vec![
            start("s"),
            process("p1", "신청서를 접수한다"),
            decision("d1", "승인 여부"),
            process("p2", "결과를 통보한다"),
            process("p3", "신청서를 반려한다"),
            end("e"),
        ],
        edges: vec![
            edge("e1", "s", "p1"),
            edge("e2", "p1", "d1"),
            labeled_edge("e3", "d1", "p2", "예"),
            labeled_edge("e4", "d1", "p3", "아니오"),
            edge("e5", "p2", "e"),
            edge("e6", "p3", "e"),
        ],
    }
}
