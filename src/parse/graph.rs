//! petgraph-based directed graph wrapper for a flowchart.
//!
//! Node and edge indices follow document order, so every traversal here
//! (outgoing edges, cycle search) is deterministic and matches the order in
//! which the author drew the chart.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{FlowDocument, FlowEdge, FlowNode};
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeInfo {
    pub id: String,
    pub label: Option<String>,
}

pub struct FlowGraph {
    pub graph: DiGraph<String, EdgeInfo>,
    pub node_indices: HashMap<String, NodeIndex>,
    /// Ids of edges left out because an endpoint does not exist.
    pub dropped_edges: Vec<String>,
}

impl FlowGraph {
    /// Strict construction: unknown endpoints and duplicate node ids are errors.
    pub fn build(doc: &FlowDocument) -> Result<Self, Vec<EngineError>> {
        let (graph, errors) = Self::assemble(&doc.nodes, &doc.edges);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(graph)
    }

    /// Tolerant construction used by the structural analyzer: problems are
    /// logged and the offending elements skipped.
    pub fn from_parts(nodes: &[FlowNode], edges: &[FlowEdge]) -> Self {
        let (graph, errors) = Self::assemble(nodes, edges);
        for e in &errors {
            tracing::warn!(code = %e.code, "{}", e.message);
        }
        graph
    }

    fn assemble(nodes: &[FlowNode], edges: &[FlowEdge]) -> (Self, Vec<EngineError>) {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut dropped_edges = Vec::new();
        let mut errors = Vec::new();

        for node in nodes {
            if node_indices.contains_key(&node.id) {
                errors.push(EngineError::graph(
                    "P003",
                    format!("Duplicate node id '{}'", node.id),
                    Some(node.id.clone()),
                ));
                continue;
            }
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        for edge in edges {
            let source_idx = node_indices.get(&edge.source);
            let target_idx = node_indices.get(&edge.target);

            match (source_idx, target_idx) {
                (Some(&s), Some(&t)) => {
                    graph.add_edge(
                        s,
                        t,
                        EdgeInfo {
                            id: edge.id.clone(),
                            label: edge.label.clone(),
                        },
                    );
                }
                (None, _) => {
                    dropped_edges.push(edge.id.clone());
                    errors.push(EngineError::graph(
                        "P002",
                        format!(
                            "Edge '{}' references unknown source node '{}'",
                            edge.id, edge.source
                        ),
                        Some(edge.id.clone()),
                    ));
                }
                (_, None) => {
                    dropped_edges.push(edge.id.clone());
                    errors.push(EngineError::graph(
                        "P002",
                        format!(
                            "Edge '{}' references unknown target node '{}'",
                            edge.id, edge.target
                        ),
                        Some(edge.id.clone()),
                    ));
                }
            }
        }

        (
            FlowGraph {
                graph,
                node_indices,
                dropped_edges,
            },
            errors,
        )
    }

    /// Outgoing edges of a node in document order.
    pub fn outgoing_edges(&self, node_id: &str) -> Vec<(&str, &EdgeInfo)> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        self.ordered_out(idx)
            .into_iter()
            .map(|(e, t)| (self.graph[t].as_str(), &self.graph[e]))
            .collect()
    }

    /// Branch labels on a node's outgoing edges, in document order.
    pub fn branch_labels_out(&self, node_id: &str) -> Vec<Option<&str>> {
        self.outgoing_edges(node_id)
            .into_iter()
            .map(|(_, e)| e.label.as_deref())
            .collect()
    }

    fn ordered_out(&self, idx: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        // petgraph walks adjacency lists newest-first.
        let mut out: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        out.sort_by_key(|(e, _)| *e);
        out
    }

    /// Depth-first cycle extraction.
    ///
    /// DFS starts from every undiscovered node in document order and follows
    /// outgoing edges in document order. Reaching a node that is still on the
    /// DFS path records the path suffix from that node's position as one
    /// cycle. The same strongly connected component may be reported more than
    /// once when it is entered through different back edges; rotations are not
    /// merged.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let n = self.graph.node_count();
        let mut discovered = vec![false; n];
        let mut on_path = vec![false; n];
        let mut path: Vec<NodeIndex> = Vec::new();
        let mut frames: Vec<(Vec<NodeIndex>, usize)> = Vec::new();
        let mut cycles = Vec::new();

        for root in self.graph.node_indices() {
            if discovered[root.index()] {
                continue;
            }
            self.enter(root, &mut discovered, &mut on_path, &mut path, &mut frames);

            while let Some((succ, cursor)) = frames.last_mut() {
                let Some(&next) = succ.get(*cursor) else {
                    frames.pop();
                    if let Some(done) = path.pop() {
                        on_path[done.index()] = false;
                    }
                    continue;
                };
                *cursor += 1;

                if on_path[next.index()] {
                    if let Some(start) = path.iter().position(|&p| p == next) {
                        cycles.push(
                            path[start..]
                                .iter()
                                .map(|&p| self.graph[p].clone())
                                .collect(),
                        );
                    }
                } else if !discovered[next.index()] {
                    self.enter(next, &mut discovered, &mut on_path, &mut path, &mut frames);
                }
            }
        }

        cycles
    }

    fn enter(
        &self,
        idx: NodeIndex,
        discovered: &mut [bool],
        on_path: &mut [bool],
        path: &mut Vec<NodeIndex>,
        frames: &mut Vec<(Vec<NodeIndex>, usize)>,
    ) {
        discovered[idx.index()] = true;
        on_path[idx.index()] = true;
        path.push(idx);
        let succ = self.ordered_out(idx).into_iter().map(|(_, t)| t).collect();
        frames.push((succ, 0));
    }
}
