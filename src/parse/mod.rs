//! Parse phase: flow JSON → Rust types + graph construction.

pub mod graph;
pub mod types;

pub use graph::FlowGraph;
pub use types::*;

use crate::error::EngineError;

/// Deserialize a flow document JSON string.
pub fn parse(json: &str) -> Result<FlowDocument, Vec<EngineError>> {
    serde_json::from_str::<FlowDocument>(json).map_err(|e| {
        vec![EngineError::parse(
            "P001",
            format!("Failed to parse flow JSON: {}", e),
        )]
    })
}

/// Parse JSON and build the strict graph in one step.
pub fn parse_and_build(json: &str) -> Result<(FlowDocument, FlowGraph), Vec<EngineError>> {
    let doc = parse(json)?;
    let graph = FlowGraph::build(&doc)?;
    Ok((doc, graph))
}
