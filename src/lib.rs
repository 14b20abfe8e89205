//! # streamweave-flowgraph
//!
//! Flow-graph algebra for a dataflow pipeline planner.
//!
//! A logical execution plan is a DAG of flow elements ([`FlowGraph`]). This
//! crate provides the primitive operations a planner composes on it:
//!
//! - [`equivalence`]: order-insensitive hashing and equality of graphs.
//! - [`closure`]: the detailed region of a full graph implied by a coarser
//!   contracted graph, as a read-only [`ElementSubGraph`] view.
//! - [`editing`]: contraction, insertion, replacement and chain removal.
//! - [`splice`]: classifying the inputs of a join or grouping as streamed or
//!   accumulated.
//! - [`traversal`]: topological iteration, named lookup and source/sink
//!   discovery.
//!
//! Set `RUST_LOG=streamweave_flowgraph=trace` with a `tracing` subscriber
//! installed to see span enter/exit and events.

pub mod closure;
pub mod config;
pub mod editing;
pub mod equivalence;
pub mod error;
pub mod paths;
pub mod splice;
#[cfg(test)]
mod splice_test;
pub mod traversal;
pub mod types;

pub use config::{ClosureAlgorithm, ContractionMode, PlannerConfig};
pub use error::{PlannerError, PlannerResult};
pub use types::{
  Annotation, Annotations, EdgeEntry, EdgeId, ElementGraph, ElementId, ElementMaskSubGraph,
  ElementSubGraph, FlowEdge, FlowElement, FlowGraph, JoinNode, NamedNode,
};
