//! Flow graph data model: elements, edges, annotations, the mutable graph and
//! its read-only views.

mod annotations;
mod element_graph;
mod element_id;
mod flow_edge;
#[cfg(test)]
mod flow_edge_test;
mod flow_element;
mod flow_graph;
mod sub_graph;
#[cfg(test)]
mod sub_graph_test;

pub use annotations::{Annotation, Annotations};
pub use element_graph::{EdgeEntry, EdgeId, ElementGraph};
pub use element_id::ElementId;
pub use flow_edge::{DEFAULT_EDGE_WEIGHT, FlowEdge};
pub use flow_element::{FlowElement, JoinNode, NamedNode};
pub use flow_graph::FlowGraph;
pub use sub_graph::{ElementMaskSubGraph, ElementSubGraph};
