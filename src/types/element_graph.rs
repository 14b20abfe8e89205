//! Read-only query surface shared by flow graphs and their views.

use petgraph::stable_graph::EdgeIndex;

use super::{Annotations, ElementId, FlowEdge, FlowElement};

/// Identity of an edge within one backing flow graph.
pub type EdgeId = EdgeIndex;

/// A borrowed edge together with its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct EdgeEntry<'a> {
  pub id: EdgeId,
  pub source: ElementId,
  pub target: ElementId,
  pub edge: &'a FlowEdge,
}

/// Read-only directed graph of flow elements.
///
/// Implemented by [`FlowGraph`](super::FlowGraph) and by the views in
/// [`sub_graph`](super::ElementSubGraph). Iteration order is deterministic for
/// a given sequence of edits.
pub trait ElementGraph {
  /// Vertex ids in storage order.
  fn vertex_ids(&self) -> Vec<ElementId>;

  fn element(&self, id: ElementId) -> Option<&FlowElement>;

  fn contains_vertex(&self, id: ElementId) -> bool;

  /// All edges in storage order.
  fn edge_entries(&self) -> Vec<EdgeEntry<'_>>;

  fn edge(&self, id: EdgeId) -> Option<EdgeEntry<'_>>;

  /// Edges ending at `id`; empty if `id` is not a vertex.
  fn incoming_edges(&self, id: ElementId) -> Vec<EdgeEntry<'_>>;

  /// Edges starting at `id`; empty if `id` is not a vertex.
  fn outgoing_edges(&self, id: ElementId) -> Vec<EdgeEntry<'_>>;

  /// Annotation decoration, if the graph carries one.
  fn annotations(&self) -> Option<&Annotations> {
    None
  }

  fn has_annotations(&self) -> bool {
    self.annotations().is_some_and(|a| !a.is_empty())
  }

  fn vertex_count(&self) -> usize {
    self.vertex_ids().len()
  }

  fn edge_count(&self) -> usize {
    self.edge_entries().len()
  }

  fn in_degree(&self, id: ElementId) -> usize {
    self.incoming_edges(id).len()
  }

  fn out_degree(&self, id: ElementId) -> usize {
    self.outgoing_edges(id).len()
  }

  fn predecessors(&self, id: ElementId) -> Vec<ElementId> {
    self.incoming_edges(id).iter().map(|e| e.source).collect()
  }

  fn successors(&self, id: ElementId) -> Vec<ElementId> {
    self.outgoing_edges(id).iter().map(|e| e.target).collect()
  }

  /// Elements in storage order.
  fn elements(&self) -> Vec<&FlowElement> {
    self
      .vertex_ids()
      .into_iter()
      .filter_map(|id| self.element(id))
      .collect()
  }
}
