//! The mutable flow graph.
//!
//! Vertices are [`FlowElement`]s keyed by [`ElementId`]; edges are
//! [`FlowEdge`]s. Storage is a `petgraph` `StableDiGraph`, so edge ids stay
//! valid while other vertices and edges are removed. Parallel edges are
//! allowed; cycles are not.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use tracing::trace;

use super::{Annotations, EdgeEntry, EdgeId, ElementGraph, ElementId, FlowEdge, FlowElement};
use crate::error::{PlannerError, PlannerResult};

/// A directed acyclic graph of flow elements.
///
/// # Example
///
/// ```
/// use streamweave_flowgraph::{ElementGraph, FlowElement, FlowGraph};
///
/// let mut graph = FlowGraph::new();
/// let source = FlowElement::boundary("input");
/// let step = FlowElement::transform("parse");
/// let (source_id, step_id) = (source.id(), step.id());
/// graph.add_vertex(source);
/// graph.add_vertex(step);
/// graph.connect(source_id, step_id).unwrap();
///
/// assert_eq!(graph.out_degree(source_id), 1);
/// assert!(graph.connect(step_id, source_id).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
  graph: StableDiGraph<FlowElement, FlowEdge>,
  indices: HashMap<ElementId, NodeIndex>,
  annotations: Option<Annotations>,
}

impl FlowGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a graph holding only the `Head` and `Tail` sentinels.
  pub fn with_extents() -> Self {
    let mut graph = Self::new();
    graph.add_vertex(FlowElement::Head);
    graph.add_vertex(FlowElement::Tail);
    graph
  }

  /// Adds `element` as a vertex. Returns false if it is already present.
  pub fn add_vertex(&mut self, element: FlowElement) -> bool {
    let id = element.id();
    if self.indices.contains_key(&id) {
      return false;
    }
    let index = self.graph.add_node(element);
    self.indices.insert(id, index);
    true
  }

  /// Removes a vertex with all of its edges and annotation tags.
  pub fn remove_vertex(&mut self, id: ElementId) -> Option<FlowElement> {
    let index = self.indices.remove(&id)?;
    if let Some(annotations) = self.annotations.as_mut() {
      annotations.remove_element(id);
    }
    trace!(element = %id, "removing vertex");
    self.graph.remove_node(index)
  }

  /// Adds `edge` from `source` to `target`.
  ///
  /// Fails if either endpoint is missing or if the edge would close a cycle.
  pub fn add_edge(
    &mut self,
    source: ElementId,
    target: ElementId,
    edge: FlowEdge,
  ) -> PlannerResult<EdgeId> {
    let from = self.index_of(source)?;
    let to = self.index_of(target)?;
    if from == to || has_path_connecting(&self.graph, to, from, None) {
      return Err(PlannerError::cycle(source, target));
    }
    Ok(self.graph.add_edge(from, to, edge))
  }

  /// Adds an edge named after the source element.
  pub fn connect(&mut self, source: ElementId, target: ElementId) -> PlannerResult<EdgeId> {
    let name = self
      .element(source)
      .ok_or(PlannerError::element_not_found(source))?
      .name()
      .to_string();
    self.add_edge(source, target, FlowEdge::new(name))
  }

  pub fn remove_edge(&mut self, id: EdgeId) -> Option<FlowEdge> {
    self.graph.remove_edge(id)
  }

  /// Removes the lowest-id edge from `source` to `target`, if any.
  pub fn remove_edge_between(
    &mut self,
    source: ElementId,
    target: ElementId,
  ) -> Option<(EdgeId, FlowEdge)> {
    let from = *self.indices.get(&source)?;
    let to = *self.indices.get(&target)?;
    let id = self
      .graph
      .edges_directed(from, Direction::Outgoing)
      .filter(|e| e.target() == to)
      .map(|e| e.id())
      .min()?;
    self.graph.remove_edge(id).map(|edge| (id, edge))
  }

  pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut FlowEdge> {
    self.graph.edge_weight_mut(id)
  }

  /// Annotation decoration, created empty on first use.
  pub fn annotations_mut(&mut self) -> &mut Annotations {
    self.annotations.get_or_insert_with(Annotations::new)
  }

  pub fn set_annotations(&mut self, annotations: Option<Annotations>) {
    self.annotations = annotations;
  }

  fn index_of(&self, id: ElementId) -> PlannerResult<NodeIndex> {
    self
      .indices
      .get(&id)
      .copied()
      .ok_or(PlannerError::element_not_found(id))
  }

  fn entry(&self, id: EdgeId) -> Option<EdgeEntry<'_>> {
    let (from, to) = self.graph.edge_endpoints(id)?;
    Some(EdgeEntry {
      id,
      source: self.graph.node_weight(from)?.id(),
      target: self.graph.node_weight(to)?.id(),
      edge: self.graph.edge_weight(id)?,
    })
  }

  fn entries_directed(&self, id: ElementId, direction: Direction) -> Vec<EdgeEntry<'_>> {
    let Some(&index) = self.indices.get(&id) else {
      return Vec::new();
    };
    let mut ids: Vec<EdgeId> = self
      .graph
      .edges_directed(index, direction)
      .map(|e| e.id())
      .collect();
    ids.sort();
    ids.into_iter().filter_map(|e| self.entry(e)).collect()
  }
}

impl ElementGraph for FlowGraph {
  fn vertex_ids(&self) -> Vec<ElementId> {
    self
      .graph
      .node_indices()
      .filter_map(|n| self.graph.node_weight(n))
      .map(FlowElement::id)
      .collect()
  }

  fn element(&self, id: ElementId) -> Option<&FlowElement> {
    self
      .indices
      .get(&id)
      .and_then(|&index| self.graph.node_weight(index))
  }

  fn contains_vertex(&self, id: ElementId) -> bool {
    self.indices.contains_key(&id)
  }

  fn edge_entries(&self) -> Vec<EdgeEntry<'_>> {
    self
      .graph
      .edge_indices()
      .filter_map(|e| self.entry(e))
      .collect()
  }

  fn edge(&self, id: EdgeId) -> Option<EdgeEntry<'_>> {
    self.entry(id)
  }

  fn incoming_edges(&self, id: ElementId) -> Vec<EdgeEntry<'_>> {
    self.entries_directed(id, Direction::Incoming)
  }

  fn outgoing_edges(&self, id: ElementId) -> Vec<EdgeEntry<'_>> {
    self.entries_directed(id, Direction::Outgoing)
  }

  fn annotations(&self) -> Option<&Annotations> {
    self.annotations.as_ref()
  }

  fn vertex_count(&self) -> usize {
    self.graph.node_count()
  }

  fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }
}
