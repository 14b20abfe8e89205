//! Read-only views over a backing flow graph.
//!
//! A view borrows its backing graph and owns only its restriction sets, so the
//! backing graph cannot be edited while a view derived from it is alive.

use std::collections::HashSet;

use super::{Annotations, EdgeEntry, EdgeId, ElementGraph, ElementId, FlowElement, FlowGraph};

/// A backing graph restricted to a vertex set and, optionally, an edge set.
///
/// Without an edge set the view is the induced sub-graph. With one, an edge is
/// visible only if it is in the set and both of its endpoints are visible.
#[derive(Debug)]
pub struct ElementSubGraph<'g, G: ElementGraph + ?Sized = FlowGraph> {
  backing: &'g G,
  vertices: HashSet<ElementId>,
  edges: Option<HashSet<EdgeId>>,
}

impl<'g, G: ElementGraph + ?Sized> ElementSubGraph<'g, G> {
  /// The sub-graph induced by `vertices`. Ids absent from `backing` are ignored.
  pub fn new(backing: &'g G, vertices: impl IntoIterator<Item = ElementId>) -> Self {
    let vertices = vertices
      .into_iter()
      .filter(|id| backing.contains_vertex(*id))
      .collect();
    Self {
      backing,
      vertices,
      edges: None,
    }
  }

  /// The sub-graph over `vertices` keeping only edges in `edges`.
  pub fn with_edges(
    backing: &'g G,
    vertices: impl IntoIterator<Item = ElementId>,
    edges: impl IntoIterator<Item = EdgeId>,
  ) -> Self {
    let mut view = Self::new(backing, vertices);
    view.edges = Some(edges.into_iter().collect());
    view
  }

  pub fn backing(&self) -> &'g G {
    self.backing
  }

  /// The restriction vertex set.
  pub fn vertex_set(&self) -> &HashSet<ElementId> {
    &self.vertices
  }

  fn admits(&self, entry: &EdgeEntry<'_>) -> bool {
    self.vertices.contains(&entry.source)
      && self.vertices.contains(&entry.target)
      && self.edges.as_ref().is_none_or(|edges| edges.contains(&entry.id))
  }
}

impl<G: ElementGraph + ?Sized> Clone for ElementSubGraph<'_, G> {
  fn clone(&self) -> Self {
    Self {
      backing: self.backing,
      vertices: self.vertices.clone(),
      edges: self.edges.clone(),
    }
  }
}

impl<G: ElementGraph + ?Sized> ElementGraph for ElementSubGraph<'_, G> {
  fn vertex_ids(&self) -> Vec<ElementId> {
    self
      .backing
      .vertex_ids()
      .into_iter()
      .filter(|id| self.vertices.contains(id))
      .collect()
  }

  fn element(&self, id: ElementId) -> Option<&FlowElement> {
    if !self.vertices.contains(&id) {
      return None;
    }
    self.backing.element(id)
  }

  fn contains_vertex(&self, id: ElementId) -> bool {
    self.vertices.contains(&id)
  }

  fn edge_entries(&self) -> Vec<EdgeEntry<'_>> {
    self
      .backing
      .edge_entries()
      .into_iter()
      .filter(|e| self.admits(e))
      .collect()
  }

  fn edge(&self, id: EdgeId) -> Option<EdgeEntry<'_>> {
    self.backing.edge(id).filter(|e| self.admits(e))
  }

  fn incoming_edges(&self, id: ElementId) -> Vec<EdgeEntry<'_>> {
    if !self.vertices.contains(&id) {
      return Vec::new();
    }
    self
      .backing
      .incoming_edges(id)
      .into_iter()
      .filter(|e| self.admits(e))
      .collect()
  }

  fn outgoing_edges(&self, id: ElementId) -> Vec<EdgeEntry<'_>> {
    if !self.vertices.contains(&id) {
      return Vec::new();
    }
    self
      .backing
      .outgoing_edges(id)
      .into_iter()
      .filter(|e| self.admits(e))
      .collect()
  }

  fn vertex_count(&self) -> usize {
    self.vertices.len()
  }
}

/// A backing graph with the `Head` and `Tail` sentinels hidden.
#[derive(Debug)]
pub struct ElementMaskSubGraph<'g, G: ElementGraph + ?Sized = FlowGraph> {
  backing: &'g G,
}

impl<'g, G: ElementGraph + ?Sized> ElementMaskSubGraph<'g, G> {
  pub fn new(backing: &'g G) -> Self {
    Self { backing }
  }

  pub fn backing(&self) -> &'g G {
    self.backing
  }

  fn visible(entry: &EdgeEntry<'_>) -> bool {
    !entry.source.is_sentinel() && !entry.target.is_sentinel()
  }
}

impl<G: ElementGraph + ?Sized> Clone for ElementMaskSubGraph<'_, G> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<G: ElementGraph + ?Sized> Copy for ElementMaskSubGraph<'_, G> {}

impl<G: ElementGraph + ?Sized> ElementGraph for ElementMaskSubGraph<'_, G> {
  fn vertex_ids(&self) -> Vec<ElementId> {
    self
      .backing
      .vertex_ids()
      .into_iter()
      .filter(|id| !id.is_sentinel())
      .collect()
  }

  fn element(&self, id: ElementId) -> Option<&FlowElement> {
    if id.is_sentinel() {
      return None;
    }
    self.backing.element(id)
  }

  fn contains_vertex(&self, id: ElementId) -> bool {
    !id.is_sentinel() && self.backing.contains_vertex(id)
  }

  fn edge_entries(&self) -> Vec<EdgeEntry<'_>> {
    self
      .backing
      .edge_entries()
      .into_iter()
      .filter(Self::visible)
      .collect()
  }

  fn edge(&self, id: EdgeId) -> Option<EdgeEntry<'_>> {
    self.backing.edge(id).filter(Self::visible)
  }

  fn incoming_edges(&self, id: ElementId) -> Vec<EdgeEntry<'_>> {
    if id.is_sentinel() {
      return Vec::new();
    }
    self
      .backing
      .incoming_edges(id)
      .into_iter()
      .filter(Self::visible)
      .collect()
  }

  fn outgoing_edges(&self, id: ElementId) -> Vec<EdgeEntry<'_>> {
    if id.is_sentinel() {
      return Vec::new();
    }
    self
      .backing
      .outgoing_edges(id)
      .into_iter()
      .filter(Self::visible)
      .collect()
  }

  fn annotations(&self) -> Option<&Annotations> {
    self.backing.annotations()
  }
}
