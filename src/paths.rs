//! Path enumeration between two flow elements.

use std::collections::HashSet;

use tracing::{instrument, trace};

use crate::types::{EdgeId, ElementGraph, ElementId};

/// A directed path: `vertices.len() == edges.len() + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPath {
  vertices: Vec<ElementId>,
  edges: Vec<EdgeId>,
}

impl GraphPath {
  pub fn vertices(&self) -> &[ElementId] {
    &self.vertices
  }

  pub fn edges(&self) -> &[EdgeId] {
    &self.edges
  }

  /// Number of edges.
  pub fn len(&self) -> usize {
    self.edges.len()
  }

  pub fn is_empty(&self) -> bool {
    self.edges.is_empty()
  }

  pub fn last_edge(&self) -> Option<EdgeId> {
    self.edges.last().copied()
  }

  /// Vertices strictly between the two endpoints.
  pub fn interior(&self) -> &[ElementId] {
    match self.vertices.len() {
      0..=2 => &[],
      n => &self.vertices[1..n - 1],
    }
  }
}

/// Every path from `from` to `to`, shortest first.
///
/// This is the k-shortest-paths enumeration with k unbounded: on a DAG it
/// yields all simple paths, each parallel edge giving its own path. The count
/// can grow exponentially with the number of diamonds between the endpoints.
#[instrument(level = "trace", skip(graph))]
pub fn all_shortest_paths_between<G: ElementGraph + ?Sized>(
  graph: &G,
  from: ElementId,
  to: ElementId,
) -> Vec<GraphPath> {
  paths_through(graph, from, to, |_| true)
}

/// Every path from `from` to `to` whose interior vertices all satisfy
/// `admits`, shortest first.
///
/// Only vertices that can still reach `to` through admitted vertices are
/// walked, so branches leading elsewhere cost nothing beyond one reverse
/// sweep.
pub(crate) fn paths_through<G, A>(
  graph: &G,
  from: ElementId,
  to: ElementId,
  admits: A,
) -> Vec<GraphPath>
where
  G: ElementGraph + ?Sized,
  A: Fn(ElementId) -> bool,
{
  if from == to || !graph.contains_vertex(from) || !graph.contains_vertex(to) {
    return Vec::new();
  }
  let reaches = vertices_reaching(graph, to, &admits);
  if !reaches.contains(&from) {
    return Vec::new();
  }

  let steps = |vertex: ElementId| -> Vec<(EdgeId, ElementId)> {
    graph
      .outgoing_edges(vertex)
      .into_iter()
      .filter(|e| e.target == to || (reaches.contains(&e.target) && admits(e.target)))
      .map(|e| (e.id, e.target))
      .collect()
  };

  let mut found = Vec::new();
  let mut vertices = vec![from];
  let mut edges: Vec<EdgeId> = Vec::new();
  let mut on_path = HashSet::from([from]);
  let mut stack = vec![Frame {
    steps: steps(from),
    next: 0,
  }];

  while let Some(frame) = stack.last_mut() {
    let step = frame.steps.get(frame.next).copied();
    frame.next += 1;
    let Some((edge, target)) = step else {
      stack.pop();
      if let Some(left) = vertices.pop() {
        on_path.remove(&left);
      }
      edges.pop();
      continue;
    };

    if target == to {
      let mut path = GraphPath {
        vertices: vertices.clone(),
        edges: edges.clone(),
      };
      path.vertices.push(to);
      path.edges.push(edge);
      found.push(path);
      continue;
    }
    if !on_path.insert(target) {
      continue;
    }
    vertices.push(target);
    edges.push(edge);
    stack.push(Frame {
      steps: steps(target),
      next: 0,
    });
  }

  found.sort_by_key(GraphPath::len);
  trace!(paths = found.len(), "enumerated paths");
  found
}

/// Outgoing steps of one vertex on the current path, and the next to try.
struct Frame {
  steps: Vec<(EdgeId, ElementId)>,
  next: usize,
}

/// `to` plus every vertex with a path into `to` whose interior is admitted.
fn vertices_reaching<G, A>(graph: &G, to: ElementId, admits: &A) -> HashSet<ElementId>
where
  G: ElementGraph + ?Sized,
  A: Fn(ElementId) -> bool,
{
  let mut reaches = HashSet::from([to]);
  let mut pending = vec![to];
  while let Some(vertex) = pending.pop() {
    for source in graph.predecessors(vertex) {
      if reaches.insert(source) && admits(source) {
        pending.push(source);
      }
    }
  }
  reaches
}
