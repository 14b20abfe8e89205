//! Closure via biconnected components of the undirected union graph.

use std::collections::{HashMap, HashSet};

use petgraph::graphmap::UnGraphMap;
use tracing::{debug, instrument};

use crate::error::{PlannerError, PlannerResult};
use crate::types::{ElementGraph, ElementId};

/// Vertex closure of `contracted` over `full` from biconnected components.
///
/// Each contracted edge claims every not yet claimed component holding both of
/// its endpoints.
#[instrument(level = "trace", skip(full, contracted))]
pub fn find_closure_via_biconnected<F, C>(
  full: &F,
  contracted: &C,
) -> PlannerResult<HashSet<ElementId>>
where
  F: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  let union = undirected_union(full, contracted);
  let mut components = biconnected_components(&union);
  if components.is_empty() {
    return Err(PlannerError::NoBiconnectedComponents);
  }
  debug!(components = components.len(), "biconnected components");

  let mut vertices: HashSet<ElementId> = contracted.vertex_ids().into_iter().collect();
  for entry in contracted.edge_entries() {
    components.retain(|component| {
      let covers = component.contains(&entry.source) && component.contains(&entry.target);
      if covers {
        vertices.extend(component.iter().copied());
      }
      !covers
    });
  }

  if vertices.is_empty() {
    return Err(PlannerError::EmptyClosure);
  }
  Ok(vertices)
}

/// Simple undirected graph over both vertex and edge sets. Self loops and
/// parallel edges collapse.
fn undirected_union<F, C>(full: &F, contracted: &C) -> UnGraphMap<ElementId, ()>
where
  F: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  let mut union = UnGraphMap::new();
  for id in full.vertex_ids().into_iter().chain(contracted.vertex_ids()) {
    union.add_node(id);
  }
  for entry in full.edge_entries().into_iter().chain(contracted.edge_entries()) {
    if entry.source != entry.target {
      union.add_edge(entry.source, entry.target, ());
    }
  }
  union
}

struct Frame {
  vertex: ElementId,
  parent: Option<ElementId>,
  neighbors: Vec<ElementId>,
  next: usize,
}

impl Frame {
  fn new(graph: &UnGraphMap<ElementId, ()>, vertex: ElementId, parent: Option<ElementId>) -> Self {
    Self {
      vertex,
      parent,
      neighbors: graph.neighbors(vertex).collect(),
      next: 0,
    }
  }
}

/// Vertex sets of the biconnected components, isolated vertices included as
/// singletons. Iterative Hopcroft-Tarjan with an edge stack.
pub(crate) fn biconnected_components(graph: &UnGraphMap<ElementId, ()>) -> Vec<HashSet<ElementId>> {
  let mut discovered: HashMap<ElementId, usize> = HashMap::new();
  let mut low: HashMap<ElementId, usize> = HashMap::new();
  let mut components = Vec::new();
  let mut time = 0usize;

  for root in graph.nodes() {
    if discovered.contains_key(&root) {
      continue;
    }
    discovered.insert(root, time);
    low.insert(root, time);
    time += 1;

    if graph.neighbors(root).next().is_none() {
      components.push(HashSet::from([root]));
      continue;
    }

    let mut stack = vec![Frame::new(graph, root, None)];
    let mut edges: Vec<(ElementId, ElementId)> = Vec::new();

    while let Some(frame) = stack.last_mut() {
      let v = frame.vertex;
      if let Some(&w) = frame.neighbors.get(frame.next) {
        frame.next += 1;
        if Some(w) == frame.parent {
          continue;
        }
        match discovered.get(&w).copied() {
          None => {
            edges.push((v, w));
            discovered.insert(w, time);
            low.insert(w, time);
            time += 1;
            stack.push(Frame::new(graph, w, Some(v)));
          }
          Some(seen) if seen < discovered[&v] => {
            edges.push((v, w));
            if seen < low[&v] {
              low.insert(v, seen);
            }
          }
          Some(_) => {}
        }
        continue;
      }

      stack.pop();
      let Some(parent) = stack.last() else {
        continue;
      };
      let u = parent.vertex;
      let low_v = low[&v];
      if low_v < low[&u] {
        low.insert(u, low_v);
      }
      if low_v >= discovered[&u] {
        let mut component = HashSet::new();
        while let Some((a, b)) = edges.pop() {
          component.insert(a);
          component.insert(b);
          if (a, b) == (u, v) {
            break;
          }
        }
        components.push(component);
      }
    }
  }
  components
}
