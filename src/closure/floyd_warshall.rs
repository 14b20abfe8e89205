//! Closure via all-pairs shortest distances.

use std::collections::{HashMap, HashSet};

use petgraph::algo::floyd_warshall;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use super::Closure;
use crate::error::{PlannerError, PlannerResult};
use crate::types::{EdgeId, ElementGraph, ElementId};

/// Vertex closure of `contracted` over `full`, plus the edges pruned to keep
/// it from leaking past the region boundary.
///
/// Pruned edges are those touching an element of `excludes`, those entering a
/// contracted vertex with no contracted predecessor, and those leaving a
/// contracted vertex with no contracted successor. A non-contracted vertex
/// joins the closure when it lies on a path between the endpoints of some
/// contracted edge in `full` without sentinels and pruned edges.
#[instrument(level = "trace", skip(full, contracted, excludes))]
pub fn find_closure_via_floyd_warshall<F, C>(
  full: &F,
  contracted: &C,
  excludes: Option<&HashSet<ElementId>>,
) -> PlannerResult<Closure>
where
  F: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  let mut vertices: HashSet<ElementId> = contracted.vertex_ids().into_iter().collect();
  let excluded_edges = exclusion_edges(full, contracted, excludes);

  let mut working = DiGraph::<ElementId, ()>::new();
  let mut indices: HashMap<ElementId, NodeIndex> = HashMap::new();
  for id in full.vertex_ids().into_iter().filter(|id| !id.is_sentinel()) {
    indices.insert(id, working.add_node(id));
  }
  for entry in full.edge_entries() {
    if excluded_edges.contains(&entry.id) {
      continue;
    }
    if let (Some(&from), Some(&to)) = (indices.get(&entry.source), indices.get(&entry.target)) {
      working.update_edge(from, to, ());
    }
  }

  let distances = floyd_warshall(&working, |_| 1u32)
    .map_err(|_| PlannerError::traversal("negative cycle in unit-weight graph"))?;
  let reachable = |from: ElementId, to: ElementId| -> bool {
    match (indices.get(&from), indices.get(&to)) {
      (Some(a), Some(b)) => distances.get(&(*a, *b)).is_some_and(|d| *d != u32::MAX),
      _ => false,
    }
  };

  let mut candidates: Vec<ElementId> = full
    .vertex_ids()
    .into_iter()
    .filter(|id| !vertices.contains(id))
    .collect();
  for entry in contracted.edge_entries() {
    candidates.retain(|&vertex| {
      let between = reachable(entry.source, vertex) && reachable(vertex, entry.target);
      if between {
        vertices.insert(vertex);
      }
      !between
    });
  }

  debug!(
    vertices = vertices.len(),
    excluded_edges = excluded_edges.len(),
    "all-pairs closure"
  );
  Ok(Closure {
    vertices,
    excluded_edges,
  })
}

fn exclusion_edges<F, C>(
  full: &F,
  contracted: &C,
  excludes: Option<&HashSet<ElementId>>,
) -> HashSet<EdgeId>
where
  F: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  let mut excluded = HashSet::new();

  for &id in excludes.into_iter().flatten() {
    if !full.contains_vertex(id) {
      continue;
    }
    excluded.extend(full.incoming_edges(id).iter().map(|e| e.id));
    excluded.extend(full.outgoing_edges(id).iter().map(|e| e.id));
  }

  for id in contracted.vertex_ids() {
    if contracted.in_degree(id) == 0 {
      excluded.extend(full.incoming_edges(id).iter().map(|e| e.id));
    }
    if contracted.out_degree(id) == 0 {
      excluded.extend(full.outgoing_edges(id).iter().map(|e| e.id));
    }
  }
  excluded
}
