//! Closure via path enumeration.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::paths::paths_through;
use crate::types::{ElementGraph, ElementId};

/// Paths enumerated for a single contracted edge above which a warning is
/// logged.
const PATH_WARN_THRESHOLD: usize = 10_000;

/// Vertex closure of `contracted` over `full` from every path between the
/// endpoints of each contracted edge.
///
/// A path that passes through any other contracted vertex is rejected. Cost
/// grows with the number of paths, so this is a fallback and cross-check for
/// the all-pairs closure rather than a default.
#[instrument(level = "trace", skip(full, contracted))]
pub fn find_closure_via_k_shortest<F, C>(full: &F, contracted: &C) -> HashSet<ElementId>
where
  F: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  let contracted_vertices: HashSet<ElementId> = contracted.vertex_ids().into_iter().collect();
  let mut vertices = contracted_vertices.clone();

  for entry in contracted.edge_entries() {
    let (lhs, rhs) = (entry.source, entry.target);
    // paths crossing another contracted vertex are never walked
    let paths = paths_through(full, lhs, rhs, |v| !contracted_vertices.contains(&v));
    if paths.len() > PATH_WARN_THRESHOLD {
      warn!(from = %lhs, to = %rhs, paths = paths.len(), "large path enumeration");
    }
    for path in paths {
      vertices.extend(path.vertices().iter().copied());
    }
  }

  debug!(vertices = vertices.len(), "k-shortest closure");
  vertices
}
