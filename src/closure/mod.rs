//! Closure extraction: the detailed region of a full graph implied by a
//! coarser contracted graph.
//!
//! A contracted graph's vertices are a subset of the full graph's and mark
//! the boundary of a region of interest. Three interchangeable algorithms
//! compute the closure; the all-pairs variant is the default because it is the
//! only one that also reports which edges to prune from the resulting view.

mod biconnected;
mod floyd_warshall;
mod k_shortest;

use std::collections::HashSet;

use tracing::{info, instrument};

pub use biconnected::find_closure_via_biconnected;
pub use floyd_warshall::find_closure_via_floyd_warshall;
pub use k_shortest::find_closure_via_k_shortest;

use crate::config::{ClosureAlgorithm, PlannerConfig};
use crate::error::PlannerResult;
use crate::types::{EdgeId, ElementGraph, ElementId, ElementMaskSubGraph, ElementSubGraph};

/// Vertices of a closure and the full-graph edges pruned while computing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
  pub vertices: HashSet<ElementId>,
  pub excluded_edges: HashSet<EdgeId>,
}

/// View of `full` over its all-pairs closure against `contracted`.
///
/// When `full` is bounded by `Head`, the sentinels and their edges are left
/// out. Edges pruned by the closure are left out as well.
#[instrument(level = "trace", skip(full, contracted, excludes))]
pub fn as_sub_graph<'g, G, C>(
  full: &'g G,
  contracted: &C,
  excludes: Option<&HashSet<ElementId>>,
) -> PlannerResult<ElementSubGraph<'g, G>>
where
  G: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  let masked = full.contains_vertex(ElementId::HEAD);
  let closure = if masked {
    find_closure_via_floyd_warshall(&ElementMaskSubGraph::new(full), contracted, excludes)?
  } else {
    find_closure_via_floyd_warshall(full, contracted, excludes)?
  };

  let edges: Vec<EdgeId> = full
    .edge_entries()
    .into_iter()
    .filter(|e| !masked || (!e.source.is_sentinel() && !e.target.is_sentinel()))
    .filter(|e| !closure.excluded_edges.contains(&e.id))
    .map(|e| e.id)
    .collect();
  let vertices = closure
    .vertices
    .into_iter()
    .filter(|id| !masked || !id.is_sentinel());

  Ok(ElementSubGraph::with_edges(full, vertices, edges))
}

/// Induced view of `full` over its biconnected closure against `contracted`.
pub fn as_sub_graph_biconnected<'g, G, C>(
  full: &'g G,
  contracted: &C,
) -> PlannerResult<ElementSubGraph<'g, G>>
where
  G: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  let vertices = find_closure_via_biconnected(full, contracted)?;
  Ok(ElementSubGraph::new(full, vertices))
}

/// Induced view of `full` over its path-enumeration closure against
/// `contracted`.
pub fn as_sub_graph_k_shortest<'g, G, C>(full: &'g G, contracted: &C) -> ElementSubGraph<'g, G>
where
  G: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  ElementSubGraph::new(full, find_closure_via_k_shortest(full, contracted))
}

/// Closure view computed with the algorithm chosen by `config`.
///
/// `excludes` only applies to [`ClosureAlgorithm::AllPairs`].
pub fn closure_sub_graph<'g, G, C>(
  full: &'g G,
  contracted: &C,
  excludes: Option<&HashSet<ElementId>>,
  config: &PlannerConfig,
) -> PlannerResult<ElementSubGraph<'g, G>>
where
  G: ElementGraph + ?Sized,
  C: ElementGraph + ?Sized,
{
  let view = match config.closure_algorithm {
    ClosureAlgorithm::AllPairs => as_sub_graph(full, contracted, excludes)?,
    ClosureAlgorithm::Biconnected => as_sub_graph_biconnected(full, contracted)?,
    ClosureAlgorithm::KShortest => as_sub_graph_k_shortest(full, contracted),
  };
  info!(
    algorithm = %config.closure_algorithm,
    vertices = view.vertex_count(),
    edges = view.edge_count(),
    "closure sub-graph"
  );
  Ok(view)
}
