//! Classification of the paths feeding a splice as streamed or accumulated.
//!
//! Ordinal 0 of a splice is its streamed input; every other ordinal is
//! accumulated before the splice runs.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, instrument};

use crate::error::{PlannerError, PlannerResult};
use crate::paths::{GraphPath, paths_through};
use crate::types::{ElementGraph, ElementId, FlowElement};

/// Number of paths arriving at each input ordinal of a splice.
pub type PathCounts = BTreeMap<usize, usize>;

/// Paths from `from` to `to` whose interior holds no boundary or grouping.
pub fn all_direct_paths_between<G: ElementGraph + ?Sized>(
  graph: &G,
  from: ElementId,
  to: ElementId,
) -> Vec<GraphPath> {
  paths_through(graph, from, to, |id| {
    graph
      .element(id)
      .is_none_or(|e| !e.is_boundary() && !e.is_grouping())
  })
}

/// Counts the direct paths from `from` into `splice` per input ordinal.
///
/// The ordinal of a path is the one `splice` declares for the name of the
/// path's last edge. With `skip_intermediate_boundaries`, paths through any
/// boundary other than `from` are not counted.
#[instrument(level = "trace", skip(graph))]
pub fn count_ordered_direct_paths_between<G: ElementGraph + ?Sized>(
  graph: &G,
  from: ElementId,
  splice: ElementId,
  skip_intermediate_boundaries: bool,
) -> PlannerResult<PathCounts> {
  let target = graph
    .element(splice)
    .ok_or(PlannerError::element_not_found(splice))?;
  if !target.is_splice() {
    return Err(PlannerError::NotASplice { element: splice });
  }

  let mut counts = PathCounts::new();
  for path in all_direct_paths_between(graph, from, splice) {
    if skip_intermediate_boundaries && has_intermediate_boundary(graph, &path, from) {
      continue;
    }
    let Some(last) = path.last_edge().and_then(|id| graph.edge(id)) else {
      continue;
    };
    let branch = last.edge.name();
    let ordinal = target
      .ordinal_of(branch)
      .ok_or_else(|| PlannerError::UnknownSpliceBranch {
        element: splice,
        branch: branch.to_string(),
      })?;
    *counts.entry(ordinal).or_default() += 1;
  }

  debug!(from = %from, splice = %splice, ordinals = counts.len(), "counted direct paths");
  Ok(counts)
}

fn has_intermediate_boundary<G: ElementGraph + ?Sized>(
  graph: &G,
  path: &GraphPath,
  from: ElementId,
) -> bool {
  path
    .vertices()
    .iter()
    .filter(|id| **id != from)
    .any(|id| graph.element(*id).is_some_and(FlowElement::is_boundary))
}

/// More than one ordinal is fed, the streamed one among them.
pub fn is_both_streamed_and_accumulated(counts: &PathCounts) -> bool {
  counts.len() > 1 && counts.contains_key(&0)
}

/// Only the streamed ordinal is fed.
pub fn is_only_streamed(counts: &PathCounts) -> bool {
  counts.len() == 1 && counts.contains_key(&0)
}

/// Only accumulated ordinals are fed.
pub fn is_only_accumulated(counts: &PathCounts) -> bool {
  !counts.is_empty() && !counts.contains_key(&0)
}

/// How a source feeds a splice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpliceClassification {
  BothStreamedAndAccumulated,
  OnlyStreamed,
  OnlyAccumulated,
}

impl SpliceClassification {
  /// The single class matching `counts`, or `None` when no path was counted.
  pub fn classify(counts: &PathCounts) -> Option<Self> {
    if is_both_streamed_and_accumulated(counts) {
      Some(Self::BothStreamedAndAccumulated)
    } else if is_only_streamed(counts) {
      Some(Self::OnlyStreamed)
    } else if is_only_accumulated(counts) {
      Some(Self::OnlyAccumulated)
    } else {
      None
    }
  }
}

impl fmt::Display for SpliceClassification {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::BothStreamedAndAccumulated => "both streamed and accumulated",
      Self::OnlyStreamed => "only streamed",
      Self::OnlyAccumulated => "only accumulated",
    };
    f.write_str(s)
  }
}
