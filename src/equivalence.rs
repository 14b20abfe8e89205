//! Order-insensitive hashing and equality of flow graphs.
//!
//! Vertices are compared by identity. Edges of the two graphs are matched by
//! value (name, ordinal, non-blocking flag) and endpoints, with weights
//! compared within [`WEIGHT_TOLERANCE`]. Parallel edges are matched as a
//! multiset.

use std::collections::{HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::{instrument, trace};

use crate::types::{ElementGraph, ElementId, FlowEdge};

/// Largest weight difference under which two edges are still equal.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

fn hash_of<T: Hash + ?Sized>(value: &T) -> i64 {
  let mut hasher = DefaultHasher::new();
  value.hash(&mut hasher);
  hasher.finish() as i64
}

/// Triangular pairing of two hashes.
fn pairing(a: i64, b: i64) -> i64 {
  let sum = a.wrapping_add(b);
  sum
    .wrapping_mul(sum.wrapping_add(1))
    .wrapping_div(2)
    .wrapping_add(b)
}

/// Weight truncated to an integer and folded to 32 bits.
fn folded_weight(weight: f64) -> i64 {
  let bits = weight as i64;
  i64::from((bits ^ ((bits as u64) >> 32) as i64) as i32)
}

/// Hash that is stable under vertex and edge reordering.
///
/// Graphs equal under [`equals_ignoring_annotations`] hash alike unless
/// their weights straddle an integer boundary within the tolerance.
#[instrument(level = "trace", skip(graph))]
pub fn structural_hash<G: ElementGraph + ?Sized>(graph: &G) -> i64 {
  let mut hash = graph
    .elements()
    .into_iter()
    .fold(0i64, |acc, element| acc.wrapping_add(hash_of(element)));

  for entry in graph.edge_entries() {
    let source = graph.element(entry.source).map_or(0, hash_of);
    let target = graph.element(entry.target).map_or(0, hash_of);
    let mut part = hash_of(entry.edge);
    part = part.wrapping_mul(27).wrapping_add(pairing(source, target));
    part = part
      .wrapping_mul(27)
      .wrapping_add(folded_weight(entry.edge.weight()));
    hash = hash.wrapping_add(part);
  }
  hash
}

/// Structural equality: same vertices, same edges, weights within tolerance.
#[instrument(level = "trace", skip(lhs, rhs))]
pub fn equals_ignoring_annotations<L, R>(lhs: &L, rhs: &R) -> bool
where
  L: ElementGraph + ?Sized,
  R: ElementGraph + ?Sized,
{
  let lhs_vertices: HashSet<ElementId> = lhs.vertex_ids().into_iter().collect();
  let rhs_vertices: HashSet<ElementId> = rhs.vertex_ids().into_iter().collect();
  if lhs_vertices != rhs_vertices {
    trace!("vertex sets differ");
    return false;
  }

  let rhs_edges = rhs.edge_entries();
  if lhs.edge_count() != rhs_edges.len() {
    trace!("edge counts differ");
    return false;
  }

  let mut unmatched: HashMap<(ElementId, ElementId), Vec<&FlowEdge>> = HashMap::new();
  for entry in &rhs_edges {
    unmatched
      .entry((entry.source, entry.target))
      .or_default()
      .push(entry.edge);
  }

  for entry in lhs.edge_entries() {
    let Some(candidates) = unmatched.get_mut(&(entry.source, entry.target)) else {
      return false;
    };
    let found = candidates.iter().position(|candidate| {
      *candidate == entry.edge
        && (candidate.weight() - entry.edge.weight()).abs() <= WEIGHT_TOLERANCE
    });
    match found {
      Some(index) => {
        candidates.swap_remove(index);
      }
      None => {
        trace!(source = %entry.source, target = %entry.target, "no matching edge");
        return false;
      }
    }
  }
  true
}

/// Structural equality plus annotation equality.
///
/// If neither graph carries annotations structure alone decides; if only one
/// does, the graphs differ.
pub fn equals<L, R>(lhs: &L, rhs: &R) -> bool
where
  L: ElementGraph + ?Sized,
  R: ElementGraph + ?Sized,
{
  if !equals_ignoring_annotations(lhs, rhs) {
    return false;
  }
  match (lhs.has_annotations(), rhs.has_annotations()) {
    (false, false) => true,
    (true, true) => lhs.annotations() == rhs.annotations(),
    _ => false,
  }
}

/// An owned graph keyed by shape, for caches of planner artifacts.
#[derive(Debug, Clone)]
pub struct GraphShape<G: ElementGraph>(G);

impl<G: ElementGraph> GraphShape<G> {
  pub fn new(graph: G) -> Self {
    Self(graph)
  }

  pub fn graph(&self) -> &G {
    &self.0
  }

  pub fn into_inner(self) -> G {
    self.0
  }
}

impl<G: ElementGraph> PartialEq for GraphShape<G> {
  fn eq(&self, other: &Self) -> bool {
    equals(&self.0, &other.0)
  }
}

impl<G: ElementGraph> Eq for GraphShape<G> {}

impl<G: ElementGraph> Hash for GraphShape<G> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_i64(structural_hash(&self.0));
  }
}
