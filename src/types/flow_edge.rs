//! An edge in a flow graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Default weight of a flow edge.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// An edge in a flow graph.
///
/// Equality and hashing cover `name`, `ordinal` and `non_blocking`. The weight
/// is compared with a tolerance by the equivalence engine, and prior names are
/// bookkeeping that never makes two edges different.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
  name: String,
  ordinal: usize,
  non_blocking: bool,
  weight: f64,
  prior_names: BTreeSet<String>,
}

impl FlowEdge {
  /// A non-blocking edge at ordinal 0 with the default weight.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ordinal: 0,
      non_blocking: true,
      weight: DEFAULT_EDGE_WEIGHT,
      prior_names: BTreeSet::new(),
    }
  }

  /// A fresh edge carrying `other`'s name, ordinal, flag and weight.
  ///
  /// Prior names are not copied.
  pub fn derived_from(other: &FlowEdge) -> Self {
    Self {
      name: other.name.clone(),
      ordinal: other.ordinal,
      non_blocking: other.non_blocking,
      weight: other.weight,
      prior_names: BTreeSet::new(),
    }
  }

  pub fn with_ordinal(mut self, ordinal: usize) -> Self {
    self.ordinal = ordinal;
    self
  }

  pub fn with_non_blocking(mut self, non_blocking: bool) -> Self {
    self.non_blocking = non_blocking;
    self
  }

  pub fn with_weight(mut self, weight: f64) -> Self {
    self.weight = weight;
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Input position at the downstream node.
  pub fn ordinal(&self) -> usize {
    self.ordinal
  }

  pub fn set_ordinal(&mut self, ordinal: usize) {
    self.ordinal = ordinal;
  }

  /// Whether data may stream through without full materialization.
  pub fn is_non_blocking(&self) -> bool {
    self.non_blocking
  }

  pub fn set_non_blocking(&mut self, non_blocking: bool) {
    self.non_blocking = non_blocking;
  }

  pub fn weight(&self) -> f64 {
    self.weight
  }

  /// Names of edges merged into this one by contraction.
  pub fn prior_names(&self) -> &BTreeSet<String> {
    &self.prior_names
  }

  /// Records the names of the given edges (one level, not their prior names).
  pub fn add_prior_names<'a>(&mut self, edges: impl IntoIterator<Item = &'a FlowEdge>) {
    for edge in edges {
      self.prior_names.insert(edge.name.clone());
    }
  }
}

impl PartialEq for FlowEdge {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
      && self.ordinal == other.ordinal
      && self.non_blocking == other.non_blocking
  }
}

impl Eq for FlowEdge {}

impl Hash for FlowEdge {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.name.hash(state);
    self.ordinal.hash(state);
    self.non_blocking.hash(state);
  }
}
