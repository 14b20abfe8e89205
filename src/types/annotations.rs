//! Annotation decoration attached to a flow graph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::ElementId;

/// Planner tags attached to vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
  /// Vertex consumes its input as a stream.
  Streamed,
  /// Vertex buffers its input before consuming it.
  Accumulated,
  /// Vertex is a source of the enclosing sub-graph.
  Source,
  /// Vertex is a sink of the enclosing sub-graph.
  Sink,
}

impl fmt::Display for Annotation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Annotation::Streamed => write!(f, "streamed"),
      Annotation::Accumulated => write!(f, "accumulated"),
      Annotation::Source => write!(f, "source"),
      Annotation::Sink => write!(f, "sink"),
    }
  }
}

/// Mapping from annotation key to the vertices carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
  keys: BTreeMap<Annotation, BTreeSet<ElementId>>,
}

impl Annotations {
  pub fn new() -> Self {
    Self::default()
  }

  /// Tags `element` with `key`. Returns false if it was already tagged.
  pub fn add(&mut self, key: Annotation, element: ElementId) -> bool {
    self.keys.entry(key).or_default().insert(element)
  }

  /// Vertices carrying `key`.
  pub fn values_for(&self, key: Annotation) -> BTreeSet<ElementId> {
    self.keys.get(&key).cloned().unwrap_or_default()
  }

  /// Keys carried by `element`.
  pub fn keys_for(&self, element: ElementId) -> BTreeSet<Annotation> {
    self
      .keys
      .iter()
      .filter(|(_, elements)| elements.contains(&element))
      .map(|(key, _)| *key)
      .collect()
  }

  /// Drops every tag of `element`, discarding keys left without vertices.
  pub fn remove_element(&mut self, element: ElementId) {
    for elements in self.keys.values_mut() {
      elements.remove(&element);
    }
    self.keys.retain(|_, elements| !elements.is_empty());
  }

  /// True when no vertex carries any key.
  pub fn is_empty(&self) -> bool {
    self.keys.values().all(BTreeSet::is_empty)
  }
}
