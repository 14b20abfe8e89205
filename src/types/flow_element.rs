//! A vertex of a flow graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::ElementId;

/// An element that carries a name: transforms, boundaries and groupings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedNode {
  id: ElementId,
  name: String,
}

impl NamedNode {
  /// Creates a node with a freshly allocated id.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      id: ElementId::allocate(),
      name: name.into(),
    }
  }

  pub fn id(&self) -> ElementId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

/// A multi-input node.
///
/// `branches[i]` is the name of the upstream branch feeding input ordinal `i`.
/// Ordinal 0 is the streamed input; every other ordinal is accumulated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinNode {
  id: ElementId,
  name: String,
  branches: Vec<String>,
  performs_join: bool,
}

impl JoinNode {
  /// Creates a join node over the given upstream branches, in ordinal order.
  pub fn new<I, S>(name: impl Into<String>, branches: I, performs_join: bool) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      id: ElementId::allocate(),
      name: name.into(),
      branches: branches.into_iter().map(Into::into).collect(),
      performs_join,
    }
  }

  pub fn id(&self) -> ElementId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Upstream branch names in ordinal order.
  pub fn branches(&self) -> &[String] {
    &self.branches
  }

  /// True when this node joins its inputs rather than merging them.
  pub fn performs_join(&self) -> bool {
    self.performs_join
  }

  /// Declared input ordinal for the named upstream branch.
  pub fn ordinal_of(&self, branch: &str) -> Option<usize> {
    self.branches.iter().position(|b| b == branch)
  }
}

/// A vertex of a flow graph.
///
/// Equality and hashing use the element id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FlowElement {
  /// Universal entry sentinel.
  Head,
  /// Universal exit sentinel.
  Tail,
  /// Ordinary pipeline step.
  Transform(NamedNode),
  /// External source or sink.
  Boundary(NamedNode),
  /// Single-input aggregation.
  Grouping(NamedNode),
  /// Multi-input join or merge.
  Join(JoinNode),
}

impl FlowElement {
  pub fn transform(name: impl Into<String>) -> Self {
    FlowElement::Transform(NamedNode::new(name))
  }

  pub fn boundary(name: impl Into<String>) -> Self {
    FlowElement::Boundary(NamedNode::new(name))
  }

  pub fn grouping(name: impl Into<String>) -> Self {
    FlowElement::Grouping(NamedNode::new(name))
  }

  /// A join node that performs an actual join over `branches`.
  pub fn join<I, S>(name: impl Into<String>, branches: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    FlowElement::Join(JoinNode::new(name, branches, true))
  }

  /// A join node that only merges `branches`.
  pub fn merge<I, S>(name: impl Into<String>, branches: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    FlowElement::Join(JoinNode::new(name, branches, false))
  }

  pub fn id(&self) -> ElementId {
    match self {
      FlowElement::Head => ElementId::HEAD,
      FlowElement::Tail => ElementId::TAIL,
      FlowElement::Transform(n) | FlowElement::Boundary(n) | FlowElement::Grouping(n) => n.id(),
      FlowElement::Join(j) => j.id(),
    }
  }

  /// Display name; sentinels are named `head` and `tail`.
  pub fn name(&self) -> &str {
    match self {
      FlowElement::Head => "head",
      FlowElement::Tail => "tail",
      FlowElement::Transform(n) | FlowElement::Boundary(n) | FlowElement::Grouping(n) => n.name(),
      FlowElement::Join(j) => j.name(),
    }
  }

  pub fn is_sentinel(&self) -> bool {
    matches!(self, FlowElement::Head | FlowElement::Tail)
  }

  pub fn is_transform(&self) -> bool {
    matches!(self, FlowElement::Transform(_))
  }

  pub fn is_boundary(&self) -> bool {
    matches!(self, FlowElement::Boundary(_))
  }

  pub fn is_grouping(&self) -> bool {
    matches!(self, FlowElement::Grouping(_))
  }

  /// Groupings and joins: nodes whose incoming edge ordinals are meaningful.
  pub fn is_splice(&self) -> bool {
    matches!(self, FlowElement::Grouping(_) | FlowElement::Join(_))
  }

  pub fn is_multi_input(&self) -> bool {
    matches!(self, FlowElement::Join(_))
  }

  /// True only for a join node that performs an actual join.
  pub fn performs_join(&self) -> bool {
    matches!(self, FlowElement::Join(j) if j.performs_join())
  }

  pub fn as_join(&self) -> Option<&JoinNode> {
    match self {
      FlowElement::Join(j) => Some(j),
      _ => None,
    }
  }

  /// Input ordinal of `branch` at this splice. A grouping has a single input.
  pub fn ordinal_of(&self, branch: &str) -> Option<usize> {
    match self {
      FlowElement::Grouping(_) => Some(0),
      FlowElement::Join(j) => j.ordinal_of(branch),
      _ => None,
    }
  }
}

impl PartialEq for FlowElement {
  fn eq(&self, other: &Self) -> bool {
    self.id() == other.id()
  }
}

impl Eq for FlowElement {}

impl Hash for FlowElement {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id().hash(state);
  }
}

impl fmt::Display for FlowElement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FlowElement::Head | FlowElement::Tail => write!(f, "[{}]", self.name()),
      FlowElement::Transform(n) => write!(f, "Transform({})", n.name()),
      FlowElement::Boundary(n) => write!(f, "Boundary({})", n.name()),
      FlowElement::Grouping(n) => write!(f, "Grouping({})", n.name()),
      FlowElement::Join(j) if j.performs_join() => write!(f, "Join({})", j.name()),
      FlowElement::Join(j) => write!(f, "Merge({})", j.name()),
    }
  }
}
