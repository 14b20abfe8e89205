//! Error types for flow-graph operations.
//!
//! Every failure surfaced here is fatal to the current planning attempt: the
//! editing operations are not transactional, so a graph that produced one of
//! these errors mid-edit must be discarded.

use crate::types::ElementId;
use thiserror::Error;

/// Result type for flow-graph operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Errors raised by the flow-graph algebra.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlannerError {
  /// An operation referenced an element that is not a vertex of the graph.
  #[error("element {element} is not a vertex of the graph")]
  ElementNotFound { element: ElementId },

  /// The element is already a vertex of the graph.
  #[error("element {element} is already a vertex of the graph")]
  DuplicateElement { element: ElementId },

  /// Adding the edge would introduce a cycle (self loops included).
  #[error("edge {from} -> {to} would create a cycle")]
  CycleDetected { from: ElementId, to: ElementId },

  /// Strict contraction found a number of inbound edges other than one.
  #[error("flow element {element} has multiple input paths: {count}")]
  MultipleInboundPaths { element: ElementId, count: usize },

  /// The union of full and contracted graph has no biconnected components.
  #[error("no biconnected components in the union of full and contracted graph")]
  NoBiconnectedComponents,

  /// A closure computation produced no vertices.
  #[error("closure is empty")]
  EmptyClosure,

  /// Rewiring removed an edge other than the one it was moving.
  #[error("did not remove the expected edge {from} -> {to}")]
  InconsistentEdge { from: ElementId, to: ElementId },

  /// Path counting targeted an element that is not a multi-input node.
  #[error("element {element} is not a splice")]
  NotASplice { element: ElementId },

  /// A path reached a join over an edge whose name is not a declared branch.
  #[error("branch '{branch}' is not declared on splice {element}")]
  UnknownSpliceBranch { element: ElementId, branch: String },

  /// A topological order could not be completed.
  #[error("traversal failed: {reason}")]
  Traversal { reason: String },

  /// A configuration value could not be interpreted.
  #[error("invalid configuration: {reason}")]
  InvalidConfig { reason: String },

  /// A configuration document could not be parsed.
  #[error("invalid configuration document: {0}")]
  Config(#[from] serde_json::Error),
}

impl PlannerError {
  /// Creates an element not found error.
  pub fn element_not_found(element: ElementId) -> Self {
    Self::ElementNotFound { element }
  }

  /// Creates a duplicate element error.
  pub fn duplicate_element(element: ElementId) -> Self {
    Self::DuplicateElement { element }
  }

  /// Creates a cycle detected error for the offending edge.
  pub fn cycle(from: ElementId, to: ElementId) -> Self {
    Self::CycleDetected { from, to }
  }

  /// Creates an inconsistent edge error.
  pub fn inconsistent_edge(from: ElementId, to: ElementId) -> Self {
    Self::InconsistentEdge { from, to }
  }

  /// Creates a traversal error.
  pub fn traversal(reason: impl Into<String>) -> Self {
    Self::Traversal {
      reason: reason.into(),
    }
  }

  /// Creates an invalid configuration error.
  pub fn invalid_config(reason: impl Into<String>) -> Self {
    Self::InvalidConfig {
      reason: reason.into(),
    }
  }

  /// Returns true for errors that indicate drift between the caller's graph
  /// state and what an edit expected, as opposed to a violated precondition.
  pub fn is_internal_inconsistency(&self) -> bool {
    matches!(self, Self::InconsistentEdge { .. })
  }
}
