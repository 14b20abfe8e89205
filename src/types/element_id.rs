//! Identity of a vertex in a flow graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// First id handed out to non-sentinel elements.
const FIRST_ELEMENT_ID: u64 = 2;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(FIRST_ELEMENT_ID);

/// Process-wide identity of a flow element.
///
/// Two elements are the same vertex iff their ids are equal, regardless of
/// name. The same id may appear as a vertex of several graphs (a full graph
/// and the contracted graph derived from it).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
  /// Id of the `Head` sentinel.
  pub const HEAD: ElementId = ElementId(0);
  /// Id of the `Tail` sentinel.
  pub const TAIL: ElementId = ElementId(1);

  /// Allocates a fresh id, never equal to any previously allocated one.
  pub fn allocate() -> Self {
    ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
  }

  /// Returns true for the `Head` and `Tail` ids.
  pub fn is_sentinel(self) -> bool {
    self == Self::HEAD || self == Self::TAIL
  }

  /// Returns the raw id value.
  pub fn value(self) -> u64 {
    self.0
  }
}

impl fmt::Display for ElementId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::HEAD => write!(f, "head"),
      Self::TAIL => write!(f, "tail"),
      ElementId(n) => write!(f, "#{}", n),
    }
  }
}

impl fmt::Debug for ElementId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ElementId({})", self)
  }
}
