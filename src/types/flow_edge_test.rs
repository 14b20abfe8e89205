//! Tests for `FlowEdge`.

use super::{DEFAULT_EDGE_WEIGHT, FlowEdge};

#[test]
fn new_edge_defaults() {
  let e = FlowEdge::new("lhs");
  assert_eq!(e.name(), "lhs");
  assert_eq!(e.ordinal(), 0);
  assert!(e.is_non_blocking());
  assert_eq!(e.weight(), DEFAULT_EDGE_WEIGHT);
  assert!(e.prior_names().is_empty());
}

#[test]
fn equality_ignores_weight_and_prior_names() {
  let mut a = FlowEdge::new("x").with_weight(3.0);
  a.add_prior_names([&FlowEdge::new("y")]);
  let b = FlowEdge::new("x");
  assert_eq!(a, b);
  assert_ne!(b, FlowEdge::new("x").with_ordinal(1));
  assert_ne!(b, FlowEdge::new("x").with_non_blocking(false));
}

#[test]
fn derived_edge_does_not_copy_prior_names() {
  let mut original = FlowEdge::new("out").with_ordinal(2).with_non_blocking(false);
  original.add_prior_names([&FlowEdge::new("older")]);
  let derived = FlowEdge::derived_from(&original);
  assert_eq!(derived, original);
  assert!(derived.prior_names().is_empty());
}

#[test]
fn prior_names_are_one_level() {
  let mut inner = FlowEdge::new("inner");
  inner.add_prior_names([&FlowEdge::new("deep")]);
  let mut merged = FlowEdge::new("merged");
  merged.add_prior_names([&inner, &FlowEdge::new("outer")]);
  let names: Vec<_> = merged.prior_names().iter().map(String::as_str).collect();
  assert_eq!(names, vec!["inner", "outer"]);
}
