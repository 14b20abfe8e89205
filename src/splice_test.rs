//! Tests for `splice`.

use crate::error::PlannerError;
use crate::splice::{
  PathCounts, SpliceClassification, all_direct_paths_between, count_ordered_direct_paths_between,
  is_both_streamed_and_accumulated, is_only_accumulated, is_only_streamed,
};
use crate::types::{ElementId, FlowEdge, FlowElement, FlowGraph};

fn add(graph: &mut FlowGraph, element: FlowElement) -> ElementId {
  let id = element.id();
  graph.add_vertex(element);
  id
}

/// src -> lhs -> join, src -> rhs -> join, with `lhs` at ordinal 0.
struct SelfJoin {
  graph: FlowGraph,
  src: ElementId,
  lhs: ElementId,
  rhs: ElementId,
  join: ElementId,
}

fn self_join() -> SelfJoin {
  let mut graph = FlowGraph::new();
  let src = add(&mut graph, FlowElement::boundary("src"));
  let lhs = add(&mut graph, FlowElement::transform("lhs"));
  let rhs = add(&mut graph, FlowElement::transform("rhs"));
  let join = add(&mut graph, FlowElement::join("join", ["lhs", "rhs"]));
  graph.connect(src, lhs).unwrap();
  graph.connect(src, rhs).unwrap();
  graph
    .add_edge(lhs, join, FlowEdge::new("lhs").with_ordinal(0))
    .unwrap();
  graph
    .add_edge(rhs, join, FlowEdge::new("rhs").with_ordinal(1))
    .unwrap();
  SelfJoin {
    graph,
    src,
    lhs,
    rhs,
    join,
  }
}

#[test]
fn counts_paths_per_ordinal() {
  let s = self_join();
  let counts = count_ordered_direct_paths_between(&s.graph, s.src, s.join, false).unwrap();
  assert_eq!(counts, PathCounts::from([(0, 1), (1, 1)]));
  assert!(is_both_streamed_and_accumulated(&counts));
  assert_eq!(
    SpliceClassification::classify(&counts),
    Some(SpliceClassification::BothStreamedAndAccumulated)
  );
}

#[test]
fn single_branch_classifications() {
  let s = self_join();
  let streamed = count_ordered_direct_paths_between(&s.graph, s.lhs, s.join, false).unwrap();
  assert_eq!(streamed, PathCounts::from([(0, 1)]));
  assert!(is_only_streamed(&streamed));

  let accumulated = count_ordered_direct_paths_between(&s.graph, s.rhs, s.join, false).unwrap();
  assert_eq!(accumulated, PathCounts::from([(1, 1)]));
  assert!(is_only_accumulated(&accumulated));
  assert_eq!(
    SpliceClassification::classify(&accumulated),
    Some(SpliceClassification::OnlyAccumulated)
  );
}

#[test]
fn predicates_are_exclusive() {
  let cases = [
    PathCounts::from([(0, 2)]),
    PathCounts::from([(1, 1), (2, 3)]),
    PathCounts::from([(0, 1), (3, 1)]),
  ];
  for counts in &cases {
    let matched = [
      is_both_streamed_and_accumulated(counts),
      is_only_streamed(counts),
      is_only_accumulated(counts),
    ];
    assert_eq!(matched.iter().filter(|m| **m).count(), 1, "{counts:?}");
  }
  assert_eq!(SpliceClassification::classify(&PathCounts::new()), None);
}

#[test]
fn direct_paths_stop_at_groupings_and_boundaries() {
  let mut graph = FlowGraph::new();
  let src = add(&mut graph, FlowElement::boundary("src"));
  let group = add(&mut graph, FlowElement::grouping("group"));
  let step = add(&mut graph, FlowElement::transform("step"));
  let join = add(&mut graph, FlowElement::join("join", ["group", "step"]));
  graph.connect(src, group).unwrap();
  graph.connect(src, step).unwrap();
  graph.connect(group, join).unwrap();
  graph
    .add_edge(step, join, FlowEdge::new("step").with_ordinal(1))
    .unwrap();

  let paths = all_direct_paths_between(&graph, src, join);
  assert_eq!(paths.len(), 1);
  assert_eq!(paths[0].interior(), &[step]);
}

#[test]
fn boundary_paths_and_skip_flag() {
  let mut graph = FlowGraph::new();
  let src = add(&mut graph, FlowElement::transform("src"));
  let tap = add(&mut graph, FlowElement::boundary("tap"));
  let group = add(&mut graph, FlowElement::grouping("group"));
  graph.connect(src, tap).unwrap();
  graph.connect(tap, group).unwrap();
  graph.connect(src, group).unwrap();

  let all = count_ordered_direct_paths_between(&graph, src, group, false).unwrap();
  assert_eq!(all, PathCounts::from([(0, 1)]));

  let from_tap = count_ordered_direct_paths_between(&graph, tap, group, true).unwrap();
  assert_eq!(from_tap, PathCounts::from([(0, 1)]));
}

#[test]
fn rejects_non_splice_target() {
  let s = self_join();
  let err = count_ordered_direct_paths_between(&s.graph, s.src, s.lhs, false).unwrap_err();
  assert!(matches!(err, PlannerError::NotASplice { element } if element == s.lhs));
}

#[test]
fn rejects_undeclared_branch() {
  let mut graph = FlowGraph::new();
  let src = add(&mut graph, FlowElement::boundary("src"));
  let join = add(&mut graph, FlowElement::join("join", ["lhs", "rhs"]));
  graph.connect(src, join).unwrap();

  let err = count_ordered_direct_paths_between(&graph, src, join, false).unwrap_err();
  assert!(matches!(
    err,
    PlannerError::UnknownSpliceBranch { ref branch, .. } if branch == "src"
  ));
}

#[test]
fn unrelated_fan_out_does_not_affect_counts() {
  // src -> join, plus 30 chained diamonds hanging off src
  let mut graph = FlowGraph::new();
  let src = add(&mut graph, FlowElement::transform("src"));
  let join = add(&mut graph, FlowElement::join("join", ["src", "other"]));
  graph.connect(src, join).unwrap();
  let mut tip = src;
  for i in 0..30 {
    let lhs = add(&mut graph, FlowElement::transform(format!("l{i}")));
    let rhs = add(&mut graph, FlowElement::transform(format!("r{i}")));
    let merge = add(&mut graph, FlowElement::transform(format!("m{i}")));
    graph.connect(tip, lhs).unwrap();
    graph.connect(tip, rhs).unwrap();
    graph.connect(lhs, merge).unwrap();
    graph.connect(rhs, merge).unwrap();
    tip = merge;
  }

  let counts = count_ordered_direct_paths_between(&graph, src, join, false).unwrap();
  assert_eq!(counts, PathCounts::from([(0, 1)]));
  assert!(is_only_streamed(&counts));
}
