//! End-to-end checks of the flow-graph algebra on small planner-shaped graphs:
//! contraction, equality, closure agreement, splice classification and branch
//! removal, driven only through the public API.

use std::sync::Once;

use streamweave_flowgraph::closure::{
  closure_sub_graph, find_closure_via_floyd_warshall, find_closure_via_k_shortest,
};
use streamweave_flowgraph::editing::{
  insert_element_after, remove_and_contract, remove_branch_containing,
};
use streamweave_flowgraph::equivalence::{equals, equals_ignoring_annotations, structural_hash};
use streamweave_flowgraph::splice::{SpliceClassification, count_ordered_direct_paths_between};
use streamweave_flowgraph::traversal::{find_sinks, find_sources, topological_order};
use streamweave_flowgraph::{
  ClosureAlgorithm, ElementGraph, ElementId, FlowEdge, FlowElement, FlowGraph, PlannerConfig,
};

static TRACING: Once = Once::new();

fn init_tracing() {
  TRACING.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_test_writer()
      .with_max_level(tracing::Level::TRACE)
      .try_init();
  });
}

fn add(graph: &mut FlowGraph, element: FlowElement) -> ElementId {
  let id = element.id();
  graph.add_vertex(element);
  id
}

/// head -> lhs_in -> parse -> join <- rhs_in <- head, join -> out -> tail
struct JoinPlan {
  graph: FlowGraph,
  lhs_in: ElementId,
  rhs_in: ElementId,
  parse: ElementId,
  join: ElementId,
  out: ElementId,
}

fn join_plan() -> JoinPlan {
  let mut graph = FlowGraph::with_extents();
  let lhs_in = add(&mut graph, FlowElement::boundary("lhs_in"));
  let rhs_in = add(&mut graph, FlowElement::boundary("rhs_in"));
  let parse = add(&mut graph, FlowElement::transform("parse"));
  let join = add(&mut graph, FlowElement::join("join", ["parse", "rhs_in"]));
  let out = add(&mut graph, FlowElement::boundary("out"));
  graph.connect(ElementId::HEAD, lhs_in).unwrap();
  graph.connect(ElementId::HEAD, rhs_in).unwrap();
  graph.connect(lhs_in, parse).unwrap();
  graph.connect(parse, join).unwrap();
  graph
    .add_edge(
      rhs_in,
      join,
      FlowEdge::new("rhs_in")
        .with_ordinal(1)
        .with_non_blocking(false),
    )
    .unwrap();
  graph.connect(join, out).unwrap();
  graph.connect(out, ElementId::TAIL).unwrap();
  JoinPlan {
    graph,
    lhs_in,
    rhs_in,
    parse,
    join,
    out,
  }
}

#[test]
fn contracting_a_chain_link_rewires_its_neighbours() {
  init_tracing();
  let mut plan = join_plan();
  let vertices = plan.graph.vertex_count();
  let edges = plan.graph.edge_count();

  remove_and_contract(&mut plan.graph, plan.parse).unwrap();

  assert_eq!(plan.graph.vertex_count(), vertices - 1);
  // two edges through the removed element become one
  assert_eq!(plan.graph.edge_count(), edges - 1);
  let rewired = plan.graph.outgoing_edges(plan.lhs_in);
  assert_eq!(rewired.len(), 1);
  assert_eq!(rewired[0].target, plan.join);
  assert!(topological_order(&plan.graph).is_ok());
}

#[test]
fn equality_tolerates_tiny_weight_drift() {
  let plan = join_plan();
  assert!(equals_ignoring_annotations(&plan.graph, &plan.graph));

  let mut near = plan.graph.clone();
  let id = near.outgoing_edges(plan.lhs_in)[0].id;
  let weight = near.edge(id).unwrap().edge.weight();
  if let Some(edge) = near.edge_mut(id) {
    *edge = edge.clone().with_weight(weight + 1e-7);
  }
  assert!(equals_ignoring_annotations(&plan.graph, &near));
  assert!(equals(&plan.graph, &near));

  let mut far = plan.graph.clone();
  if let Some(edge) = far.edge_mut(id) {
    *edge = edge.clone().with_weight(weight + 1e-3);
  }
  assert!(!equals_ignoring_annotations(&plan.graph, &far));
}

#[test]
fn insert_after_then_contract_restores_the_plan() {
  init_tracing();
  let mut plan = join_plan();
  let original = plan.graph.clone();
  let check = FlowElement::transform("check");
  let check_id = check.id();

  insert_element_after(&mut plan.graph, plan.parse, check).unwrap();
  remove_and_contract(&mut plan.graph, check_id).unwrap();

  assert!(equals_ignoring_annotations(&plan.graph, &original));
  assert_eq!(structural_hash(&plan.graph), structural_hash(&original));
}

#[test]
fn join_inputs_classify_by_ordinal() {
  let plan = join_plan();
  let from_lhs =
    count_ordered_direct_paths_between(&plan.graph, plan.lhs_in, plan.join, false).unwrap();
  assert_eq!(
    SpliceClassification::classify(&from_lhs),
    Some(SpliceClassification::OnlyStreamed)
  );

  let from_rhs =
    count_ordered_direct_paths_between(&plan.graph, plan.rhs_in, plan.join, false).unwrap();
  assert_eq!(
    SpliceClassification::classify(&from_rhs),
    Some(SpliceClassification::OnlyAccumulated)
  );

  let from_head =
    count_ordered_direct_paths_between(&plan.graph, ElementId::HEAD, plan.join, false).unwrap();
  assert_eq!(
    SpliceClassification::classify(&from_head),
    None,
    "paths from head cross boundaries"
  );
}

#[test]
fn self_join_is_both_streamed_and_accumulated() {
  let mut graph = FlowGraph::new();
  let src = add(&mut graph, FlowElement::boundary("src"));
  let lhs = add(&mut graph, FlowElement::transform("lhs"));
  let rhs = add(&mut graph, FlowElement::transform("rhs"));
  let join = add(&mut graph, FlowElement::join("join", ["lhs", "rhs"]));
  graph.connect(src, lhs).unwrap();
  graph.connect(src, rhs).unwrap();
  graph.connect(lhs, join).unwrap();
  graph
    .add_edge(rhs, join, FlowEdge::new("rhs").with_ordinal(1))
    .unwrap();

  let counts = count_ordered_direct_paths_between(&graph, src, join, true).unwrap();
  assert_eq!(
    SpliceClassification::classify(&counts),
    Some(SpliceClassification::BothStreamedAndAccumulated)
  );
}

#[test]
fn closures_agree_on_unambiguous_region() {
  init_tracing();
  let plan = join_plan();
  let mut contracted = FlowGraph::new();
  for id in [plan.lhs_in, plan.join] {
    contracted.add_vertex(plan.graph.element(id).cloned().unwrap());
  }
  contracted.connect(plan.lhs_in, plan.join).unwrap();

  let all_pairs = find_closure_via_floyd_warshall(&plan.graph, &contracted, None).unwrap();
  let k_shortest = find_closure_via_k_shortest(&plan.graph, &contracted);
  assert_eq!(all_pairs.vertices, k_shortest);
  assert!(k_shortest.contains(&plan.parse));
  assert!(!k_shortest.contains(&plan.rhs_in));

  let config = PlannerConfig {
    closure_algorithm: ClosureAlgorithm::AllPairs,
    ..PlannerConfig::default()
  };
  let view = closure_sub_graph(&plan.graph, &contracted, None, &config).unwrap();
  assert_eq!(find_sources(&view), vec![plan.lhs_in]);
  assert!(find_sinks(&view).is_empty());
  assert_eq!(view.edge_count(), 2);
}

#[test]
fn branch_removal_on_bounded_chain() {
  let mut graph = FlowGraph::with_extents();
  let a = add(&mut graph, FlowElement::transform("a"));
  let b = add(&mut graph, FlowElement::transform("b"));
  let c = add(&mut graph, FlowElement::transform("c"));
  graph.connect(ElementId::HEAD, a).unwrap();
  graph.connect(a, b).unwrap();
  graph.connect(b, c).unwrap();
  graph.connect(c, ElementId::TAIL).unwrap();

  assert!(remove_branch_containing(&mut graph, b).unwrap());
  assert_eq!(graph.vertex_ids(), vec![ElementId::HEAD, ElementId::TAIL]);
  assert_eq!(graph.edge_count(), 0);
}

#[test]
fn branch_removal_at_branch_point_removes_only_it() {
  let mut plan = join_plan();
  let before = plan.graph.vertex_count();
  assert!(remove_branch_containing(&mut plan.graph, plan.join).unwrap());
  assert_eq!(plan.graph.vertex_count(), before - 1);
  assert!(!plan.graph.contains_vertex(plan.join));
  assert!(plan.graph.contains_vertex(plan.out));
  assert!(plan.graph.contains_vertex(plan.parse));
}
