//! Tests for `ElementSubGraph` and `ElementMaskSubGraph`.

use super::{
  Annotation, ElementGraph, ElementId, ElementMaskSubGraph, ElementSubGraph, FlowElement,
  FlowGraph,
};

/// head -> a -> b -> c -> tail
fn chain() -> (FlowGraph, Vec<ElementId>) {
  let mut graph = FlowGraph::with_extents();
  let ids: Vec<_> = ["a", "b", "c"]
    .into_iter()
    .map(|name| {
      let e = FlowElement::transform(name);
      let id = e.id();
      graph.add_vertex(e);
      id
    })
    .collect();
  graph.connect(ElementId::HEAD, ids[0]).unwrap();
  graph.connect(ids[0], ids[1]).unwrap();
  graph.connect(ids[1], ids[2]).unwrap();
  graph.connect(ids[2], ElementId::TAIL).unwrap();
  (graph, ids)
}

#[test]
fn induced_sub_graph() {
  let (graph, ids) = chain();
  let view = ElementSubGraph::new(&graph, [ids[0], ids[1]]);
  assert_eq!(view.vertex_ids(), vec![ids[0], ids[1]]);
  assert_eq!(view.edge_count(), 1);
  assert_eq!(view.out_degree(ids[1]), 0);
  assert_eq!(view.in_degree(ids[0]), 0);
  assert!(view.element(ids[2]).is_none());
}

#[test]
fn unknown_vertices_are_ignored() {
  let (graph, ids) = chain();
  let stranger = FlowElement::transform("x").id();
  let view = ElementSubGraph::new(&graph, [ids[0], stranger]);
  assert_eq!(view.vertex_count(), 1);
  assert!(!view.contains_vertex(stranger));
}

#[test]
fn edge_restricted_sub_graph() {
  let (graph, ids) = chain();
  let keep = graph.outgoing_edges(ids[0])[0].id;
  let view = ElementSubGraph::with_edges(&graph, ids.clone(), [keep]);
  assert_eq!(view.vertex_count(), 3);
  assert_eq!(view.edge_count(), 1);
  assert!(view.edge(keep).is_some());
  assert!(view.outgoing_edges(ids[1]).is_empty());
  assert!(!view.has_annotations());
}

#[test]
fn mask_hides_sentinels() {
  let (mut graph, ids) = chain();
  graph.annotations_mut().add(Annotation::Source, ids[0]);
  let mask = ElementMaskSubGraph::new(&graph);
  assert_eq!(mask.vertex_ids(), ids);
  assert_eq!(mask.edge_count(), 2);
  assert_eq!(mask.in_degree(ids[0]), 0);
  assert_eq!(mask.out_degree(ids[2]), 0);
  assert!(!mask.contains_vertex(ElementId::HEAD));
  assert!(mask.element(ElementId::TAIL).is_none());
  assert!(mask.has_annotations());
}
