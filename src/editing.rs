//! Structural edits of a flow graph: contraction, insertion, replacement and
//! chain removal.
//!
//! None of these edits are transactional. On error the graph may hold a
//! partial edit and should be discarded.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::config::{ContractionMode, PlannerConfig};
use crate::error::{PlannerError, PlannerResult};
use crate::types::{EdgeId, ElementGraph, ElementId, FlowEdge, FlowElement, FlowGraph};

/// Removes `id`, connecting each of its predecessors to each of its
/// successors. Allows any number of inbound edges.
pub fn remove_and_contract(graph: &mut FlowGraph, id: ElementId) -> PlannerResult<()> {
  remove_and_contract_with(graph, id, ContractionMode::default())
}

/// Removes `id` using the contraction mode of `config`.
pub fn remove_and_contract_configured(
  graph: &mut FlowGraph,
  id: ElementId,
  config: &PlannerConfig,
) -> PlannerResult<()> {
  remove_and_contract_with(graph, id, config.contraction_mode)
}

/// Removes `id`, connecting each of its predecessors to each of its
/// successors.
///
/// Every new edge is derived from the outgoing edge it replaces. Its ordinal
/// comes from the incoming edge when `id` is a splice and from the outgoing
/// edge otherwise; it blocks if the outgoing edge blocks, or if `id` performs
/// a join and the incoming edge blocks. Both replaced edge names are recorded
/// as prior names.
#[instrument(level = "trace", skip(graph))]
pub fn remove_and_contract_with(
  graph: &mut FlowGraph,
  id: ElementId,
  mode: ContractionMode,
) -> PlannerResult<()> {
  let element = graph
    .element(id)
    .ok_or(PlannerError::element_not_found(id))?;
  debug!(element = %element, "removing element, contracting edge");
  let is_splice = element.is_splice();
  let is_join = element.performs_join();

  let incoming: Vec<(ElementId, FlowEdge)> = graph
    .incoming_edges(id)
    .into_iter()
    .map(|e| (e.source, e.edge.clone()))
    .collect();
  let outgoing: Vec<(ElementId, FlowEdge)> = graph
    .outgoing_edges(id)
    .into_iter()
    .map(|e| (e.target, e.edge.clone()))
    .collect();

  if mode == ContractionMode::RequireSingleInbound && incoming.len() != 1 {
    return Err(PlannerError::MultipleInboundPaths {
      element: id,
      count: incoming.len(),
    });
  }

  for (source, inbound) in &incoming {
    for (target, outbound) in &outgoing {
      let non_blocking = outbound.is_non_blocking() && (!is_join || inbound.is_non_blocking());
      let ordinal = if is_splice {
        inbound.ordinal()
      } else {
        outbound.ordinal()
      };
      let mut edge = FlowEdge::derived_from(outbound)
        .with_ordinal(ordinal)
        .with_non_blocking(non_blocking);
      edge.add_prior_names([inbound, outbound]);
      graph.add_edge(*source, *target, edge)?;
    }
  }

  graph.remove_vertex(id);
  Ok(())
}

/// Inserts `element` directly downstream of `anchor`.
///
/// The anchor's outgoing edges move to `element`, and a new edge named after
/// the anchor connects the two.
#[instrument(level = "trace", skip(graph, element), fields(element = %element))]
pub fn insert_element_after(
  graph: &mut FlowGraph,
  anchor: ElementId,
  element: FlowElement,
) -> PlannerResult<()> {
  let name = anchor_name(graph, anchor)?;
  let outgoing: Vec<(EdgeId, ElementId)> = graph
    .outgoing_edges(anchor)
    .into_iter()
    .map(|e| (e.id, e.target))
    .collect();

  let inserted = add_new_vertex(graph, element)?;
  graph.add_edge(anchor, inserted, FlowEdge::new(name))?;

  for (expected, target) in outgoing {
    let edge = take_edge(graph, anchor, target, expected)?;
    graph.add_edge(inserted, target, edge)?;
  }
  Ok(())
}

/// Inserts `element` directly upstream of `anchor`.
///
/// The anchor's incoming edges move to `element`, and a new edge named after
/// the anchor connects the two.
#[instrument(level = "trace", skip(graph, element), fields(element = %element))]
pub fn insert_element_before(
  graph: &mut FlowGraph,
  anchor: ElementId,
  element: FlowElement,
) -> PlannerResult<()> {
  let name = anchor_name(graph, anchor)?;
  let incoming: Vec<(EdgeId, ElementId)> = graph
    .incoming_edges(anchor)
    .into_iter()
    .map(|e| (e.id, e.source))
    .collect();

  let inserted = add_new_vertex(graph, element)?;
  graph.add_edge(inserted, anchor, FlowEdge::new(name))?;

  for (expected, source) in incoming {
    let edge = take_edge(graph, source, anchor, expected)?;
    graph.add_edge(source, inserted, edge)?;
  }
  Ok(())
}

fn anchor_name(graph: &FlowGraph, anchor: ElementId) -> PlannerResult<String> {
  graph
    .element(anchor)
    .map(|e| e.name().to_string())
    .ok_or(PlannerError::element_not_found(anchor))
}

fn add_new_vertex(graph: &mut FlowGraph, element: FlowElement) -> PlannerResult<ElementId> {
  let id = element.id();
  if !graph.add_vertex(element) {
    return Err(PlannerError::duplicate_element(id));
  }
  Ok(id)
}

/// Removes the first edge from `source` to `target`, which must be `expected`.
pub(crate) fn take_edge(
  graph: &mut FlowGraph,
  source: ElementId,
  target: ElementId,
  expected: EdgeId,
) -> PlannerResult<FlowEdge> {
  match graph.remove_edge_between(source, target) {
    Some((removed, edge)) if removed == expected => Ok(edge),
    _ => Err(PlannerError::inconsistent_edge(source, target)),
  }
}

/// Moves every edge of `old` onto `replacement` and removes `old`.
///
/// `replacement` is added if absent. Edges between `old` and `replacement`
/// are dropped.
#[instrument(level = "trace", skip(graph, replacement), fields(replacement = %replacement))]
pub fn replace_element_with(
  graph: &mut FlowGraph,
  old: ElementId,
  replacement: FlowElement,
) -> PlannerResult<()> {
  if !graph.contains_vertex(old) {
    return Err(PlannerError::element_not_found(old));
  }
  let new = replacement.id();
  let incoming: Vec<(EdgeId, ElementId)> = graph
    .incoming_edges(old)
    .into_iter()
    .map(|e| (e.id, e.source))
    .collect();
  let outgoing: Vec<(EdgeId, ElementId)> = graph
    .outgoing_edges(old)
    .into_iter()
    .map(|e| (e.id, e.target))
    .collect();

  graph.add_vertex(replacement);

  for (id, source) in incoming {
    let edge = graph
      .remove_edge(id)
      .ok_or(PlannerError::inconsistent_edge(source, old))?;
    if source != new {
      graph.add_edge(source, new, edge)?;
    }
  }
  for (id, target) in outgoing {
    let edge = graph
      .remove_edge(id)
      .ok_or(PlannerError::inconsistent_edge(old, target))?;
    if target != new {
      graph.add_edge(new, target, edge)?;
    }
  }

  graph.remove_vertex(old);
  Ok(())
}

/// Insertion-ordered set of elements collected by the chain walks.
#[derive(Default)]
struct Branch {
  order: Vec<ElementId>,
  members: HashSet<ElementId>,
}

impl Branch {
  fn insert(&mut self, id: ElementId) {
    if self.members.insert(id) {
      self.order.push(id);
    }
  }

  fn remove(&mut self, id: ElementId) {
    if self.members.remove(&id) {
      self.order.retain(|e| *e != id);
    }
  }

  fn contains(&self, id: ElementId) -> bool {
    self.members.contains(&id)
  }

  fn is_empty(&self) -> bool {
    self.order.is_empty()
  }
}

fn is_chain_link(graph: &FlowGraph, id: ElementId) -> bool {
  graph.in_degree(id) == 1 && graph.out_degree(id) == 1
}

fn walk_up(graph: &FlowGraph, branch: &mut Branch, from: ElementId) {
  let mut current = from;
  while is_chain_link(graph, current) {
    branch.insert(current);
    let Some(previous) = graph.predecessors(current).first().copied() else {
      break;
    };
    if previous.is_sentinel() || branch.contains(previous) {
      break;
    }
    current = previous;
  }
}

fn walk_down(graph: &FlowGraph, branch: &mut Branch, from: ElementId) {
  let mut current = from;
  loop {
    if !branch.contains(current) && !is_chain_link(graph, current) {
      break;
    }
    branch.insert(current);
    let Some(next) = graph.successors(current).first().copied() else {
      break;
    };
    if next.is_sentinel() || branch.contains(next) {
      break;
    }
    current = next;
  }
}

fn remove_all(graph: &mut FlowGraph, branch: &Branch) {
  debug!(elements = branch.order.len(), "removing branch");
  for id in &branch.order {
    graph.remove_vertex(*id);
  }
}

/// Removes the maximal chain of single-input, single-output elements through
/// `id`.
///
/// An element that is not itself a chain link is removed alone. Sentinels
/// are never removed. Returns false if nothing was removed.
#[instrument(level = "trace", skip(graph))]
pub fn remove_branch_containing(graph: &mut FlowGraph, id: ElementId) -> PlannerResult<bool> {
  if !graph.contains_vertex(id) {
    return Err(PlannerError::element_not_found(id));
  }
  let mut branch = Branch::default();
  walk_up(graph, &mut branch, id);
  walk_down(graph, &mut branch, id);
  if branch.is_empty() && !id.is_sentinel() {
    branch.insert(id);
  }
  if branch.is_empty() {
    return Ok(false);
  }
  remove_all(graph, &branch);
  Ok(true)
}

/// Removes the chain walked downstream from `first` up to `second`.
///
/// Unless `inclusive`, `first` and `second` themselves stay. Returns false if
/// nothing was removed.
#[instrument(level = "trace", skip(graph))]
pub fn remove_branch_between(
  graph: &mut FlowGraph,
  first: ElementId,
  second: ElementId,
  inclusive: bool,
) -> PlannerResult<bool> {
  for id in [first, second] {
    if !graph.contains_vertex(id) {
      return Err(PlannerError::element_not_found(id));
    }
  }
  let mut branch = Branch::default();
  branch.insert(first);
  branch.insert(second);
  walk_down(graph, &mut branch, first);
  if !inclusive {
    branch.remove(first);
    branch.remove(second);
  }
  if branch.is_empty() {
    return Ok(false);
  }
  remove_all(graph, &branch);
  Ok(true)
}
