//! Topological traversal and element lookup.
//!
//! Ordering uses Kahn's algorithm seeded in storage order, so traversal of a
//! given graph is deterministic. The reverse order is the topological order of
//! the edge-reversed graph.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::error::{PlannerError, PlannerResult};
use crate::types::{ElementGraph, ElementId, FlowElement};

/// Lazy topological iterator over an [`ElementGraph`].
///
/// On a cyclic input the iterator ends early, before the vertices on or
/// behind the cycle.
pub struct TopologicalIter<'a, G: ElementGraph + ?Sized> {
  graph: &'a G,
  reverse: bool,
  remaining: HashMap<ElementId, usize>,
  queue: VecDeque<ElementId>,
}

impl<'a, G: ElementGraph + ?Sized> TopologicalIter<'a, G> {
  /// Sources first.
  pub fn forward(graph: &'a G) -> Self {
    Self::new(graph, false)
  }

  /// Sinks first.
  pub fn reverse(graph: &'a G) -> Self {
    Self::new(graph, true)
  }

  fn new(graph: &'a G, reverse: bool) -> Self {
    let mut remaining = HashMap::new();
    let mut queue = VecDeque::new();
    for id in graph.vertex_ids() {
      let degree = if reverse {
        graph.out_degree(id)
      } else {
        graph.in_degree(id)
      };
      if degree == 0 {
        queue.push_back(id);
      }
      remaining.insert(id, degree);
    }
    Self {
      graph,
      reverse,
      remaining,
      queue,
    }
  }
}

impl<G: ElementGraph + ?Sized> Iterator for TopologicalIter<'_, G> {
  type Item = ElementId;

  fn next(&mut self) -> Option<ElementId> {
    let current = self.queue.pop_front()?;
    let next = if self.reverse {
      self.graph.predecessors(current)
    } else {
      self.graph.successors(current)
    };
    for id in next {
      if let Some(degree) = self.remaining.get_mut(&id) {
        *degree -= 1;
        if *degree == 0 {
          self.queue.push_back(id);
        }
      }
    }
    Some(current)
  }
}

/// Full topological order; fails if the graph holds a cycle.
#[instrument(level = "trace", skip(graph))]
pub fn topological_order<G: ElementGraph + ?Sized>(graph: &G) -> PlannerResult<Vec<ElementId>> {
  complete(graph, TopologicalIter::forward(graph).collect())
}

/// Full reverse topological order; fails if the graph holds a cycle.
#[instrument(level = "trace", skip(graph))]
pub fn reverse_topological_order<G: ElementGraph + ?Sized>(
  graph: &G,
) -> PlannerResult<Vec<ElementId>> {
  complete(graph, TopologicalIter::reverse(graph).collect())
}

fn complete<G: ElementGraph + ?Sized>(
  graph: &G,
  order: Vec<ElementId>,
) -> PlannerResult<Vec<ElementId>> {
  let expected = graph.vertex_count();
  if order.len() != expected {
    return Err(PlannerError::traversal(format!(
      "topological order reached {} of {} vertices, graph contains a cycle",
      order.len(),
      expected
    )));
  }
  Ok(order)
}

/// First transform named `name` in topological order.
pub fn find_first_transform_named<'a, G: ElementGraph + ?Sized>(
  graph: &'a G,
  name: &str,
) -> Option<&'a FlowElement> {
  find_named(graph, TopologicalIter::forward(graph), name)
}

/// Last transform named `name` in topological order, i.e. the first one met
/// walking from the sinks.
pub fn find_last_transform_named<'a, G: ElementGraph + ?Sized>(
  graph: &'a G,
  name: &str,
) -> Option<&'a FlowElement> {
  find_named(graph, TopologicalIter::reverse(graph), name)
}

fn find_named<'a, G: ElementGraph + ?Sized>(
  graph: &'a G,
  order: TopologicalIter<'a, G>,
  name: &str,
) -> Option<&'a FlowElement> {
  order
    .filter_map(|id| graph.element(id))
    .find(|element| element.is_transform() && element.name() == name)
}

/// Boundary nodes feeding the graph.
///
/// With a `Head` sentinel these are its boundary successors; otherwise the
/// boundary nodes without predecessors, in topological order.
#[instrument(level = "trace", skip(graph))]
pub fn find_sources<G: ElementGraph + ?Sized>(graph: &G) -> Vec<ElementId> {
  let sources = if graph.contains_vertex(ElementId::HEAD) {
    boundaries_among(graph, graph.successors(ElementId::HEAD))
  } else {
    let heads = TopologicalIter::forward(graph).filter(|id| graph.in_degree(*id) == 0);
    boundaries_among(graph, heads)
  };
  debug!(count = sources.len(), "found sources");
  sources
}

/// Boundary nodes fed by the graph. Mirror image of [`find_sources`].
#[instrument(level = "trace", skip(graph))]
pub fn find_sinks<G: ElementGraph + ?Sized>(graph: &G) -> Vec<ElementId> {
  let sinks = if graph.contains_vertex(ElementId::TAIL) {
    boundaries_among(graph, graph.predecessors(ElementId::TAIL))
  } else {
    let tails = TopologicalIter::reverse(graph).filter(|id| graph.out_degree(*id) == 0);
    boundaries_among(graph, tails)
  };
  debug!(count = sinks.len(), "found sinks");
  sinks
}

fn boundaries_among<G: ElementGraph + ?Sized>(
  graph: &G,
  candidates: impl IntoIterator<Item = ElementId>,
) -> Vec<ElementId> {
  let mut seen = HashSet::new();
  candidates
    .into_iter()
    .filter(|id| graph.element(*id).is_some_and(FlowElement::is_boundary))
    .filter(|id| seen.insert(*id))
    .collect()
}

/// Every grouping node, in topological order.
pub fn find_all_groupings<G: ElementGraph + ?Sized>(graph: &G) -> Vec<ElementId> {
  TopologicalIter::forward(graph)
    .filter(|id| graph.element(*id).is_some_and(FlowElement::is_grouping))
    .collect()
}

/// Every join or merge node, in topological order.
pub fn find_all_joins<G: ElementGraph + ?Sized>(graph: &G) -> Vec<ElementId> {
  TopologicalIter::forward(graph)
    .filter(|id| graph.element(*id).is_some_and(FlowElement::is_multi_input))
    .collect()
}

/// Union of the vertex sets of matched sub-graphs.
pub fn vertices_of_matches<I, G>(matches: I) -> HashSet<ElementId>
where
  I: IntoIterator<Item = G>,
  G: ElementGraph,
{
  matches
    .into_iter()
    .flat_map(|matched| matched.vertex_ids())
    .collect()
}

/// Receives the boundary nodes of a finished sub-graph, keyed by edge name.
pub trait StepRegistrar {
  fn add_source(&mut self, edge_name: &str, boundary: &FlowElement);

  fn add_sink(&mut self, edge_name: &str, boundary: &FlowElement);
}

/// Registers every outgoing edge of each source with `registrar`.
pub fn register_sources<G, R>(
  registrar: &mut R,
  graph: &G,
  sources: &[ElementId],
) -> PlannerResult<()>
where
  G: ElementGraph + ?Sized,
  R: StepRegistrar + ?Sized,
{
  for &id in sources {
    let boundary = graph
      .element(id)
      .ok_or(PlannerError::element_not_found(id))?;
    for entry in graph.outgoing_edges(id) {
      registrar.add_source(entry.edge.name(), boundary);
    }
  }
  Ok(())
}

/// Registers every incoming edge of each sink with `registrar`.
pub fn register_sinks<G, R>(registrar: &mut R, graph: &G, sinks: &[ElementId]) -> PlannerResult<()>
where
  G: ElementGraph + ?Sized,
  R: StepRegistrar + ?Sized,
{
  for &id in sinks {
    let boundary = graph
      .element(id)
      .ok_or(PlannerError::element_not_found(id))?;
    for entry in graph.incoming_edges(id) {
      registrar.add_sink(entry.edge.name(), boundary);
    }
  }
  Ok(())
}
