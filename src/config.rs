//! Planner configuration: which closure algorithm to run and how strict
//! contraction is.
//!
//! Values come from a JSON document or the defaults, and the environment
//! variables `FLOWGRAPH_CLOSURE_ALGORITHM` and `FLOWGRAPH_CONTRACTION_MODE`
//! override them when set.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PlannerError, PlannerResult};

/// Overrides [`PlannerConfig::closure_algorithm`].
pub const CLOSURE_ALGORITHM_ENV: &str = "FLOWGRAPH_CLOSURE_ALGORITHM";
/// Overrides [`PlannerConfig::contraction_mode`].
pub const CONTRACTION_MODE_ENV: &str = "FLOWGRAPH_CONTRACTION_MODE";

/// Algorithm used to compute the closure of a contracted graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureAlgorithm {
  /// Union biconnected components covering contracted edges.
  Biconnected,
  /// All-pairs shortest distances over a pruned working copy.
  #[default]
  AllPairs,
  /// Every shortest path per contracted edge. Expensive.
  KShortest,
}

impl ClosureAlgorithm {
  pub fn as_str(self) -> &'static str {
    match self {
      ClosureAlgorithm::Biconnected => "biconnected",
      ClosureAlgorithm::AllPairs => "all_pairs",
      ClosureAlgorithm::KShortest => "k_shortest",
    }
  }
}

impl fmt::Display for ClosureAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ClosureAlgorithm {
  type Err = PlannerError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "biconnected" => Ok(ClosureAlgorithm::Biconnected),
      "all_pairs" | "floyd_warshall" => Ok(ClosureAlgorithm::AllPairs),
      "k_shortest" => Ok(ClosureAlgorithm::KShortest),
      other => Err(PlannerError::invalid_config(format!(
        "unknown closure algorithm '{other}'"
      ))),
    }
  }
}

/// How remove-and-contract treats an element with several inbound edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractionMode {
  /// Rewire every inbound edge to every outbound target.
  #[default]
  AllowMultipleInbound,
  /// Fail unless the element has exactly one inbound edge.
  RequireSingleInbound,
}

impl ContractionMode {
  pub fn as_str(self) -> &'static str {
    match self {
      ContractionMode::AllowMultipleInbound => "allow_multiple_inbound",
      ContractionMode::RequireSingleInbound => "require_single_inbound",
    }
  }
}

impl fmt::Display for ContractionMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ContractionMode {
  type Err = PlannerError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "allow_multiple_inbound" => Ok(ContractionMode::AllowMultipleInbound),
      "require_single_inbound" => Ok(ContractionMode::RequireSingleInbound),
      other => Err(PlannerError::invalid_config(format!(
        "unknown contraction mode '{other}'"
      ))),
    }
  }
}

/// Options for the flow-graph algebra.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
  /// Used by [`closure_sub_graph`](crate::closure::closure_sub_graph).
  pub closure_algorithm: ClosureAlgorithm,
  /// Used by [`remove_and_contract_configured`](crate::editing::remove_and_contract_configured).
  pub contraction_mode: ContractionMode,
}

impl PlannerConfig {
  /// Parses a JSON document. Missing fields take their defaults.
  pub fn from_json(json: &str) -> PlannerResult<Self> {
    Ok(serde_json::from_str(json)?)
  }

  /// Applies the process environment on top of `self`.
  pub fn with_env_overrides(self) -> PlannerResult<Self> {
    self.with_overrides_from(|key| env::var(key).ok())
  }

  /// Applies overrides looked up by variable name. Unset or empty values
  /// leave the field unchanged.
  pub fn with_overrides_from<F>(mut self, lookup: F) -> PlannerResult<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(value) = lookup(CLOSURE_ALGORITHM_ENV).filter(|v| !v.trim().is_empty()) {
      self.closure_algorithm = value.parse()?;
    }
    if let Some(value) = lookup(CONTRACTION_MODE_ENV).filter(|v| !v.trim().is_empty()) {
      self.contraction_mode = value.parse()?;
    }
    info!(
      closure_algorithm = %self.closure_algorithm,
      contraction_mode = %self.contraction_mode,
      "planner options (env or config)"
    );
    Ok(self)
  }
}
