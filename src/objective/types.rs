//! The [`Objective`] contract.

use crate::graph::Graph;
use crate::module::Module;

/// Whether larger or smaller objective values are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Maximize,
    Minimize,
}

/// A scalar quality measure of a module partition.
///
/// Implementations must be pure functions of the partition and the graph;
/// the GA evaluates them concurrently across the population.
pub trait Objective: Send + Sync {
    /// Short name used in summaries and logs.
    fn name(&self) -> &str;

    fn direction(&self) -> Direction;

    /// Raw objective value of `modules` over `graph`.
    fn evaluate(&self, graph: &Graph, modules: &[Module]) -> f64;
}
