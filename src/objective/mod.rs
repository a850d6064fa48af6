//! Partition quality measures and the fitness function built from them.
//!
//! # Key Types
//!
//! - [`Objective`]: a named, directed measure of a module partition
//! - [`CohesionObjective`], [`CouplingObjective`], [`ModularityObjective`]
//! - [`FitnessFunction`]: weighted-sum scalar or minimization-oriented vector
//! - [`ObjectiveWeights`]: weights of the built-in objectives

mod fitness;
mod measures;
mod types;

pub use fitness::{FitnessFunction, ObjectiveWeights};
pub use measures::{CohesionObjective, CouplingObjective, ModularityObjective};
pub use types::{Direction, Objective};
