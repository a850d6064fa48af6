//! Genetic algorithm engine.
//!
//! A generic, domain-agnostic GA built on trait-based abstractions. A
//! problem implements [`GaProblem`] to say how individuals are created,
//! evaluated, recombined, and mutated; [`GaRunner`] drives the loop.
//! Fitness is maximized.
//!
//! # Core Traits
//!
//! - [`Individual`]: a candidate solution with its fitness and, optionally,
//!   its objective vector and Pareto standing
//! - [`GaProblem`]: initialization, evaluation, operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: population size, rates, selection, termination
//! - [`GaRunner`]: executes the evolutionary loop
//! - [`GaResult`]: best individual, history, Pareto front
//!
//! # Submodules
//!
//! - [`multi_objective`]: non-dominated sorting and crowding distance
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod config;
pub mod multi_objective;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use types::{Fitness, GaProblem, Individual};
