//! Module recovery for function/information graphs.
//!
//! Partitions the function objects of a weighted relation graph into
//! cohesive, loosely coupled modules with a genetic algorithm over a
//! **linear linkage encoding** (LLE):
//!
//! - **Graph**: arena of function and information objects with weighted
//!   relations; only function objects and the relations between them are
//!   partitioned.
//! - **Encoding**: a genome of successor pointers whose chains spell out the
//!   modules, with validation and a repair pipeline that restores the
//!   encoding invariants after every genetic operation.
//! - **Operators**: group crossover and graft mutation (divide, combine,
//!   relocate), all preserving module connectivity.
//! - **Greedy**: an edge-priority partition that seeds the population.
//! - **Objectives**: cohesion, coupling, and modularity, combined as a
//!   weighted sum or ranked by Pareto dominance.
//! - **GA**: a generic evolutionary engine with elitism, tournament
//!   selection, and rayon-parallel evaluation.
//!
//! [`modularization::run`] ties these together.
//!
//! # Architecture
//!
//! The library emits `tracing` events and installs no subscriber. Graph
//! ingestion and result export are left to callers.

pub mod encoding;
pub mod error;
pub mod ga;
pub mod graph;
pub mod greedy;
pub mod modularization;
pub mod module;
pub mod objective;
pub mod operators;

#[cfg(test)]
mod testing;

pub use error::{ModularError, Result};
